//! Projection with hidden-line classification.

use orgelbau_math::{Point3, Vec3};
use orgelbau_mesh::TriangleMesh;

use crate::edge_extract::{WeldedMesh, DEFAULT_SHARP_ANGLE};
use crate::types::{
    EdgeType, Point2D, ProjectedEdge, ProjectedView, Triangle3D, ViewDirection, Visibility,
};

/// Depth slack when testing occlusion, in mm.
const DEPTH_EPS: f64 = 1e-3;

/// Orthonormal camera basis for a view direction.
struct ViewBasis {
    right: Vec3,
    up: Vec3,
    forward: Vec3,
}

impl ViewBasis {
    fn new(view: ViewDirection) -> Self {
        let forward = view.view_vector().normalize();
        let right = forward.cross(&view.up_vector()).normalize();
        let up = right.cross(&forward);
        Self { right, up, forward }
    }

    /// Project a 3D point to `(x, y)` view coordinates plus depth
    /// (larger depth is farther from the viewer).
    fn project(&self, p: &Point3) -> (Point2D, f64) {
        let d = p.coords;
        (
            Point2D::new(d.dot(&self.right), d.dot(&self.up)),
            d.dot(&self.forward),
        )
    }
}

/// Project a mesh into a 2D view with the default sharp-edge threshold.
pub fn project_mesh(mesh: &TriangleMesh, view: ViewDirection) -> ProjectedView {
    project_mesh_with_options(mesh, view, DEFAULT_SHARP_ANGLE)
}

/// Project a mesh into a 2D view.
///
/// Drawn edges are mesh boundaries, sharp edges (dihedral angle above
/// `sharp_angle`), and per-view silhouettes. Each edge is classified as
/// visible or hidden by testing whether its midpoint is occluded by any
/// face between it and the viewer.
pub fn project_mesh_with_options(
    mesh: &TriangleMesh,
    view: ViewDirection,
    sharp_angle: f64,
) -> ProjectedView {
    let welded = WeldedMesh::build(mesh);
    let basis = ViewBasis::new(view);
    let mut result = ProjectedView::new(view);

    // Precompute projected triangles for the occlusion pass.
    let projected_tris: Vec<([Point2D; 3], [f64; 3], &Triangle3D)> = welded
        .triangles
        .iter()
        .map(|(_, tri)| {
            let (a, da) = basis.project(&tri.v0);
            let (b, db) = basis.project(&tri.v1);
            let (c, dc) = basis.project(&tri.v2);
            ([a, b, c], [da, db, dc], tri)
        })
        .collect();

    for edge in &welded.edges {
        let edge_type = match edge.tri1 {
            None => EdgeType::Boundary,
            Some(t1) => {
                let tri0 = &welded.triangles[edge.tri0].1;
                let tri1 = &welded.triangles[t1].1;
                let dihedral = tri0.normal.dot(&tri1.normal).clamp(-1.0, 1.0).acos();
                if tri0.faces_viewer(&basis.forward) != tri1.faces_viewer(&basis.forward) {
                    EdgeType::Silhouette
                } else if dihedral > sharp_angle {
                    EdgeType::Sharp
                } else {
                    continue;
                }
            }
        };

        let p0 = welded.points[edge.v0];
        let p1 = welded.points[edge.v1];
        let (s, d0) = basis.project(&p0);
        let (e, d1) = basis.project(&p1);

        let mid = Point2D::new((s.x + e.x) / 2.0, (s.y + e.y) / 2.0);
        let mid_depth = (d0 + d1) / 2.0;

        let occluded = projected_tris.iter().any(|(corners, depths, _)| {
            occludes(corners, depths, mid, mid_depth)
        });

        result.add_edge(ProjectedEdge {
            start: s,
            end: e,
            visibility: if occluded {
                Visibility::Hidden
            } else {
                Visibility::Visible
            },
            edge_type,
            depth: mid_depth,
        });
    }

    result
}

/// Whether the projected triangle covers `p` at a strictly smaller depth.
fn occludes(corners: &[Point2D; 3], depths: &[f64; 3], p: Point2D, p_depth: f64) -> bool {
    let [a, b, c] = corners;

    let v0 = (c.x - a.x, c.y - a.y);
    let v1 = (b.x - a.x, b.y - a.y);
    let v2 = (p.x - a.x, p.y - a.y);

    let dot00 = v0.0 * v0.0 + v0.1 * v0.1;
    let dot01 = v0.0 * v1.0 + v0.1 * v1.1;
    let dot02 = v0.0 * v2.0 + v0.1 * v2.1;
    let dot11 = v1.0 * v1.0 + v1.1 * v1.1;
    let dot12 = v1.0 * v2.0 + v1.1 * v2.1;

    let denom = dot00 * dot11 - dot01 * dot01;
    if denom.abs() < 1e-18 {
        // Triangle seen edge-on; it cannot hide anything.
        return false;
    }
    let inv = 1.0 / denom;
    let u = (dot11 * dot02 - dot01 * dot12) * inv;
    let v = (dot00 * dot12 - dot01 * dot02) * inv;

    let eps = 1e-9;
    if u <= eps || v <= eps || (u + v) >= 1.0 - eps {
        return false;
    }

    // Barycentric interpolation of triangle depth at p:
    // weights are (1-u-v) at a, v at b, u at c.
    let tri_depth = (1.0 - u - v) * depths[0] + v * depths[1] + u * depths[2];
    tri_depth < p_depth - DEPTH_EPS
}
