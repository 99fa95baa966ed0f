//! Welding and edge adjacency extraction.
//!
//! Board meshes duplicate vertices along face borders (caps and walls
//! carry their own normals), so adjacency is recovered by welding
//! coincident positions before building the edge map.

use std::collections::HashMap;

use orgelbau_math::Point3;
use orgelbau_mesh::TriangleMesh;

use crate::types::Triangle3D;

/// Default dihedral threshold above which an edge is drawn as sharp
/// (30 degrees).
pub const DEFAULT_SHARP_ANGLE: f64 = std::f64::consts::PI / 6.0;

/// Positional quantum for vertex welding, in mm.
const WELD_QUANTUM: f64 = 1e-3;

/// An edge of the welded mesh with its adjacent triangles.
#[derive(Debug, Clone)]
pub struct WeldedEdge {
    /// First welded vertex index (always the smaller).
    pub v0: usize,
    /// Second welded vertex index.
    pub v1: usize,
    /// First adjacent triangle.
    pub tri0: usize,
    /// Second adjacent triangle, absent on mesh boundaries.
    pub tri1: Option<usize>,
}

/// A mesh with coincident vertices merged.
#[derive(Debug, Clone)]
pub struct WeldedMesh {
    /// Unique vertex positions.
    pub points: Vec<Point3>,
    /// Triangles as welded vertex indices, with face data. Degenerate
    /// input triangles are dropped.
    pub triangles: Vec<([usize; 3], Triangle3D)>,
    /// Unique edges with adjacency.
    pub edges: Vec<WeldedEdge>,
}

impl WeldedMesh {
    /// Weld a triangle mesh and build the edge adjacency map.
    pub fn build(mesh: &TriangleMesh) -> Self {
        let mut keys: HashMap<(i64, i64, i64), usize> = HashMap::new();
        let mut points: Vec<Point3> = Vec::new();
        let mut remap = Vec::with_capacity(mesh.num_vertices());

        for i in 0..mesh.num_vertices() {
            let p = mesh.vertex(i);
            let key = (
                (p.x / WELD_QUANTUM).round() as i64,
                (p.y / WELD_QUANTUM).round() as i64,
                (p.z / WELD_QUANTUM).round() as i64,
            );
            let idx = *keys.entry(key).or_insert_with(|| {
                points.push(p);
                points.len() - 1
            });
            remap.push(idx);
        }

        let mut triangles = Vec::new();
        let mut edge_map: HashMap<(usize, usize), (usize, Option<usize>)> = HashMap::new();

        for t in 0..mesh.num_triangles() {
            let a = remap[mesh.indices[3 * t] as usize];
            let b = remap[mesh.indices[3 * t + 1] as usize];
            let c = remap[mesh.indices[3 * t + 2] as usize];
            if a == b || b == c || a == c {
                continue;
            }
            let Some(tri) = Triangle3D::new(points[a], points[b], points[c]) else {
                continue;
            };
            let tri_idx = triangles.len();
            triangles.push(([a, b, c], tri));

            for (x, y) in [(a, b), (b, c), (c, a)] {
                let key = if x < y { (x, y) } else { (y, x) };
                edge_map
                    .entry(key)
                    .and_modify(|e| {
                        if e.1.is_none() {
                            e.1 = Some(tri_idx);
                        }
                    })
                    .or_insert((tri_idx, None));
            }
        }

        let edges = edge_map
            .into_iter()
            .map(|((v0, v1), (tri0, tri1))| WeldedEdge { v0, v1, tri0, tri1 })
            .collect();

        Self {
            points,
            triangles,
            edges,
        }
    }

    /// Dihedral angle between the faces adjacent to an edge, or `None`
    /// for boundary edges.
    pub fn dihedral_angle(&self, edge: &WeldedEdge) -> Option<f64> {
        let t1 = edge.tri1?;
        let n0 = self.triangles[edge.tri0].1.normal;
        let n1 = self.triangles[t1].1.normal;
        Some(n0.dot(&n1).clamp(-1.0, 1.0).acos())
    }
}
