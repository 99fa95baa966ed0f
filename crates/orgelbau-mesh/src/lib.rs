#![warn(missing_docs)]

//! Profile extrusion and triangle meshes for the orgelbau console generator.
//!
//! A board mesh is built directly from its 2D profile: the two caps are
//! triangulated by ear clipping (holes merged in via bridge edges) and the
//! outline and hole loops are swept into quad walls. The profile plane is
//! YZ — profile `u` runs along world Y, profile `v` along world Z — and
//! extrusion goes along +X by the board thickness, so an unrotated board
//! occupies `[0, thickness] × [0, width] × [0, height]`.

use orgelbau_math::{Point2, Point3, Transform, Vec3};
use orgelbau_sketch::{Profile, ProfileError};
use thiserror::Error;

/// Errors produced while building meshes.
#[derive(Error, Debug)]
pub enum MeshError {
    /// Invalid profile geometry.
    #[error(transparent)]
    Profile(#[from] ProfileError),
    /// Extrusion depth must be positive.
    #[error("extrusion thickness must be positive, got {0}")]
    NonPositiveThickness(f64),
}

/// Mesh-approximation quality for curved features (hole circles).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TessellationQuality {
    /// Fast preview quality.
    Coarse,
    /// Default quality.
    #[default]
    Medium,
    /// Export quality.
    Fine,
}

impl TessellationQuality {
    /// Linear deviation tolerance in mm.
    pub fn linear_tolerance(&self) -> f64 {
        match self {
            TessellationQuality::Coarse => 1e-3,
            TessellationQuality::Medium => 1e-4,
            TessellationQuality::Fine => 1e-5,
        }
    }

    /// Chord count used when discretizing circular holes.
    pub fn circle_segments(&self) -> u32 {
        match self {
            TessellationQuality::Coarse => 16,
            TessellationQuality::Medium => 32,
            TessellationQuality::Fine => 64,
        }
    }
}

/// Triangle mesh for rendering and export.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriangleMesh {
    /// Flat vertex positions: `[x0, y0, z0, x1, y1, z1, ...]`.
    pub vertices: Vec<f32>,
    /// Flat triangle indices: `[i0, i1, i2, ...]`.
    pub indices: Vec<u32>,
    /// Flat vertex normals, same length as `vertices`.
    pub normals: Vec<f32>,
}

impl TriangleMesh {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of triangles.
    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }

    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Merge another mesh into this one.
    pub fn merge(&mut self, other: &TriangleMesh) {
        let offset = self.num_vertices() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.normals.extend_from_slice(&other.normals);
        self.indices
            .extend(other.indices.iter().map(|&i| i + offset));
    }

    /// Vertex position at index `i`.
    pub fn vertex(&self, i: usize) -> Point3 {
        Point3::new(
            self.vertices[3 * i] as f64,
            self.vertices[3 * i + 1] as f64,
            self.vertices[3 * i + 2] as f64,
        )
    }

    /// Corner positions of triangle `t`.
    pub fn triangle(&self, t: usize) -> [Point3; 3] {
        [
            self.vertex(self.indices[3 * t] as usize),
            self.vertex(self.indices[3 * t + 1] as usize),
            self.vertex(self.indices[3 * t + 2] as usize),
        ]
    }

    /// Apply a rigid transform to all vertices and normals in place.
    pub fn apply_transform(&mut self, t: &Transform) {
        for i in 0..self.num_vertices() {
            let p = t.apply_point(&self.vertex(i));
            self.vertices[3 * i] = p.x as f32;
            self.vertices[3 * i + 1] = p.y as f32;
            self.vertices[3 * i + 2] = p.z as f32;

            if self.normals.len() == self.vertices.len() {
                let n = Vec3::new(
                    self.normals[3 * i] as f64,
                    self.normals[3 * i + 1] as f64,
                    self.normals[3 * i + 2] as f64,
                );
                let n = t.apply_normal(&n);
                let n = if n.norm() > 1e-12 { n.normalize() } else { n };
                self.normals[3 * i] = n.x as f32;
                self.normals[3 * i + 1] = n.y as f32;
                self.normals[3 * i + 2] = n.z as f32;
            }
        }
    }

    /// Axis-aligned bounding box as `(min, max)`, or `None` when empty.
    pub fn bounding_box(&self) -> Option<(Point3, Point3)> {
        if self.vertices.is_empty() {
            return None;
        }
        let mut min = Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY);
        let mut max = Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);
        for i in 0..self.num_vertices() {
            let p = self.vertex(i);
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            min.z = min.z.min(p.z);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
            max.z = max.z.max(p.z);
        }
        Some((min, max))
    }

    /// Enclosed volume via the divergence theorem. Requires a closed,
    /// consistently wound mesh.
    pub fn volume(&self) -> f64 {
        let mut vol = 0.0;
        for t in 0..self.num_triangles() {
            let [a, b, c] = self.triangle(t);
            vol += a.coords.dot(&b.coords.cross(&c.coords)) / 6.0;
        }
        vol.abs()
    }

    /// Total surface area of all triangles.
    pub fn surface_area(&self) -> f64 {
        let mut area = 0.0;
        for t in 0..self.num_triangles() {
            let [a, b, c] = self.triangle(t);
            area += (b - a).cross(&(c - a)).norm() / 2.0;
        }
        area
    }

    /// Volume-weighted center of mass. Requires a closed mesh.
    pub fn center_of_mass(&self) -> Option<Point3> {
        let mut vol = 0.0;
        let mut centroid = Vec3::zeros();
        for t in 0..self.num_triangles() {
            let [a, b, c] = self.triangle(t);
            let v = a.coords.dot(&b.coords.cross(&c.coords)) / 6.0;
            vol += v;
            centroid += (a.coords + b.coords + c.coords) * (v / 4.0);
        }
        if vol.abs() < 1e-12 {
            return None;
        }
        Some(Point3::from(centroid / vol))
    }
}

/// Extrude a profile into a closed solid mesh.
///
/// The profile plane maps to world YZ and extrusion runs along +X by
/// `thickness`. Hole loops become interior walls; caps are triangulated
/// with the holes cut out.
pub fn extrude_profile(profile: &Profile, thickness: f64) -> Result<TriangleMesh, MeshError> {
    if thickness <= 0.0 {
        return Err(MeshError::NonPositiveThickness(thickness));
    }

    let mut mesh = TriangleMesh::new();

    // Caps. The top cap (x = thickness) keeps counter-clockwise winding so
    // its normal points +X; the bottom cap is reversed.
    let cap = triangulate_cap(&profile.outline, &profile.holes);
    append_cap(&mut mesh, &cap, thickness, false);
    append_cap(&mut mesh, &cap, 0.0, true);

    // Outline walls face outward; hole walls face into the hole void, which
    // a reversed traversal of the (counter-clockwise) hole loop produces.
    append_walls(&mut mesh, &profile.outline, thickness, false);
    for hole in &profile.holes {
        append_walls(&mut mesh, hole, thickness, true);
    }

    Ok(mesh)
}

/// A triangulated cap in profile coordinates.
struct CapTriangulation {
    points: Vec<Point2>,
    indices: Vec<u32>,
}

/// Triangulate the outline with the hole loops cut out: each hole is
/// merged into the outer polygon through a bridge edge to its nearest
/// outline vertex, then the merged polygon is ear-clipped.
fn triangulate_cap(outline: &[Point2], holes: &[Vec<Point2>]) -> CapTriangulation {
    let mut points: Vec<Point2> = outline.to_vec();
    let mut poly: Vec<usize> = (0..outline.len()).collect();

    for hole in holes {
        // Holes are stored counter-clockwise; the merged polygon needs them
        // clockwise so the material stays on the left of every edge.
        let start = points.len();
        points.extend(hole.iter().rev().copied());
        let hole_len = hole.len();

        // Nearest (outer-vertex, hole-vertex) pair becomes the bridge.
        let mut best = (f64::INFINITY, 0usize, 0usize);
        for h in 0..hole_len {
            let hp = points[start + h];
            for (pi, &outer_idx) in poly.iter().enumerate() {
                let op = points[outer_idx];
                let d2 = (op - hp).norm_squared();
                if d2 < best.0 {
                    best = (d2, h, pi);
                }
            }
        }
        let (_, bridge_hole, bridge_outer) = best;

        let hole_indices: Vec<usize> = (0..hole_len)
            .map(|i| start + (bridge_hole + i) % hole_len)
            .collect();

        let mut merged = Vec::with_capacity(poly.len() + hole_len + 2);
        merged.extend_from_slice(&poly[..=bridge_outer]);
        merged.extend_from_slice(&hole_indices);
        merged.push(hole_indices[0]);
        merged.push(poly[bridge_outer]);
        merged.extend_from_slice(&poly[bridge_outer + 1..]);
        poly = merged;
    }

    let mut indices = Vec::new();
    ear_clip(&points, &poly, &mut indices);
    CapTriangulation { points, indices }
}

/// Ear-clipping triangulation of a counter-clockwise polygon given as
/// indices into a shared vertex array.
fn ear_clip(points: &[Point2], polygon: &[usize], out: &mut Vec<u32>) {
    if polygon.len() < 3 {
        return;
    }
    let mut remaining: Vec<usize> = polygon.to_vec();

    while remaining.len() > 3 {
        let n = remaining.len();
        let mut clipped = false;

        for i in 0..n {
            let prev = (i + n - 1) % n;
            let next = (i + 1) % n;
            let a = points[remaining[prev]];
            let b = points[remaining[i]];
            let c = points[remaining[next]];

            let cross = (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x);
            if cross <= 0.0 {
                continue;
            }

            let mut is_ear = true;
            for (j, &idx) in remaining.iter().enumerate() {
                if j == prev || j == i || j == next {
                    continue;
                }
                if point_in_triangle(points[idx], a, b, c) {
                    is_ear = false;
                    break;
                }
            }

            if is_ear {
                out.push(remaining[prev] as u32);
                out.push(remaining[i] as u32);
                out.push(remaining[next] as u32);
                remaining.remove(i);
                clipped = true;
                break;
            }
        }

        // No ear found: numerically degenerate input, stop rather than spin.
        if !clipped {
            break;
        }
    }

    if remaining.len() == 3 {
        out.push(remaining[0] as u32);
        out.push(remaining[1] as u32);
        out.push(remaining[2] as u32);
    }
}

/// Strict point-in-triangle test via barycentric coordinates.
fn point_in_triangle(p: Point2, a: Point2, b: Point2, c: Point2) -> bool {
    let v0 = c - a;
    let v1 = b - a;
    let v2 = p - a;

    let dot00 = v0.dot(&v0);
    let dot01 = v0.dot(&v1);
    let dot02 = v0.dot(&v2);
    let dot11 = v1.dot(&v1);
    let dot12 = v1.dot(&v2);

    let denom = dot00 * dot11 - dot01 * dot01;
    if denom.abs() < 1e-18 {
        return false;
    }
    let inv = 1.0 / denom;
    let u = (dot11 * dot02 - dot01 * dot12) * inv;
    let v = (dot00 * dot12 - dot01 * dot02) * inv;

    let eps = 1e-10;
    u > eps && v > eps && (u + v) < 1.0 - eps
}

/// Append a cap at extrusion coordinate `x`, reversing the winding (and
/// the normal) for the bottom cap.
fn append_cap(mesh: &mut TriangleMesh, cap: &CapTriangulation, x: f64, reversed: bool) {
    let offset = mesh.num_vertices() as u32;
    let normal = if reversed { -1.0f32 } else { 1.0f32 };
    for p in &cap.points {
        mesh.vertices
            .extend_from_slice(&[x as f32, p.x as f32, p.y as f32]);
        mesh.normals.extend_from_slice(&[normal, 0.0, 0.0]);
    }
    for tri in cap.indices.chunks(3) {
        if reversed {
            mesh.indices
                .extend_from_slice(&[offset + tri[0], offset + tri[2], offset + tri[1]]);
        } else {
            mesh.indices
                .extend_from_slice(&[offset + tri[0], offset + tri[1], offset + tri[2]]);
        }
    }
}

/// Append wall quads for one loop. For a counter-clockwise loop the walls
/// face outward; `inward` reverses the traversal for hole interiors.
fn append_walls(mesh: &mut TriangleMesh, loop_points: &[Point2], thickness: f64, inward: bool) {
    let n = loop_points.len();
    for i in 0..n {
        let (a, b) = if inward {
            (loop_points[(i + 1) % n], loop_points[i])
        } else {
            (loop_points[i], loop_points[(i + 1) % n])
        };

        let edge = b - a;
        let len = edge.norm();
        if len < 1e-12 {
            continue;
        }
        // Outward normal of a CCW loop in the (u, v) plane, mapped to YZ.
        let nrm = [0.0f32, (edge.y / len) as f32, (-edge.x / len) as f32];

        let offset = mesh.num_vertices() as u32;
        let t = thickness as f32;
        let quad = [
            [0.0, a.x as f32, a.y as f32],
            [0.0, b.x as f32, b.y as f32],
            [t, b.x as f32, b.y as f32],
            [t, a.x as f32, a.y as f32],
        ];
        for v in &quad {
            mesh.vertices.extend_from_slice(v);
            mesh.normals.extend_from_slice(&nrm);
        }
        mesh.indices.extend_from_slice(&[
            offset,
            offset + 1,
            offset + 2,
            offset,
            offset + 2,
            offset + 3,
        ]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(w: f64, h: f64, minw: f64, minh: f64) -> Profile {
        Profile::board(w, h, minw, minh).unwrap()
    }

    #[test]
    fn test_rect_board_bounding_box_exact() {
        let mesh = extrude_profile(&board(500.0, 300.0, 0.0, 0.0), 18.0).unwrap();
        let (min, max) = mesh.bounding_box().unwrap();
        assert_eq!(min, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(max, Point3::new(18.0, 500.0, 300.0));
    }

    #[test]
    fn test_rect_board_volume() {
        let mesh = extrude_profile(&board(100.0, 50.0, 0.0, 0.0), 10.0).unwrap();
        assert!((mesh.volume() - 50_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_pentagon_board_volume() {
        // 500x300 with the notch corner cut: area = 150000 - 150*150/2.
        let mesh = extrude_profile(&board(500.0, 300.0, 350.0, 150.0), 18.0).unwrap();
        let expected = (150_000.0 - 11_250.0) * 18.0;
        assert!(
            (mesh.volume() - expected).abs() < 1e-3,
            "volume {} != {}",
            mesh.volume(),
            expected
        );
    }

    #[test]
    fn test_rect_hole_removes_volume() {
        let mut profile = board(100.0, 100.0, 0.0, 0.0);
        profile.add_rect_hole(50.0, 50.0, 20.0, 10.0).unwrap();
        let mesh = extrude_profile(&profile, 5.0).unwrap();
        let expected = (10_000.0 - 200.0) * 5.0;
        assert!(
            (mesh.volume() - expected).abs() < 1e-3,
            "volume {} != {}",
            mesh.volume(),
            expected
        );
    }

    #[test]
    fn test_circle_hole_volume_approx() {
        let mut profile = board(100.0, 100.0, 0.0, 0.0);
        profile.add_circle_hole(50.0, 50.0, 20.0, 64).unwrap();
        let mesh = extrude_profile(&profile, 5.0).unwrap();
        let expected = (10_000.0 - std::f64::consts::PI * 100.0) * 5.0;
        // 64-gon underestimates the circle slightly.
        assert!((mesh.volume() - expected).abs() < expected * 0.01);
    }

    #[test]
    fn test_two_holes() {
        let mut profile = board(200.0, 100.0, 0.0, 0.0);
        profile.add_rect_hole(50.0, 50.0, 10.0, 10.0).unwrap();
        profile.add_rect_hole(150.0, 50.0, 10.0, 10.0).unwrap();
        let mesh = extrude_profile(&profile, 4.0).unwrap();
        let expected = (20_000.0 - 200.0) * 4.0;
        assert!((mesh.volume() - expected).abs() < 1e-3);
    }

    #[test]
    fn test_zero_thickness_rejected() {
        let result = extrude_profile(&board(10.0, 10.0, 0.0, 0.0), 0.0);
        assert!(matches!(result, Err(MeshError::NonPositiveThickness(_))));
    }

    #[test]
    fn test_transform_moves_bounding_box() {
        let mut mesh = extrude_profile(&board(100.0, 50.0, 0.0, 0.0), 10.0).unwrap();
        mesh.apply_transform(&Transform::placement([5.0, 6.0, 7.0], [0.0, 0.0, 0.0]));
        let (min, max) = mesh.bounding_box().unwrap();
        assert!((min.x - 5.0).abs() < 1e-5);
        assert!((min.y - 6.0).abs() < 1e-5);
        assert!((min.z - 7.0).abs() < 1e-5);
        assert!((max.y - 106.0).abs() < 1e-4);
    }

    #[test]
    fn test_rotation_y90_turns_thickness_into_z() {
        // A (0,90,0) rotation lays the board flat: thickness along -Z.
        let mut mesh = extrude_profile(&board(100.0, 50.0, 0.0, 0.0), 18.0).unwrap();
        mesh.apply_transform(&Transform::placement([0.0, 0.0, 0.0], [0.0, 90.0, 0.0]));
        let (min, max) = mesh.bounding_box().unwrap();
        assert!((max.z - min.z - 18.0).abs() < 1e-4);
        assert!((max.y - min.y - 100.0).abs() < 1e-4);
        assert!((max.x - min.x - 50.0).abs() < 1e-4);
    }

    #[test]
    fn test_surface_area_rect() {
        let mesh = extrude_profile(&board(10.0, 20.0, 0.0, 0.0), 5.0).unwrap();
        let expected = 2.0 * (10.0 * 20.0) + 2.0 * (10.0 * 5.0) + 2.0 * (20.0 * 5.0);
        assert!((mesh.surface_area() - expected).abs() < 1e-6);
    }

    #[test]
    fn test_center_of_mass_rect() {
        let mesh = extrude_profile(&board(100.0, 50.0, 0.0, 0.0), 10.0).unwrap();
        let com = mesh.center_of_mass().unwrap();
        assert!((com.x - 5.0).abs() < 1e-6);
        assert!((com.y - 50.0).abs() < 1e-6);
        assert!((com.z - 25.0).abs() < 1e-6);
    }

    #[test]
    fn test_merge_offsets_indices() {
        let a = extrude_profile(&board(10.0, 10.0, 0.0, 0.0), 1.0).unwrap();
        let mut m = a.clone();
        m.merge(&a);
        assert_eq!(m.num_triangles(), 2 * a.num_triangles());
        assert_eq!(m.num_vertices(), 2 * a.num_vertices());
        let max_index = *m.indices.iter().max().unwrap() as usize;
        assert!(max_index < m.num_vertices());
    }

    #[test]
    fn test_quality_tolerances() {
        assert_eq!(TessellationQuality::Coarse.linear_tolerance(), 1e-3);
        assert_eq!(TessellationQuality::Medium.linear_tolerance(), 1e-4);
        assert_eq!(TessellationQuality::Fine.linear_tolerance(), 1e-5);
        assert!(TessellationQuality::Fine.circle_segments() > TessellationQuality::Coarse.circle_segments());
    }
}
