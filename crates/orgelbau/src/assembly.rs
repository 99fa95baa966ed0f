//! Assembled console parts.

use orgelbau_math::Point3;
use orgelbau_mesh::TriangleMesh;

use crate::materials::Material;

/// One placed solid in the assembly.
#[derive(Debug, Clone)]
pub struct Part {
    /// Part name (the board name, suffixed for repeated boards).
    pub name: String,
    /// Render material.
    pub material: Material,
    /// Placed mesh in world coordinates.
    pub mesh: TriangleMesh,
}

/// An unordered collection of parts making up one console.
#[derive(Debug, Clone)]
pub struct Assembly {
    /// Assembly name (the console variant).
    pub name: String,
    /// All parts.
    pub parts: Vec<Part>,
}

impl Assembly {
    /// An empty assembly.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parts: Vec::new(),
        }
    }

    /// Number of parts.
    pub fn num_parts(&self) -> usize {
        self.parts.len()
    }

    /// Axis-aligned bounding box over all parts, `None` when empty.
    pub fn bounding_box(&self) -> Option<(Point3, Point3)> {
        let mut acc: Option<(Point3, Point3)> = None;
        for part in &self.parts {
            if let Some((lo, hi)) = part.mesh.bounding_box() {
                acc = Some(match acc {
                    None => (lo, hi),
                    Some((min, max)) => (
                        Point3::new(min.x.min(lo.x), min.y.min(lo.y), min.z.min(lo.z)),
                        Point3::new(max.x.max(hi.x), max.y.max(hi.y), max.z.max(hi.z)),
                    ),
                });
            }
        }
        acc
    }

    /// All part meshes merged into one, for STL/STEP export and the
    /// drawing projections.
    pub fn merged_mesh(&self) -> TriangleMesh {
        let mut merged = TriangleMesh::new();
        for part in &self.parts {
            merged.merge(&part.mesh);
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardSpec;
    use orgelbau_mesh::TessellationQuality;

    #[test]
    fn test_bounding_box_spans_parts() {
        let mut assembly = Assembly::new("test");
        for (i, x) in [0.0, 100.0].iter().enumerate() {
            let mesh = BoardSpec::new("b", 10.0, 10.0, 10.0)
                .at([*x, 0.0, 0.0])
                .build(TessellationQuality::Medium)
                .unwrap();
            assembly.parts.push(Part {
                name: format!("b{i}"),
                material: Material::Oak,
                mesh,
            });
        }
        let (min, max) = assembly.bounding_box().unwrap();
        assert!(min.x.abs() < 1e-6);
        assert!((max.x - 110.0).abs() < 1e-6);
    }

    #[test]
    fn test_merged_mesh_triangle_count() {
        let mesh = BoardSpec::new("b", 10.0, 10.0, 10.0)
            .build(TessellationQuality::Medium)
            .unwrap();
        let n = mesh.num_triangles();
        let mut assembly = Assembly::new("test");
        for i in 0..3 {
            assembly.parts.push(Part {
                name: format!("b{i}"),
                material: Material::Oak,
                mesh: mesh.clone(),
            });
        }
        assert_eq!(assembly.merged_mesh().num_triangles(), 3 * n);
    }

    #[test]
    fn test_empty_assembly_has_no_bounds() {
        assert!(Assembly::new("empty").bounding_box().is_none());
    }
}
