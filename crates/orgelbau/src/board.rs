//! The single source of truth for every plank in a console.
//!
//! A [`BoardSpec`] carries both the manufacturing record (outer
//! dimensions, thickness, hole list, description) and the placement in
//! the assembly. The 3D build reads it through [`BoardSpec::build`] and
//! the cutting list through [`BoardSpec::cut_entry`], so layout and cut
//! list cannot drift apart.

use serde::{Deserialize, Serialize};

use orgelbau_math::Transform;
use orgelbau_mesh::{extrude_profile, TessellationQuality, TriangleMesh};
use orgelbau_sketch::Profile;

use crate::cutlist::CutListEntry;
use crate::materials::Material;
use crate::BuildError;

/// A rectangular through-hole, centered at `(cx, cy)` in the board's
/// corner-origin profile frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectHole {
    /// Center u coordinate (along the board width).
    pub cx: f64,
    /// Center v coordinate (along the board height).
    pub cy: f64,
    /// Hole width.
    pub width: f64,
    /// Hole height.
    pub height: f64,
}

/// A circular through-hole, centered at `(cx, cy)` in the board's
/// corner-origin profile frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircleHole {
    /// Center u coordinate.
    pub cx: f64,
    /// Center v coordinate.
    pub cy: f64,
    /// Hole diameter.
    pub diameter: f64,
}

/// One physical plank: profile, thickness, placement and cut-list
/// metadata.
///
/// The profile is a rectangle `max_width x max_height`, or a pentagon
/// with one slanted edge from `(max_width, min_height)` to
/// `(min_width, max_height)` when `min_width` is nonzero. Placement
/// rotates the extruded solid about world X, then Y, then Z (degrees)
/// and finally translates it to `position`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardSpec {
    /// Board name, shown on the cut list.
    pub name: String,
    /// Human-readable purpose of the board.
    pub description: String,
    /// Identical copies represented by this record.
    pub quantity: u32,
    /// Outer profile width in mm.
    pub max_width: f64,
    /// Outer profile height in mm.
    pub max_height: f64,
    /// Notch start along the width; `0` means no slant.
    pub min_width: f64,
    /// Notch start along the height; `0` means the full rectangle.
    pub min_height: f64,
    /// Extrusion depth in mm.
    pub thickness: f64,
    /// World-frame translation applied after rotation.
    pub position: [f64; 3],
    /// Sequential world-axis rotation in degrees, X then Y then Z.
    pub rotation: [f64; 3],
    /// Rectangular through-holes.
    pub rect_holes: Vec<RectHole>,
    /// Circular through-holes.
    pub circle_holes: Vec<CircleHole>,
    /// Render material.
    pub material: Material,
    /// Whether the board appears on the cut list. Keys and other
    /// non-plywood parts are placed but not listed.
    pub listed: bool,
}

impl BoardSpec {
    /// A plain rectangular board at the origin.
    pub fn new(name: impl Into<String>, max_width: f64, max_height: f64, thickness: f64) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            quantity: 1,
            max_width,
            max_height,
            min_width: 0.0,
            min_height: 0.0,
            thickness,
            position: [0.0; 3],
            rotation: [0.0; 3],
            rect_holes: Vec::new(),
            circle_holes: Vec::new(),
            material: Material::default(),
            listed: true,
        }
    }

    /// Set the cut-list description.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Turn the rectangle into a notched pentagon.
    pub fn with_notch(mut self, min_width: f64, min_height: f64) -> Self {
        self.min_width = min_width;
        self.min_height = min_height;
        self
    }

    /// Place the board.
    pub fn at(mut self, position: [f64; 3]) -> Self {
        self.position = position;
        self
    }

    /// Rotate the board (degrees, world X then Y then Z).
    pub fn rotated(mut self, rotation: [f64; 3]) -> Self {
        self.rotation = rotation;
        self
    }

    /// Add a rectangular through-hole.
    pub fn with_rect_hole(mut self, cx: f64, cy: f64, width: f64, height: f64) -> Self {
        self.rect_holes.push(RectHole {
            cx,
            cy,
            width,
            height,
        });
        self
    }

    /// Add a circular through-hole.
    pub fn with_circle_hole(mut self, cx: f64, cy: f64, diameter: f64) -> Self {
        self.circle_holes.push(CircleHole { cx, cy, diameter });
        self
    }

    /// Set the render material.
    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    /// Exclude the board from the cut list.
    pub fn unlisted(mut self) -> Self {
        self.listed = false;
        self
    }

    fn check_positive(&self, dimension: &'static str, value: f64) -> Result<(), BuildError> {
        if value > 0.0 {
            Ok(())
        } else {
            Err(BuildError::NonPositiveDimension {
                board: self.name.clone(),
                dimension,
                value,
            })
        }
    }

    /// Build the placed solid mesh for this board.
    pub fn build(&self, quality: TessellationQuality) -> Result<TriangleMesh, BuildError> {
        self.check_positive("max_width", self.max_width)?;
        self.check_positive("max_height", self.max_height)?;
        self.check_positive("thickness", self.thickness)?;

        let mut profile = Profile::board(
            self.max_width,
            self.max_height,
            self.min_width,
            self.min_height,
        )
        .map_err(|source| BuildError::Profile {
            board: self.name.clone(),
            source,
        })?;

        for h in &self.rect_holes {
            profile
                .add_rect_hole(h.cx, h.cy, h.width, h.height)
                .map_err(|source| BuildError::Profile {
                    board: self.name.clone(),
                    source,
                })?;
        }
        for h in &self.circle_holes {
            profile
                .add_circle_hole(h.cx, h.cy, h.diameter, quality.circle_segments())
                .map_err(|source| BuildError::Profile {
                    board: self.name.clone(),
                    source,
                })?;
        }

        let mut mesh = extrude_profile(&profile, self.thickness).map_err(|source| {
            BuildError::Mesh {
                board: self.name.clone(),
                source,
            }
        })?;
        mesh.apply_transform(&Transform::placement(self.position, self.rotation));
        Ok(mesh)
    }

    /// The cut-list record for this board. Same fields, no re-derivation.
    pub fn cut_entry(&self) -> CutListEntry {
        let notes = if self.min_width > 0.0 {
            format!(
                "Notch at: X={}mm, Y={}mm",
                self.min_width, self.min_height
            )
        } else {
            String::new()
        };
        CutListEntry {
            name: self.name.clone(),
            width: self.max_width,
            height: self.max_height,
            thickness: self.thickness,
            quantity: self.quantity,
            description: self.description.clone(),
            notes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_board_bounding_box() {
        let spec = BoardSpec::new("Test", 500.0, 300.0, 18.0);
        let mesh = spec.build(TessellationQuality::Medium).unwrap();
        let (min, max) = mesh.bounding_box().unwrap();
        assert!((min.x).abs() < 1e-6 && (max.x - 18.0).abs() < 1e-6);
        assert!((min.y).abs() < 1e-6 && (max.y - 500.0).abs() < 1e-6);
        assert!((min.z).abs() < 1e-6 && (max.z - 300.0).abs() < 1e-6);
    }

    #[test]
    fn test_notched_board_notes() {
        let spec = BoardSpec::new("Side", 650.0, 350.0, 18.0).with_notch(350.0, 150.0);
        let entry = spec.cut_entry();
        assert_eq!(entry.notes, "Notch at: X=350mm, Y=150mm");
    }

    #[test]
    fn test_hole_reduces_volume() {
        let solid = BoardSpec::new("A", 200.0, 100.0, 18.0)
            .build(TessellationQuality::Medium)
            .unwrap();
        let holed = BoardSpec::new("B", 200.0, 100.0, 18.0)
            .with_rect_hole(100.0, 50.0, 40.0, 20.0)
            .build(TessellationQuality::Medium)
            .unwrap();
        let expected = solid.volume() - 40.0 * 20.0 * 18.0;
        assert!((holed.volume() - expected).abs() < 1e-3);
    }

    #[test]
    fn test_zero_thickness_is_rejected() {
        let err = BoardSpec::new("Bad", 100.0, 100.0, 0.0)
            .build(TessellationQuality::Medium)
            .unwrap_err();
        assert!(matches!(
            err,
            BuildError::NonPositiveDimension {
                dimension: "thickness",
                ..
            }
        ));
    }

    #[test]
    fn test_rotation_swaps_axes() {
        // (0,0,90) stands the board up along -X: width along X, the
        // 18 mm thickness along Y.
        let spec = BoardSpec::new("Back", 500.0, 300.0, 18.0).rotated([0.0, 0.0, 90.0]);
        let mesh = spec.build(TessellationQuality::Medium).unwrap();
        let (min, max) = mesh.bounding_box().unwrap();
        assert!((min.x + 500.0).abs() < 1e-6 && max.x.abs() < 1e-6);
        assert!(min.y.abs() < 1e-6 && (max.y - 18.0).abs() < 1e-6);
        assert!((max.z - 300.0).abs() < 1e-6);
    }
}
