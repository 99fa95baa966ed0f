#![warn(missing_docs)]

//! Planar board profiles for the orgelbau console generator.
//!
//! Every plank in a console is an extrusion of a simple polygon: a
//! rectangle, or a pentagon with one slanted edge for notched cabinet
//! sides. Through-holes are additional closed loops inside the outline.
//! This crate builds and validates those polygons; extrusion lives in
//! `orgelbau-mesh`.

use std::f64::consts::PI;

use orgelbau_math::{Point2, Tolerance};
use thiserror::Error;

/// Errors produced while constructing a profile.
#[derive(Error, Debug)]
pub enum ProfileError {
    /// The outline or a hole loop has fewer than three vertices.
    #[error("polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),
    /// Two consecutive vertices coincide.
    #[error("degenerate edge at vertex {0}")]
    DegenerateEdge(usize),
    /// The polygon encloses no area.
    #[error("polygon has zero area")]
    ZeroArea,
}

/// Outline vertices for a board profile, in the fixed construction order.
///
/// `min_height == 0` means a plain rectangle. A nonzero `min_width`
/// introduces the slanted edge from `(max_width, min_height)` to
/// `(min_width, max_height)` used for notched cabinet sides:
///
/// ```text
/// (0,h) ──── (min_w,h)
///   │             ╲
///   │              (max_w,min_h)
///   │                   │
/// (0,0) ────────── (max_w,0)
/// ```
pub fn board_outline(
    max_width: f64,
    max_height: f64,
    min_width: f64,
    min_height: f64,
) -> Vec<Point2> {
    let min_height = if min_height == 0.0 {
        max_height
    } else {
        min_height
    };

    let mut points = vec![
        Point2::new(0.0, 0.0),
        Point2::new(max_width, 0.0),
        Point2::new(max_width, min_height),
        Point2::new(min_width, max_height),
        Point2::new(0.0, max_height),
    ];

    if min_width == 0.0 {
        // No slant: drop the notch vertex. If min_height was also zero the
        // remaining four corners are the plain rectangle.
        points.remove(3);
    }

    points
}

/// A rectangle loop centered at `(cx, cy)`, counter-clockwise.
pub fn rect_loop(cx: f64, cy: f64, width: f64, height: f64) -> Vec<Point2> {
    let hw = width / 2.0;
    let hh = height / 2.0;
    vec![
        Point2::new(cx - hw, cy - hh),
        Point2::new(cx + hw, cy - hh),
        Point2::new(cx + hw, cy + hh),
        Point2::new(cx - hw, cy + hh),
    ]
}

/// A circle loop centered at `(cx, cy)` approximated by `segments` chords,
/// counter-clockwise.
pub fn circle_loop(cx: f64, cy: f64, diameter: f64, segments: u32) -> Vec<Point2> {
    let r = diameter / 2.0;
    let n = segments.max(3) as usize;
    (0..n)
        .map(|i| {
            let theta = 2.0 * PI * (i as f64) / (n as f64);
            Point2::new(cx + r * theta.cos(), cy + r * theta.sin())
        })
        .collect()
}

/// Signed area of a polygon (positive when counter-clockwise).
pub fn signed_area(points: &[Point2]) -> f64 {
    let n = points.len();
    let mut area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        area += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    area / 2.0
}

fn validate_loop(points: &[Point2]) -> Result<(), ProfileError> {
    if points.len() < 3 {
        return Err(ProfileError::TooFewVertices(points.len()));
    }
    let tol = Tolerance::DEFAULT;
    for i in 0..points.len() {
        let j = (i + 1) % points.len();
        if (points[j] - points[i]).norm() < tol.linear {
            return Err(ProfileError::DegenerateEdge(i));
        }
    }
    if signed_area(points).abs() < tol.linear {
        return Err(ProfileError::ZeroArea);
    }
    Ok(())
}

/// A closed board profile: one outline polygon plus interior hole loops.
///
/// Coordinates are in the board's own corner frame: the outline's
/// bottom-left corner is the origin, `u` runs along the board width and
/// `v` along the height. Whether a hole actually lies inside the outline
/// is not validated here; an out-of-bounds hole produces whatever
/// geometry the extrusion step makes of it.
#[derive(Debug, Clone)]
pub struct Profile {
    /// Outline polygon, counter-clockwise.
    pub outline: Vec<Point2>,
    /// Interior hole loops.
    pub holes: Vec<Vec<Point2>>,
}

impl Profile {
    /// Create a profile from an outline polygon.
    ///
    /// # Errors
    ///
    /// Fails if the outline has fewer than three vertices, contains a
    /// zero-length edge, or encloses no area.
    pub fn new(outline: Vec<Point2>) -> Result<Self, ProfileError> {
        validate_loop(&outline)?;
        // Extrusion assumes counter-clockwise outlines.
        let outline = if signed_area(&outline) < 0.0 {
            outline.into_iter().rev().collect()
        } else {
            outline
        };
        Ok(Self {
            outline,
            holes: Vec::new(),
        })
    }

    /// Convenience constructor for the standard board shapes.
    pub fn board(
        max_width: f64,
        max_height: f64,
        min_width: f64,
        min_height: f64,
    ) -> Result<Self, ProfileError> {
        Self::new(board_outline(max_width, max_height, min_width, min_height))
    }

    /// Add a rectangular through-hole centered at `(cx, cy)`.
    pub fn add_rect_hole(
        &mut self,
        cx: f64,
        cy: f64,
        width: f64,
        height: f64,
    ) -> Result<(), ProfileError> {
        self.add_hole(rect_loop(cx, cy, width, height))
    }

    /// Add a circular through-hole centered at `(cx, cy)`.
    pub fn add_circle_hole(
        &mut self,
        cx: f64,
        cy: f64,
        diameter: f64,
        segments: u32,
    ) -> Result<(), ProfileError> {
        self.add_hole(circle_loop(cx, cy, diameter, segments))
    }

    /// Add an arbitrary hole loop.
    pub fn add_hole(&mut self, points: Vec<Point2>) -> Result<(), ProfileError> {
        validate_loop(&points)?;
        let points = if signed_area(&points) < 0.0 {
            points.into_iter().rev().collect()
        } else {
            points
        };
        self.holes.push(points);
        Ok(())
    }

    /// Number of outline vertices.
    pub fn num_vertices(&self) -> usize {
        self.outline.len()
    }

    /// Enclosed area (outline minus holes).
    pub fn area(&self) -> f64 {
        let outer = signed_area(&self.outline).abs();
        let holes: f64 = self.holes.iter().map(|h| signed_area(h).abs()).sum();
        outer - holes
    }

    /// Axis-aligned bounds of the outline as `(min, max)`.
    pub fn bounds(&self) -> (Point2, Point2) {
        let mut min = Point2::new(f64::INFINITY, f64::INFINITY);
        let mut max = Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in &self.outline {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        (min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle_outline() {
        let pts = board_outline(500.0, 300.0, 0.0, 0.0);
        assert_eq!(pts.len(), 4);
        assert_eq!(pts[0], Point2::new(0.0, 0.0));
        assert_eq!(pts[1], Point2::new(500.0, 0.0));
        assert_eq!(pts[2], Point2::new(500.0, 300.0));
        assert_eq!(pts[3], Point2::new(0.0, 300.0));
    }

    #[test]
    fn test_notched_outline_is_pentagon() {
        let pts = board_outline(500.0, 300.0, 350.0, 150.0);
        assert_eq!(pts.len(), 5);
        // Slant edge runs from (500, 150) to (350, 300).
        assert_eq!(pts[2], Point2::new(500.0, 150.0));
        assert_eq!(pts[3], Point2::new(350.0, 300.0));
    }

    #[test]
    fn test_min_height_only_keeps_rectangle() {
        // min_width == 0 removes the slant vertex regardless of min_height.
        let pts = board_outline(500.0, 300.0, 0.0, 150.0);
        assert_eq!(pts.len(), 4);
        assert_eq!(pts[2], Point2::new(500.0, 150.0));
        assert_eq!(pts[3], Point2::new(0.0, 300.0));
    }

    #[test]
    fn test_profile_area() {
        let mut profile = Profile::board(100.0, 50.0, 0.0, 0.0).unwrap();
        assert!((profile.area() - 5000.0).abs() < 1e-9);
        profile.add_rect_hole(50.0, 25.0, 10.0, 10.0).unwrap();
        assert!((profile.area() - 4900.0).abs() < 1e-9);
    }

    #[test]
    fn test_circle_loop_radius() {
        let pts = circle_loop(10.0, 20.0, 8.0, 16);
        assert_eq!(pts.len(), 16);
        for p in &pts {
            let r = ((p.x - 10.0).powi(2) + (p.y - 20.0).powi(2)).sqrt();
            assert!((r - 4.0).abs() < 1e-12);
        }
        assert!(signed_area(&pts) > 0.0);
    }

    #[test]
    fn test_too_few_vertices() {
        let result = Profile::new(vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)]);
        assert!(matches!(result, Err(ProfileError::TooFewVertices(2))));
    }

    #[test]
    fn test_degenerate_edge() {
        let result = Profile::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ]);
        assert!(matches!(result, Err(ProfileError::DegenerateEdge(0))));
    }

    #[test]
    fn test_zero_area() {
        let result = Profile::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(2.0, 2.0),
        ]);
        assert!(matches!(result, Err(ProfileError::ZeroArea)));
    }

    #[test]
    fn test_clockwise_outline_is_reversed() {
        let profile = Profile::new(vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 10.0),
            Point2::new(10.0, 10.0),
            Point2::new(10.0, 0.0),
        ])
        .unwrap();
        assert!(signed_area(&profile.outline) > 0.0);
    }
}
