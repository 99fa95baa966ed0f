//! Core types for 2D drawing generation.

use orgelbau_math::{Point3, Vec3};
use serde::{Deserialize, Serialize};

/// A 2D point in view coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl Point2D {
    /// Create a new 2D point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Distance to another point.
    pub fn distance(&self, other: &Self) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Direction for orthographic or isometric projection.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum ViewDirection {
    /// Front view: looking along +Y (XZ plane visible).
    #[default]
    Front,
    /// Back view: looking along -Y.
    Back,
    /// Top view: looking along -Z (XY plane visible).
    Top,
    /// Bottom view: looking along +Z.
    Bottom,
    /// Right view: looking along -X (YZ plane visible).
    Right,
    /// Left view: looking along +X.
    Left,
    /// Isometric view with azimuth and elevation in radians.
    Isometric {
        /// Rotation around the Z axis, radians.
        azimuth: f64,
        /// Angle above the XY plane, radians.
        elevation: f64,
    },
}

impl ViewDirection {
    /// Standard isometric view (30°/30°).
    pub const ISOMETRIC_STANDARD: Self = Self::Isometric {
        azimuth: std::f64::consts::FRAC_PI_6,
        elevation: std::f64::consts::FRAC_PI_6,
    };

    /// Unit vector pointing from the viewer toward the model.
    pub fn view_vector(&self) -> Vec3 {
        match self {
            ViewDirection::Front => Vec3::new(0.0, 1.0, 0.0),
            ViewDirection::Back => Vec3::new(0.0, -1.0, 0.0),
            ViewDirection::Top => Vec3::new(0.0, 0.0, -1.0),
            ViewDirection::Bottom => Vec3::new(0.0, 0.0, 1.0),
            ViewDirection::Right => Vec3::new(1.0, 0.0, 0.0),
            ViewDirection::Left => Vec3::new(-1.0, 0.0, 0.0),
            ViewDirection::Isometric { azimuth, elevation } => {
                let (sin_el, cos_el) = elevation.sin_cos();
                let (sin_az, cos_az) = azimuth.sin_cos();
                Vec3::new(cos_el * sin_az, cos_el * cos_az, -sin_el)
            }
        }
    }

    /// Up vector orienting the 2D projection.
    pub fn up_vector(&self) -> Vec3 {
        match self {
            ViewDirection::Top => Vec3::new(0.0, 1.0, 0.0),
            ViewDirection::Bottom => Vec3::new(0.0, -1.0, 0.0),
            _ => Vec3::new(0.0, 0.0, 1.0),
        }
    }
}

/// Visibility of a projected edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    /// Not occluded by any face.
    Visible,
    /// Occluded by at least one face.
    Hidden,
}

/// Geometric classification of a mesh edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EdgeType {
    /// Dihedral angle between adjacent faces exceeds the threshold.
    Sharp,
    /// Boundary between a front-facing and a back-facing face.
    Silhouette,
    /// Only one adjacent face.
    Boundary,
}

/// A 2D projected edge with visibility information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectedEdge {
    /// Start point in view coordinates.
    pub start: Point2D,
    /// End point in view coordinates.
    pub end: Point2D,
    /// Visibility classification.
    pub visibility: Visibility,
    /// Edge classification.
    pub edge_type: EdgeType,
    /// Depth of the edge midpoint (larger is farther from the viewer).
    pub depth: f64,
}

impl ProjectedEdge {
    /// Length of the edge in 2D.
    pub fn length(&self) -> f64 {
        self.start.distance(&self.end)
    }
}

/// 2D axis-aligned bounding box.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BoundingBox2D {
    /// Minimum X.
    pub min_x: f64,
    /// Minimum Y.
    pub min_y: f64,
    /// Maximum X.
    pub max_x: f64,
    /// Maximum Y.
    pub max_y: f64,
}

impl BoundingBox2D {
    /// An empty (inverted) box.
    pub fn empty() -> Self {
        Self {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    /// Expand to include a point.
    pub fn include_point(&mut self, p: Point2D) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    /// Width of the box.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the box.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Whether at least one point was included.
    pub fn is_valid(&self) -> bool {
        self.min_x <= self.max_x && self.min_y <= self.max_y
    }
}

impl Default for BoundingBox2D {
    fn default() -> Self {
        Self::empty()
    }
}

/// A complete projected view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectedView {
    /// All projected edges.
    pub edges: Vec<ProjectedEdge>,
    /// 2D bounds of the view.
    pub bounds: BoundingBox2D,
    /// Direction used for this projection.
    pub view_direction: ViewDirection,
}

impl ProjectedView {
    /// Create an empty view.
    pub fn new(view_direction: ViewDirection) -> Self {
        Self {
            edges: Vec::new(),
            bounds: BoundingBox2D::empty(),
            view_direction,
        }
    }

    /// Add an edge and grow the bounds.
    pub fn add_edge(&mut self, edge: ProjectedEdge) {
        self.bounds.include_point(edge.start);
        self.bounds.include_point(edge.end);
        self.edges.push(edge);
    }

    /// Visible edges only.
    pub fn visible_edges(&self) -> impl Iterator<Item = &ProjectedEdge> {
        self.edges
            .iter()
            .filter(|e| e.visibility == Visibility::Visible)
    }

    /// Hidden edges only.
    pub fn hidden_edges(&self) -> impl Iterator<Item = &ProjectedEdge> {
        self.edges
            .iter()
            .filter(|e| e.visibility == Visibility::Hidden)
    }

    /// Number of visible edges.
    pub fn num_visible(&self) -> usize {
        self.visible_edges().count()
    }
}

/// A welded triangle used for classification and occlusion tests.
#[derive(Debug, Clone, Copy)]
pub struct Triangle3D {
    /// First corner.
    pub v0: Point3,
    /// Second corner.
    pub v1: Point3,
    /// Third corner.
    pub v2: Point3,
    /// Unit face normal.
    pub normal: Vec3,
}

impl Triangle3D {
    /// Build a triangle, computing its normal. Returns `None` when the
    /// corners are collinear.
    pub fn new(v0: Point3, v1: Point3, v2: Point3) -> Option<Self> {
        let n = (v1 - v0).cross(&(v2 - v0));
        if n.norm() < 1e-12 {
            return None;
        }
        Some(Self {
            v0,
            v1,
            v2,
            normal: n.normalize(),
        })
    }

    /// Whether the face points toward a viewer looking along `view_dir`
    /// (the vector from the viewer toward the model).
    pub fn faces_viewer(&self, view_dir: &Vec3) -> bool {
        self.normal.dot(view_dir) < 0.0
    }
}
