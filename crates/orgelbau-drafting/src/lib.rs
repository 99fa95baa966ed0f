#![warn(missing_docs)]

//! 2D projection for technical drawing sheets.
//!
//! Turns a board-assembly triangle mesh into flat edge sets suitable for
//! an SVG or DXF sheet:
//!
//! - **Orthographic projection**: Front, Back, Top, Bottom, Left, Right
//! - **Isometric projection** with configurable azimuth/elevation
//! - **Edge classification**: sharp, silhouette, and boundary edges
//! - **Hidden-line classification** for dashed rendering
//!
//! # Example
//!
//! ```ignore
//! use orgelbau_drafting::{project_mesh, ViewDirection};
//!
//! let view = project_mesh(&mesh, ViewDirection::Front);
//! for edge in view.visible_edges() {
//!     // draw a solid line from edge.start to edge.end
//! }
//! for edge in view.hidden_edges() {
//!     // draw a dashed line
//! }
//! ```

pub mod edge_extract;
pub mod hidden_line;
pub mod types;

pub use edge_extract::{WeldedEdge, WeldedMesh, DEFAULT_SHARP_ANGLE};
pub use hidden_line::{project_mesh, project_mesh_with_options};
pub use types::{
    BoundingBox2D, EdgeType, Point2D, ProjectedEdge, ProjectedView, Triangle3D, ViewDirection,
    Visibility,
};
