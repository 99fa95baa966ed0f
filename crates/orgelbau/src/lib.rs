#![warn(missing_docs)]

//! Parametric pipe-organ console generator.
//!
//! Given a named parameter set, this crate lays out the boards of a
//! console variant (bench, normal tower, vertical cabinet, pedalboard),
//! builds the 3D assembly, derives the cutting list from the very same
//! board records, and writes the export formats:
//!
//! - CSV cutting list
//! - DXF nesting profiles at 1:10
//! - binary STL and embedded-buffer glTF of the assembly
//! - faceted STEP
//! - an A3 SVG technical-drawing sheet
//!
//! Every plank is described once as a [`BoardSpec`]; the 3D build and the
//! cut list both consume that record, so the two can never drift apart.
//!
//! ```no_run
//! use orgelbau::consoles::{self, ConsoleKind};
//! use orgelbau::TessellationQuality;
//!
//! let params = consoles::default_parameters(ConsoleKind::Bench);
//! let assembly = consoles::generate_console(
//!     ConsoleKind::Bench,
//!     &params,
//!     TessellationQuality::Medium,
//! )?;
//! orgelbau::export::export_assembly(&assembly, "bench.gltf".as_ref())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use thiserror::Error;

pub mod assembly;
pub mod board;
pub mod consoles;
pub mod cutlist;
pub mod export;
pub mod materials;

pub use assembly::{Assembly, Part};
pub use board::{BoardSpec, CircleHole, RectHole};
pub use cutlist::{cut_list, total_area_m2, CutListEntry};
pub use materials::Material;
pub use orgelbau_mesh::TessellationQuality;
pub use orgelbau_params::{ParamError, ParamValue, ParameterSet};

/// Errors produced while turning parameters into geometry.
#[derive(Error, Debug)]
pub enum BuildError {
    /// Parameter resolution or lookup failed.
    #[error(transparent)]
    Param(#[from] orgelbau_params::ParamError),
    /// A board profile could not be constructed.
    #[error("board `{board}`: {source}")]
    Profile {
        /// Board that failed.
        board: String,
        /// Underlying profile error.
        source: orgelbau_sketch::ProfileError,
    },
    /// Extrusion failed.
    #[error("board `{board}`: {source}")]
    Mesh {
        /// Board that failed.
        board: String,
        /// Underlying mesh error.
        source: orgelbau_mesh::MeshError,
    },
    /// A derived board dimension came out zero or negative.
    #[error("board `{board}`: {dimension} must be positive, got {value}")]
    NonPositiveDimension {
        /// Board that failed.
        board: String,
        /// Which dimension was invalid.
        dimension: &'static str,
        /// The offending value.
        value: f64,
    },
}
