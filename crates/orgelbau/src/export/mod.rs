//! File exporters for assemblies, cutting lists and drawings.
//!
//! All formats are written directly; none of them needs more than the
//! triangle meshes, the board records and the projected views already
//! in memory.

use std::io;
use std::path::Path;

use thiserror::Error;
use tracing::{info, warn};

use crate::assembly::Assembly;

pub mod csv;
pub mod dxf;
pub mod gltf;
pub mod step;
pub mod stl;
pub mod svg;

pub use csv::write_cut_list_csv;
pub use dxf::write_cut_list_dxf;
pub use gltf::write_gltf;
pub use step::write_step;
pub use stl::write_stl;
pub use svg::write_drawing_svg;

/// Errors produced while writing export files.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Filesystem failure.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// glTF document serialization failed.
    #[error("glTF serialization: {0}")]
    Json(#[from] serde_json::Error),
    /// The path extension names no known format.
    #[error("unsupported export format `{0}`")]
    UnsupportedFormat(String),
    /// Nothing to export.
    #[error("assembly `{0}` has no parts")]
    EmptyAssembly(String),
}

/// Write an assembly to `path`, choosing the format from the extension
/// (`gltf`, `stl` or `step`/`stp`).
pub fn export_assembly(assembly: &Assembly, path: &Path) -> Result<(), ExportError> {
    if assembly.parts.is_empty() {
        return Err(ExportError::EmptyAssembly(assembly.name.clone()));
    }
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "gltf" => write_gltf(assembly, path)?,
        "stl" => write_stl(assembly, path)?,
        "step" | "stp" => write_step(assembly, path)?,
        other => return Err(ExportError::UnsupportedFormat(other.to_string())),
    }
    info!(path = %path.display(), format = %ext, "wrote assembly");
    Ok(())
}

/// Write the assembly as glTF, falling back to binary STL (with the
/// `.stl` extension swapped in) when the glTF document cannot be built.
pub fn export_with_fallback(assembly: &Assembly, path: &Path) -> Result<(), ExportError> {
    if assembly.parts.is_empty() {
        return Err(ExportError::EmptyAssembly(assembly.name.clone()));
    }
    match write_gltf(assembly, path) {
        Ok(()) => Ok(()),
        Err(err) => {
            let fallback = path.with_extension("stl");
            warn!(
                path = %path.display(),
                error = %err,
                "glTF export failed, writing STL instead"
            );
            write_stl(assembly, &fallback)?;
            Ok(())
        }
    }
}
