//! Console variants and the generic assembler.
//!
//! Each variant module declares its parameter [`Schema`] and produces a
//! declarative list of [`BoardSpec`]s; [`assemble`] turns any such list
//! into an [`Assembly`]. No variant owns its own geometry code.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use orgelbau_mesh::TessellationQuality;
use orgelbau_params::{ParameterSet, Schema};

use crate::assembly::{Assembly, Part};
use crate::board::BoardSpec;
use crate::BuildError;

pub mod bench;
pub mod keyboard;
pub mod normal;
pub mod pattern;
pub mod pedalboard;
pub mod vertical;

pub use pattern::generate_ago_pattern;

/// The console variants this generator knows how to lay out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleKind {
    /// The organ bench.
    Bench,
    /// The compact tower console.
    Normal,
    /// The large bench-style cabinet.
    Vertical,
    /// The AGO pedalboard.
    Pedalboard,
}

impl ConsoleKind {
    /// All variants, for iteration in tests and the CLI.
    pub const ALL: [ConsoleKind; 4] = [
        ConsoleKind::Bench,
        ConsoleKind::Normal,
        ConsoleKind::Vertical,
        ConsoleKind::Pedalboard,
    ];

    /// Lowercase variant name.
    pub fn name(&self) -> &'static str {
        match self {
            ConsoleKind::Bench => "bench",
            ConsoleKind::Normal => "normal",
            ConsoleKind::Vertical => "vertical",
            ConsoleKind::Pedalboard => "pedalboard",
        }
    }
}

impl fmt::Display for ConsoleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ConsoleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bench" => Ok(ConsoleKind::Bench),
            "normal" => Ok(ConsoleKind::Normal),
            "vertical" => Ok(ConsoleKind::Vertical),
            "pedalboard" => Ok(ConsoleKind::Pedalboard),
            other => Err(format!("unknown console kind `{other}`")),
        }
    }
}

/// The parameter schema of a variant.
pub fn schema(kind: ConsoleKind) -> Schema {
    match kind {
        ConsoleKind::Bench => bench::schema(),
        ConsoleKind::Normal => normal::schema(),
        ConsoleKind::Vertical => vertical::schema(),
        ConsoleKind::Pedalboard => pedalboard::schema(),
    }
}

/// The reference parameter set of a variant.
pub fn default_parameters(kind: ConsoleKind) -> ParameterSet {
    match kind {
        ConsoleKind::Bench => bench::default_parameters(),
        ConsoleKind::Normal => normal::default_parameters(),
        ConsoleKind::Vertical => vertical::default_parameters(),
        ConsoleKind::Pedalboard => pedalboard::default_parameters(),
    }
}

/// The declarative board layout of a variant.
pub fn board_specs(
    kind: ConsoleKind,
    params: &ParameterSet,
) -> Result<Vec<BoardSpec>, BuildError> {
    let specs = match kind {
        ConsoleKind::Bench => bench::board_specs(params)?,
        ConsoleKind::Normal => normal::board_specs(params)?,
        ConsoleKind::Vertical => vertical::board_specs(params)?,
        ConsoleKind::Pedalboard => pedalboard::board_specs(params)?,
    };
    debug!(console = kind.name(), boards = specs.len(), "laid out boards");
    Ok(specs)
}

/// Build every board of a layout into one assembly. Repeated board
/// names get a running suffix so parts stay addressable in exports.
pub fn assemble(
    name: &str,
    specs: &[BoardSpec],
    quality: TessellationQuality,
) -> Result<Assembly, BuildError> {
    let mut assembly = Assembly::new(name);
    let mut seen: HashMap<&str, usize> = HashMap::new();

    for spec in specs {
        let mesh = spec.build(quality)?;
        let count = seen.entry(spec.name.as_str()).or_insert(0);
        *count += 1;
        let part_name = if *count == 1 {
            spec.name.clone()
        } else {
            format!("{} {}", spec.name, count)
        };
        debug!(
            part = %part_name,
            triangles = mesh.num_triangles(),
            "built board"
        );
        assembly.parts.push(Part {
            name: part_name,
            material: spec.material,
            mesh,
        });
    }

    info!(
        console = name,
        parts = assembly.num_parts(),
        "assembled console"
    );
    Ok(assembly)
}

/// Generate a complete console assembly from a parameter set.
pub fn generate_console(
    kind: ConsoleKind,
    params: &ParameterSet,
    quality: TessellationQuality,
) -> Result<Assembly, BuildError> {
    let specs = board_specs(kind, params)?;
    assemble(kind.name(), &specs, quality)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_through_strings() {
        for kind in ConsoleKind::ALL {
            assert_eq!(kind.name().parse::<ConsoleKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_every_variant_generates_with_defaults() {
        for kind in ConsoleKind::ALL {
            let params = default_parameters(kind);
            let assembly =
                generate_console(kind, &params, TessellationQuality::Coarse).unwrap();
            assert!(assembly.num_parts() > 0, "{kind} produced no parts");
            assert!(assembly.bounding_box().is_some());
        }
    }

    #[test]
    fn test_generation_is_idempotent() {
        for kind in ConsoleKind::ALL {
            let params = default_parameters(kind);
            let a = generate_console(kind, &params, TessellationQuality::Coarse).unwrap();
            let b = generate_console(kind, &params, TessellationQuality::Coarse).unwrap();
            assert_eq!(a.num_parts(), b.num_parts());
            let (a_min, a_max) = a.bounding_box().unwrap();
            let (b_min, b_max) = b.bounding_box().unwrap();
            assert!((a_min - b_min).norm() < 1e-12);
            assert!((a_max - b_max).norm() < 1e-12);
        }
    }

    #[test]
    fn test_repeated_boards_get_suffixed_names() {
        let params = default_parameters(ConsoleKind::Normal);
        let specs = board_specs(ConsoleKind::Normal, &params).unwrap();
        let assembly = assemble("normal", &specs, TessellationQuality::Coarse).unwrap();
        assert!(assembly.parts.iter().any(|p| p.name == "Volume Pedals"));
        assert!(assembly.parts.iter().any(|p| p.name == "Volume Pedals 3"));
    }

    #[test]
    fn test_cut_list_matches_layout_for_every_variant() {
        for kind in ConsoleKind::ALL {
            let specs = board_specs(kind, &default_parameters(kind)).unwrap();
            for entry in crate::cutlist::cut_list(&specs) {
                let spec = specs
                    .iter()
                    .find(|s| s.name == entry.name && s.listed)
                    .unwrap();
                assert_eq!(entry.width, spec.max_width, "{kind}: {}", entry.name);
                assert_eq!(entry.height, spec.max_height, "{kind}: {}", entry.name);
                assert_eq!(entry.thickness, spec.thickness, "{kind}: {}", entry.name);
            }
        }
    }
}
