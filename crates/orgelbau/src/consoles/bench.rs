//! The organ bench: eight boards in a simple rectangular frame.

use orgelbau_params::{ParamSpec, ParameterSet, Schema};

use crate::board::BoardSpec;
use crate::materials::Material;
use crate::BuildError;

/// Parameter schema for the bench.
pub fn schema() -> Schema {
    Schema::new(
        "bench",
        vec![
            ParamSpec::with_default("board_thickness", "General_and_base", 18.0),
            ParamSpec::with_default("board_offset", "General_and_base", 10.0),
            ParamSpec::with_default("feet_thickness", "General_and_base", 50.0),
            ParamSpec::with_default("bench_depth", "Bench", 350.0),
            ParamSpec::with_default("bench_height", "Bench", 600.0),
            ParamSpec::with_default("bench_length", "Bench", 900.0),
            ParamSpec::with_default("bench_shelf_height", "Bench", 100.0),
        ],
    )
}

/// The reference parameter set.
pub fn default_parameters() -> ParameterSet {
    schema().defaults()
}

/// Lay out the bench boards.
pub fn board_specs(params: &ParameterSet) -> Result<Vec<BoardSpec>, BuildError> {
    let p = schema().resolve(params)?;

    let t = p.get_f64("board_thickness")?;
    let offset = p.get_f64("board_offset")?;
    let feet = p.get_f64("feet_thickness")?;
    let depth = p.get_f64("bench_depth")?;
    let height = p.get_f64("bench_height")?;
    let length = p.get_f64("bench_length")?;
    let shelf_height = p.get_f64("bench_shelf_height")?;

    let panel_height = height - t - feet;
    let inner_length = length - 2.0 * t - 2.0 * offset;

    let specs = vec![
        BoardSpec::new("Bench Top", depth, length, t)
            .describe("Top of the bench")
            .at([-length / 2.0, 0.0, height])
            .rotated([0.0, 90.0, 0.0])
            .with_material(Material::Walnut),
        BoardSpec::new("Bench Left", depth - 2.0 * offset, panel_height, t)
            .describe("Left panel of the bench")
            .at([-length / 2.0 + offset, offset, feet])
            .with_material(Material::Walnut),
        BoardSpec::new("Bench Right", depth - 2.0 * offset, panel_height, t)
            .describe("Right panel of the bench")
            .at([length / 2.0 - offset - t, offset, feet])
            .with_material(Material::Walnut),
        BoardSpec::new("Bench Left Foot", depth, feet, feet)
            .describe("Left foot of the bench")
            .at([-feet / 2.0 - length / 2.0 + offset + t / 2.0, offset, 0.0])
            .with_material(Material::Walnut),
        BoardSpec::new("Bench Right Foot", depth, feet, feet)
            .describe("Right foot of the bench")
            .at([-feet / 2.0 + length / 2.0 - offset - t / 2.0, offset, 0.0])
            .with_material(Material::Walnut),
        BoardSpec::new("Bench Shelf Back Panel", shelf_height, inner_length, t)
            .describe("Bench back panel of the shelf")
            .at([
                -length / 2.0 + offset + t,
                2.0 * offset,
                height - shelf_height - t,
            ])
            .rotated([90.0, 0.0, 90.0])
            .with_material(Material::Walnut),
        BoardSpec::new("Bench Shelf", depth - 2.0 * offset, inner_length, t)
            .describe("Bench shelf panel")
            .at([
                -length / 2.0 + offset + t,
                offset,
                height - shelf_height - t,
            ])
            .rotated([0.0, 90.0, 0.0])
            .with_material(Material::Walnut),
        BoardSpec::new("Bench Holder", inner_length, shelf_height, t)
            .describe("Bench side panels holder")
            .at([
                length / 2.0 - offset - t,
                -t / 2.0 + depth / 2.0,
                height / 2.0 - shelf_height / 2.0,
            ])
            .rotated([0.0, 0.0, 90.0])
            .with_material(Material::Walnut),
    ];

    Ok(specs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consoles::assemble;
    use orgelbau_mesh::TessellationQuality;

    #[test]
    fn test_eight_boards() {
        let specs = board_specs(&default_parameters()).unwrap();
        assert_eq!(specs.len(), 8);
    }

    #[test]
    fn test_bench_assembles_to_full_height() {
        let specs = board_specs(&default_parameters()).unwrap();
        let assembly = assemble("bench", &specs, TessellationQuality::Medium).unwrap();
        let (min, max) = assembly.bounding_box().unwrap();
        // Feet on the floor, seat surface at bench_height.
        assert!(min.z.abs() < 1e-6);
        assert!((max.z - 600.0).abs() < 1e-6);
    }

    #[test]
    fn test_panel_height_formula() {
        let specs = board_specs(&default_parameters()).unwrap();
        let left = specs.iter().find(|s| s.name == "Bench Left").unwrap();
        assert!((left.max_height - (600.0 - 18.0 - 50.0)).abs() < 1e-9);
    }
}
