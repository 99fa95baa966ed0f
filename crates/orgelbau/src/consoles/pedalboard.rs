//! The AGO pedalboard: patterned short and tall pedals, raised sharp
//! caps, and a frame of cheeks, back and front boards.

use orgelbau_params::{ParamSpec, ParameterSet, Schema};

use crate::board::BoardSpec;
use crate::consoles::pattern::generate_ago_pattern;
use crate::materials::Material;
use crate::BuildError;

/// Parameter schema for the pedalboard.
pub fn schema() -> Schema {
    Schema::new(
        "pedalboard",
        vec![
            ParamSpec::with_default("board_thickness", "General", 18.0),
            ParamSpec::with_default("board_offset", "General", 5.0),
            ParamSpec::required("number_of_notes", "Pedals"),
            ParamSpec::with_default("short_pedal_width", "Pedals", 25.4),
            ParamSpec::with_default("tall_pedal_width", "Pedals", 25.4),
            ParamSpec::with_default("short_pedal_length", "Pedals", 700.0),
            ParamSpec::with_default("tall_pedal_length", "Pedals", 700.0),
            ParamSpec::with_default("pedal_height", "Pedals", 150.0),
            ParamSpec::with_default("pedal_thickness", "Pedals", 25.4),
            ParamSpec::with_default("pedal_spacing", "Pedals", 3.0),
            ParamSpec::with_default("base_height", "Base", 100.0),
            ParamSpec::with_default("base_depth", "Base", 200.0),
            ParamSpec::with_default("lateral_board_height", "Base", 250.0),
            ParamSpec::with_flag("enable_sharp_caps", "Sharp_caps", true),
            ParamSpec::with_default("sharp_cap_end_length", "Sharp_caps", 130.0),
            ParamSpec::with_default("sharp_cap_middle_length", "Sharp_caps", 80.0),
            ParamSpec::with_default("sharp_cap_height", "Sharp_caps", 15.0),
            ParamSpec::with_flag("sharp_cap_smooth", "Sharp_caps", true),
        ],
    )
}

/// The reference parameter set (32 notes is common; the classic AGO
/// board has 30).
pub fn default_parameters() -> ParameterSet {
    let mut params = schema().defaults();
    params.set("number_of_notes", 30_i64);
    params
}

/// Cap-length interpolation across the pedalboard. `normalized` runs
/// from -1 at the left end to +1 at the right end.
fn sharp_cap_length(end: f64, middle: f64, normalized: f64, smooth: bool) -> f64 {
    let arc_factor = if smooth {
        1.0 - normalized * normalized
    } else {
        1.0 - normalized.abs()
    };
    end + (middle - end) * arc_factor
}

/// Lay out the pedalboard boards.
pub fn board_specs(params: &ParameterSet) -> Result<Vec<BoardSpec>, BuildError> {
    let p = schema().resolve(params)?;

    let t = p.get_f64("board_thickness")?;
    let notes = p.get_usize("number_of_notes")?;
    let short_width = p.get_f64("short_pedal_width")?;
    let tall_width = p.get_f64("tall_pedal_width")?;
    let short_length = p.get_f64("short_pedal_length")?;
    let tall_length = p.get_f64("tall_pedal_length")?;
    let pedal_height = p.get_f64("pedal_height")?;
    let pedal_thickness = p.get_f64("pedal_thickness")?;
    let spacing = p.get_f64("pedal_spacing")?;
    let base_height = p.get_f64("base_height")?;
    let base_depth = p.get_f64("base_depth")?;
    let lateral_height = p.get_f64("lateral_board_height")?;

    let caps_enabled = p.get_flag("enable_sharp_caps")?;
    let cap_end = p.get_f64("sharp_cap_end_length")?;
    let cap_middle = p.get_f64("sharp_cap_middle_length")?;
    let cap_height = p.get_f64("sharp_cap_height")?;
    let cap_smooth = p.get_flag("sharp_cap_smooth")?;

    // Reversed so the low C lands on the player's left.
    let pattern: String = generate_ago_pattern(notes)
        .replace(' ', "")
        .chars()
        .rev()
        .collect();

    let total_width: f64 = pattern
        .chars()
        .map(|ch| match ch {
            't' => tall_width + spacing,
            // Blank gaps take the width of a short pedal.
            _ => short_width + spacing,
        })
        .sum();

    let pedal_top_z = base_height + pedal_height;
    let mut specs = Vec::new();
    let mut current_x = -total_width / 2.0;

    for ch in pattern.chars() {
        match ch {
            's' => {
                // Naturals have a doubled cross-section.
                specs.push(
                    BoardSpec::new("Short Pedal", short_width, short_length, pedal_thickness * 2.0)
                        .describe("Short pedal (natural note)")
                        .at([
                            current_x + short_width,
                            -base_depth - short_length,
                            pedal_top_z + pedal_thickness * 2.0,
                        ])
                        .rotated([0.0, 90.0, 90.0])
                        .with_material(Material::Oak),
                );
                current_x += short_width + spacing;
            }
            't' => {
                specs.push(
                    BoardSpec::new("Tall Pedal", tall_width, tall_length, pedal_thickness)
                        .describe("Tall pedal (sharp/flat note)")
                        .at([
                            current_x + tall_width,
                            -base_depth - tall_length,
                            pedal_top_z + pedal_thickness,
                        ])
                        .rotated([0.0, 90.0, 90.0])
                        .with_material(Material::Ebony),
                );
                if caps_enabled {
                    let center = current_x + tall_width / 2.0;
                    let normalized = center / (total_width / 2.0);
                    let cap_length =
                        sharp_cap_length(cap_end, cap_middle, normalized, cap_smooth);
                    specs.push(
                        BoardSpec::new("Sharp Cap", tall_width, cap_length, cap_height)
                            .describe("Raised cap on a tall pedal")
                            .at([
                                current_x + tall_width,
                                -base_depth - cap_length,
                                pedal_top_z + pedal_thickness + cap_height,
                            ])
                            .rotated([0.0, 90.0, 90.0])
                            .with_material(Material::Ebony),
                    );
                }
                current_x += tall_width + spacing;
            }
            // Blank position: advance only.
            _ => current_x += short_width + spacing,
        }
    }

    // Frame: two cheeks, a back riser and a front board.
    specs.push(
        BoardSpec::new("Pedalboard Back", total_width, lateral_height, t)
            .describe("Back riser of the pedal frame")
            .at([total_width / 2.0, -t, 0.0])
            .rotated([0.0, 0.0, 90.0])
            .with_material(Material::Walnut),
    );
    specs.push(
        BoardSpec::new("Pedalboard Front", total_width, base_height, t)
            .describe("Front board of the pedal frame")
            .at([total_width / 2.0, -base_depth, 0.0])
            .rotated([0.0, 0.0, 90.0])
            .with_material(Material::Walnut),
    );
    specs.push(
        BoardSpec::new("Pedalboard Left Cheek", base_depth, lateral_height, t)
            .describe("Left cheek of the pedal frame")
            .at([-total_width / 2.0 - t, -base_depth, 0.0])
            .with_material(Material::Walnut),
    );
    specs.push(
        BoardSpec::new("Pedalboard Right Cheek", base_depth, lateral_height, t)
            .describe("Right cheek of the pedal frame")
            .at([total_width / 2.0, -base_depth, 0.0])
            .with_material(Material::Walnut),
    );

    Ok(specs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cutlist::cut_list;

    #[test]
    fn test_pedal_counts_for_thirty_notes() {
        let specs = board_specs(&default_parameters()).unwrap();
        let shorts = specs.iter().filter(|s| s.name == "Short Pedal").count();
        let talls = specs.iter().filter(|s| s.name == "Tall Pedal").count();
        let caps = specs.iter().filter(|s| s.name == "Sharp Cap").count();
        // 30 notes: 18 naturals, 12 sharps.
        assert_eq!(shorts + talls, 30);
        assert_eq!(talls, 12);
        assert_eq!(caps, talls);
    }

    #[test]
    fn test_cut_list_groups_pedals() {
        let specs = board_specs(&default_parameters()).unwrap();
        let entries = cut_list(&specs);
        let shorts = entries.iter().find(|e| e.name == "Short Pedal").unwrap();
        assert_eq!(shorts.quantity, 18);
        // Short pedals are cut from doubled stock.
        assert!((shorts.thickness - 50.8).abs() < 1e-9);
    }

    #[test]
    fn test_cap_length_interpolation() {
        assert!((sharp_cap_length(130.0, 80.0, 0.0, true) - 80.0).abs() < 1e-12);
        assert!((sharp_cap_length(130.0, 80.0, 1.0, true) - 130.0).abs() < 1e-12);
        assert!((sharp_cap_length(130.0, 80.0, -1.0, false) - 130.0).abs() < 1e-12);
        // Smooth falls off slower than linear away from the ends.
        assert!(
            sharp_cap_length(130.0, 80.0, 0.5, true) < sharp_cap_length(130.0, 80.0, 0.5, false)
        );
    }

    #[test]
    fn test_caps_can_be_disabled() {
        let mut params = default_parameters();
        params.set("enable_sharp_caps", false);
        let specs = board_specs(&params).unwrap();
        assert!(specs.iter().all(|s| s.name != "Sharp Cap"));
    }

    #[test]
    fn test_pedals_are_centered() {
        let specs = board_specs(&default_parameters()).unwrap();
        let min_x = specs
            .iter()
            .filter(|s| s.name.ends_with("Pedal"))
            .map(|s| s.position[0] - s.max_width)
            .fold(f64::INFINITY, f64::min);
        let max_x = specs
            .iter()
            .filter(|s| s.name.ends_with("Pedal"))
            .map(|s| s.position[0])
            .fold(f64::NEG_INFINITY, f64::max);
        // The pattern ends on a playable note, so the rightmost pedal
        // sits one spacing short of the frame edge.
        assert!((min_x + max_x).abs() < short_spacing_slack());
    }

    fn short_spacing_slack() -> f64 {
        // One pedal-plus-gap of asymmetry from trailing blanks.
        2.0 * (25.4 + 3.0)
    }

    #[test]
    fn test_note_count_is_required() {
        assert!(matches!(
            board_specs(&ParameterSet::new()),
            Err(BuildError::Param(_))
        ));
    }
}
