//! The normal (tower) console: a storage base, a notched top section
//! and manuals on the horizontal divider.

use orgelbau_params::{ParamSpec, ParameterSet, Schema};

use crate::board::BoardSpec;
use crate::consoles::keyboard;
use crate::BuildError;

/// Parameter schema for the normal console. The internal cabinet width
/// is the one value a builder must choose; everything else defaults.
pub fn schema() -> Schema {
    let mut specs = vec![
        ParamSpec::required("organ_internal_width", "General_and_base"),
        ParamSpec::with_default("board_thickness", "General_and_base", 18.0),
        ParamSpec::with_default("base_height", "General_and_base", 800.0),
        ParamSpec::with_default("base_depth", "General_and_base", 350.0),
        ParamSpec::with_default("base_front_distance", "General_and_base", 10.0),
        ParamSpec::with_default("volume_pedals_width", "Volume_pedals", 120.0),
        ParamSpec::with_default("volume_pedals_height", "Volume_pedals", 240.0),
        ParamSpec::with_count("volume_pedals_number", "Volume_pedals", 3),
        ParamSpec::with_default("volume_pedals_spacing", "Volume_pedals", 10.0),
        ParamSpec::with_default("volume_pedals_hole_start_height", "Volume_pedals", 140.0),
        ParamSpec::with_default("top_depth", "Top", 650.0),
        ParamSpec::with_default("top_height", "Top", 350.0),
        ParamSpec::with_default("top_notch_start_x", "Top", 350.0),
        ParamSpec::with_default("top_notch_start_y", "Top", 150.0),
        ParamSpec::with_default("keyboard_y_offset", "Keyboards", 0.0),
    ];
    specs.extend(keyboard::param_specs());
    Schema::new("normal", specs)
}

/// The reference parameter set (1300 mm internal width).
pub fn default_parameters() -> ParameterSet {
    let mut params = schema().defaults();
    params.set("organ_internal_width", 1300.0);
    params
}

/// Lay out the normal console boards.
pub fn board_specs(params: &ParameterSet) -> Result<Vec<BoardSpec>, BuildError> {
    let p = schema().resolve(params)?;

    let width = p.get_f64("organ_internal_width")?;
    let t = p.get_f64("board_thickness")?;
    let base_height = p.get_f64("base_height")?;
    let base_depth = p.get_f64("base_depth")?;
    let front_distance = p.get_f64("base_front_distance")?;

    let pedal_width = p.get_f64("volume_pedals_width")?;
    let pedal_height = p.get_f64("volume_pedals_height")?;
    let pedal_number = p.get_usize("volume_pedals_number")?;
    let pedal_spacing = p.get_f64("volume_pedals_spacing")?;
    let hole_start = p.get_f64("volume_pedals_hole_start_height")?;

    let top_depth = p.get_f64("top_depth")?;
    let top_height = p.get_f64("top_height")?;
    let notch_x = p.get_f64("top_notch_start_x")?;
    let notch_y = p.get_f64("top_notch_start_y")?;

    // Width of the cut-out in the base front behind the pedals.
    let pedal_hole_width =
        pedal_number as f64 * (pedal_width + pedal_spacing) + pedal_spacing;
    let pedal_hole_height = pedal_height + 2.0 * pedal_spacing;

    let mut specs = vec![
        BoardSpec::new("Base Right Table", base_depth, base_height, t)
            .describe("Right side panel of the base")
            .at([-t, 0.0, 0.0]),
        BoardSpec::new("Base Left Table", base_depth, base_height, t)
            .describe("Left side panel of the base")
            .at([-width - 2.0 * t, 0.0, 0.0]),
        BoardSpec::new("Base Back", width, base_height, t)
            .describe("Back panel of the base")
            .at([-t, 0.0, 0.0])
            .rotated([0.0, 0.0, 90.0]),
        BoardSpec::new("Base Front", width, base_height, t)
            .describe("Front panel of the base with volume pedal hole")
            .at([-t, base_depth - 100.0, 0.0])
            .rotated([0.0, 0.0, 90.0])
            .with_rect_hole(
                width / 2.0,
                hole_start + pedal_hole_height / 2.0,
                pedal_hole_width,
                pedal_hole_height,
            ),
        BoardSpec::new("Base Horizontal", width, top_depth, t)
            .describe("Horizontal divider between base and top sections")
            .at([-t, t, base_height])
            .rotated([0.0, 90.0, 90.0]),
        BoardSpec::new("Top Lateral Left", top_depth, top_height, t)
            .describe("Left side panel of the top section with notch")
            .with_notch(notch_x, notch_y)
            .at([-t, 0.0, base_height]),
        BoardSpec::new("Top Lateral Right", top_depth, top_height, t)
            .describe("Right side panel of the top section with notch")
            .with_notch(notch_x, notch_y)
            .at([-width - 2.0 * t, 0.0, base_height]),
        BoardSpec::new("Top Back", width, top_height - 2.0 * t, t)
            .describe("Back panel of the top section")
            .at([-t, 0.0, base_height + t])
            .rotated([0.0, 0.0, 90.0]),
        BoardSpec::new("Top Front", width, top_height - 2.0 * t, t)
            .describe("Front panel of the top section")
            .at([-t, base_depth, base_height + t])
            .rotated([0.0, 0.0, 90.0]),
        BoardSpec::new("Top Lid", width, base_depth, t)
            .describe("Lid covering the top section")
            .at([-t, 0.0, base_height + top_height - t])
            .rotated([0.0, 90.0, 90.0]),
    ];

    for i in 0..pedal_number {
        specs.push(
            BoardSpec::new("Volume Pedals", pedal_width, pedal_height, t)
                .describe("The volume pedals")
                .at([
                    -t - width / 2.0 + pedal_hole_width / 2.0
                        - i as f64 * (pedal_spacing + pedal_width)
                        - pedal_spacing,
                    base_depth - front_distance + t,
                    hole_start + 2.0 * pedal_spacing,
                ])
                .rotated([0.0, -30.0, 90.0]),
        );
    }

    // Manuals sit on the horizontal divider, centered in X, with their
    // key fronts flush with the divider's front edge.
    let num_manuals = p.get_usize("keyboard_num_manuals")?;
    if num_manuals > 0 {
        let kbd_width = p.get_f64("keyboard_total_width")?;
        let kbd_depth = p.get_f64("keyboard_white_key_length")?;
        let y_offset = p.get_f64("keyboard_y_offset")?;
        let front_y = t + top_depth;
        specs.extend(keyboard::stack_specs(
            &p,
            [
                -t - width / 2.0 - kbd_width / 2.0,
                front_y - kbd_depth + y_offset,
                base_height + t,
            ],
        )?);
    }

    Ok(specs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cutlist::cut_list;
    use orgelbau_params::ParamError;

    #[test]
    fn test_missing_width_fails_fast() {
        let err = board_specs(&ParameterSet::new()).unwrap_err();
        match err {
            BuildError::Param(ParamError::MissingParameters { console, names }) => {
                assert_eq!(console, "normal");
                assert_eq!(names, vec!["organ_internal_width".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_board_count_with_defaults() {
        let specs = board_specs(&default_parameters()).unwrap();
        // 10 cabinet boards, 3 pedals, 2 manuals of 62 parts each.
        assert_eq!(specs.len(), 10 + 3 + 2 * 62);
    }

    #[test]
    fn test_cut_list_groups_pedals_and_skips_keys() {
        let specs = board_specs(&default_parameters()).unwrap();
        let entries = cut_list(&specs);
        assert_eq!(entries.len(), 11);
        let pedals = entries.iter().find(|e| e.name == "Volume Pedals").unwrap();
        assert_eq!(pedals.quantity, 3);
        assert!(entries.iter().all(|e| e.name != "White Key"));
    }

    #[test]
    fn test_notched_side_panels() {
        let specs = board_specs(&default_parameters()).unwrap();
        let left = specs.iter().find(|s| s.name == "Top Lateral Left").unwrap();
        assert_eq!(left.min_width, 350.0);
        assert_eq!(left.min_height, 150.0);
        assert!(left.cut_entry().notes.contains("Notch"));
    }

    #[test]
    fn test_pedal_hole_in_base_front() {
        let specs = board_specs(&default_parameters()).unwrap();
        let front = specs.iter().find(|s| s.name == "Base Front").unwrap();
        assert_eq!(front.rect_holes.len(), 1);
        let hole = front.rect_holes[0];
        // 3 pedals of 120 with 10 spacing: 3*130 + 10 = 400 wide.
        assert!((hole.width - 400.0).abs() < 1e-9);
        assert!((hole.height - 260.0).abs() < 1e-9);
    }
}
