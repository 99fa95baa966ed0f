//! The vertical (bench-style) console: the large cabinet with speaker
//! compartments, register-knob panels, a sloped note stand and manuals.

use orgelbau_params::{ParamSpec, ParameterSet, Schema};

use crate::board::BoardSpec;
use crate::consoles::keyboard;
use crate::BuildError;

/// Parameter schema for the vertical console.
pub fn schema() -> Schema {
    let mut specs = vec![
        ParamSpec::required("organ_internal_width", "General_and_base"),
        ParamSpec::with_default("board_thickness", "General_and_base", 18.0),
        ParamSpec::with_default("base_height", "General_and_base", 800.0),
        ParamSpec::with_default("base_depth", "General_and_base", 350.0),
        ParamSpec::with_default("base_front_distance", "General_and_base", 150.0),
        ParamSpec::with_default("board_offset", "General_and_base", 10.0),
        ParamSpec::with_default("feet_thickness", "General_and_base", 50.0),
        ParamSpec::with_default("note_stand_height", "General_and_base", 500.0),
        ParamSpec::with_default("note_stand_angle", "General_and_base", 10.0),
        ParamSpec::with_default("note_shelf_height", "General_and_base", 70.0),
        ParamSpec::with_default("keyboard_width", "Keyboard_block", 840.0),
        ParamSpec::with_default("keyboard_depth", "Keyboard_block", 400.0),
        ParamSpec::with_default("keyboard_height", "Keyboard_block", 200.0),
        ParamSpec::with_default("keyboard_offset", "Keyboard_block", 200.0),
        ParamSpec::with_default("front_speaker_width", "Speakers", 400.0),
        ParamSpec::with_default("front_speaker_height", "Speakers", 200.0),
        ParamSpec::with_default("side_speaker_width", "Speakers", 100.0),
        ParamSpec::with_default("side_speaker_height", "Speakers", 1500.0),
        ParamSpec::with_flag("enable_lateral_speaker_holes", "Speakers", false),
        ParamSpec::with_flag("enable_knob_holes", "Register_knobs", false),
        ParamSpec::with_count("knob_rows", "Register_knobs", 2),
        ParamSpec::with_count("knob_columns", "Register_knobs", 6),
        ParamSpec::with_default("knob_hole_diameter", "Register_knobs", 30.0),
        ParamSpec::with_default("knob_pitch", "Register_knobs", 55.0),
        ParamSpec::with_default("volume_pedals_width", "Volume_pedals", 120.0),
        ParamSpec::with_default("volume_pedals_height", "Volume_pedals", 240.0),
        ParamSpec::with_count("volume_pedals_number", "Volume_pedals", 3),
        ParamSpec::with_default("volume_pedals_spacing", "Volume_pedals", 10.0),
        ParamSpec::with_default("volume_pedals_hole_start_height", "Volume_pedals", 140.0),
    ];
    for spec in keyboard::param_specs() {
        // The manual stack must fit the 840 mm keyboard opening.
        if spec.name == "keyboard_total_width" {
            specs.push(ParamSpec::with_default("keyboard_total_width", "Keyboards", 800.0));
        } else {
            specs.push(spec);
        }
    }
    Schema::new("vertical", specs)
}

/// The reference parameter set (1600 mm internal width).
pub fn default_parameters() -> ParameterSet {
    let mut params = schema().defaults();
    params.set("organ_internal_width", 1600.0);
    params
}

/// Staggered knob-hole grid, centered on a panel of the given size.
/// Odd rows shift right by half a pitch.
fn knob_holes(
    panel_width: f64,
    panel_height: f64,
    rows: usize,
    columns: usize,
    diameter: f64,
    pitch: f64,
) -> Vec<(f64, f64, f64)> {
    let grid_width = (columns as f64 - 1.0) * pitch;
    let grid_height = (rows as f64 - 1.0) * pitch;
    let mut holes = Vec::with_capacity(rows * columns);
    for r in 0..rows {
        let stagger = if r % 2 == 1 { pitch / 2.0 } else { 0.0 };
        let cy = panel_height / 2.0 - grid_height / 2.0 + r as f64 * pitch;
        for c in 0..columns {
            let cx = panel_width / 2.0 - grid_width / 2.0 + c as f64 * pitch + stagger;
            holes.push((cx, cy, diameter));
        }
    }
    holes
}

/// Lay out the vertical console boards.
pub fn board_specs(params: &ParameterSet) -> Result<Vec<BoardSpec>, BuildError> {
    let p = schema().resolve(params)?;

    let width = p.get_f64("organ_internal_width")?;
    let t = p.get_f64("board_thickness")?;
    let base_height = p.get_f64("base_height")?;
    let base_depth = p.get_f64("base_depth")?;
    let front_distance = p.get_f64("base_front_distance")?;
    let offset = p.get_f64("board_offset")?;
    let feet = p.get_f64("feet_thickness")?;
    let ns_height = p.get_f64("note_stand_height")?;
    let ns_angle = p.get_f64("note_stand_angle")?;
    let shelf_height = p.get_f64("note_shelf_height")?;

    let kbd_width = p.get_f64("keyboard_width")?;
    let kbd_depth = p.get_f64("keyboard_depth")?;
    let kbd_height = p.get_f64("keyboard_height")?;
    let kbd_offset = p.get_f64("keyboard_offset")?;

    let fs_width = p.get_f64("front_speaker_width")?;
    let fs_height = p.get_f64("front_speaker_height")?;
    let ss_width = p.get_f64("side_speaker_width")?;
    let ss_height = p.get_f64("side_speaker_height")?;
    let lateral_holes = p.get_flag("enable_lateral_speaker_holes")?;

    let pedal_width = p.get_f64("volume_pedals_width")?;
    let pedal_height = p.get_f64("volume_pedals_height")?;
    let pedal_number = p.get_usize("volume_pedals_number")?;
    let pedal_spacing = p.get_f64("volume_pedals_spacing")?;
    let hole_start = p.get_f64("volume_pedals_hole_start_height")?;

    // Recurring derived dimensions.
    let upper_height = kbd_height + ns_height;
    let cabinet_top_z = base_height + upper_height + t + fs_height;
    let knobs_panel_width = (width - kbd_width - 2.0 * t) / 2.0;
    let knobs_lateral_width = base_depth + t + offset;
    let lateral_width = base_depth + 2.0 * t + 2.0 * offset;
    let lateral_height = base_height + upper_height + 2.0 * t + fs_height - feet;
    let pedal_hole_width =
        pedal_number as f64 * (pedal_width + pedal_spacing) + pedal_spacing;
    let pedal_hole_height = pedal_height + 2.0 * pedal_spacing;
    // The keyboard block's back plane, shared by the note stand front
    // panel and the manual stack.
    let kbd_back_y = base_depth + kbd_offset - offset - t - kbd_depth;

    let mut specs = vec![
        BoardSpec::new("Cabinet Top", base_depth + 2.0 * t + offset, width, t)
            .describe("Top of the cabinet")
            .at([width / 2.0, 0.0, cabinet_top_z])
            .rotated([0.0, -90.0, 0.0]),
        BoardSpec::new("Cabinet Upper Back Panel", width, upper_height + t + fs_height, t)
            .describe("Upper back panel of the cabinet")
            .at([width / 2.0, 0.0, base_height])
            .rotated([0.0, 0.0, 90.0]),
        BoardSpec::new("Cabinet Lower Back Panel", width, base_height - t, t)
            .describe("Lower back panel of the cabinet")
            .at([width / 2.0, 0.0, 0.0])
            .rotated([0.0, 0.0, 90.0]),
        BoardSpec::new(
            "Cabinet Bottom Shelf",
            width,
            base_depth - front_distance + offset,
            t,
        )
        .describe("The lower shelf under the pedals")
        .at([width / 2.0, t, hole_start])
        .rotated([0.0, 90.0, 90.0]),
        BoardSpec::new("Cabinet Bottom Front Panel", width, hole_start - t, t)
            .describe("The lower front board under the pedals")
            .at([width / 2.0, base_depth - front_distance, 0.0])
            .rotated([0.0, 0.0, 90.0]),
        BoardSpec::new(
            "Cabinet Base Front",
            width,
            base_height - hole_start - t,
            t,
        )
        .describe("The base front board with the hole for pedals")
        .at([width / 2.0, base_depth - front_distance, hole_start])
        .rotated([0.0, 0.0, 90.0])
        .with_rect_hole(
            width / 2.0,
            hole_start,
            pedal_hole_width,
            pedal_hole_height,
        ),
        BoardSpec::new(
            "Cabinet Upper Front Panel",
            width - 2.0 * fs_width,
            fs_height,
            t,
        )
        .describe("Upper front panel between front speakers")
        .at([
            (width - 2.0 * fs_width) / 2.0,
            base_depth + t,
            base_height + upper_height + t,
        ])
        .rotated([0.0, 0.0, 90.0]),
        BoardSpec::new("Cabinet Speaker Shelf", knobs_lateral_width, width, t)
            .describe("The shelf for the speakers")
            .at([width / 2.0, t, base_height + upper_height])
            .rotated([0.0, -90.0, 0.0]),
        BoardSpec::new("Cabinet Left Knobs Lateral Panel", knobs_lateral_width, upper_height, t)
            .describe("Lateral board for the left register block")
            .at([kbd_width / 2.0, t, base_height]),
        BoardSpec::new("Cabinet Right Knobs Lateral Panel", knobs_lateral_width, upper_height, t)
            .describe("Lateral board for the right register block")
            .at([-kbd_width / 2.0 - t, t, base_height]),
        BoardSpec::new("Cabinet Note Stand Upper Panel", kbd_width, shelf_height, t)
            .describe("The board on the top of the note stand section")
            .at([
                kbd_width / 2.0,
                base_depth + t,
                base_height + upper_height - shelf_height,
            ])
            .rotated([0.0, 0.0, 90.0]),
        BoardSpec::new("Cabinet Main Shelf", kbd_width, base_depth + front_distance, t)
            .describe("The main shelf for keyboards")
            .at([kbd_width / 2.0, 0.0, base_height])
            .rotated([0.0, 90.0, 90.0]),
        BoardSpec::new(
            "Cabinet Main Shelf (Left Part)",
            (width - kbd_width) / 2.0,
            base_depth + 2.0 * t + offset,
            t,
        )
        .describe("Left part of the main shelf under the knobs block")
        .at([width / 2.0, 0.0, base_height])
        .rotated([0.0, 90.0, 90.0]),
        BoardSpec::new(
            "Cabinet Main Shelf (Right Part)",
            (width - kbd_width) / 2.0,
            base_depth + 2.0 * t + offset,
            t,
        )
        .describe("Right part of the main shelf under the knobs block")
        .at([-kbd_width / 2.0, 0.0, base_height])
        .rotated([0.0, 90.0, 90.0]),
        BoardSpec::new("Note Stand Front Panel", kbd_width, shelf_height, t)
            .describe("The front board between keyboard and the note stand")
            .at([-kbd_width / 2.0, kbd_back_y, base_height + kbd_height])
            .rotated([0.0, 0.0, -90.0]),
        BoardSpec::new("Note Stand Shelf", kbd_width, shelf_height, t)
            .describe("The shelf of the note stand")
            .at([
                kbd_width / 2.0,
                kbd_back_y + shelf_height,
                base_height + kbd_height + shelf_height - t,
            ])
            .rotated([0.0, -90.0, 90.0]),
        BoardSpec::new(
            "Note Stand",
            kbd_width,
            (ns_height - shelf_height) / ns_angle.to_radians().cos(),
            t,
        )
        .describe("The note stand calculated according to slope angle")
        .at([
            -kbd_width / 2.0,
            base_depth + kbd_offset - offset - kbd_depth,
            base_height + kbd_height + shelf_height,
        ])
        .rotated([0.0, ns_angle, -90.0]),
        BoardSpec::new(
            "Cabinet Left Foot",
            base_depth + 2.0 * t + 4.0 * offset,
            feet,
            feet,
        )
        .describe("The left foot of the cabinet")
        .at([width / 2.0, 0.0, 0.0]),
        BoardSpec::new(
            "Cabinet Right Foot",
            base_depth + 2.0 * t + 4.0 * offset,
            feet,
            feet,
        )
        .describe("The right foot of the cabinet")
        .at([-width / 2.0 - feet, 0.0, 0.0]),
    ];

    // Register-knob panels, with the optional staggered hole grid.
    let mut left_knobs = BoardSpec::new("Cabinet Left Knobs Panel", knobs_panel_width, upper_height, t)
        .describe("Left register knobs panel")
        .at([width / 2.0, base_depth + t, base_height])
        .rotated([0.0, 0.0, 90.0]);
    let mut right_knobs = BoardSpec::new("Cabinet Right Knobs Panel", knobs_panel_width, upper_height, t)
        .describe("Right register knobs panel")
        .at([-width / 2.0, base_depth + 2.0 * t, base_height])
        .rotated([0.0, 0.0, -90.0]);
    if p.get_flag("enable_knob_holes")? {
        let holes = knob_holes(
            knobs_panel_width,
            upper_height,
            p.get_usize("knob_rows")?,
            p.get_usize("knob_columns")?,
            p.get_f64("knob_hole_diameter")?,
            p.get_f64("knob_pitch")?,
        );
        for (cx, cy, d) in holes {
            left_knobs = left_knobs.with_circle_hole(cx, cy, d);
            right_knobs = right_knobs.with_circle_hole(cx, cy, d);
        }
    }
    specs.push(left_knobs);
    specs.push(right_knobs);

    // Lateral boards, with the optional side speaker cut-outs.
    for (name, description, x) in [
        (
            "Cabinet Left Lateral",
            "The left lateral board with the hole for the speaker",
            width / 2.0,
        ),
        (
            "Cabinet Right Lateral",
            "The right lateral board with the hole for the speaker",
            -width / 2.0 - t,
        ),
    ] {
        let mut lateral = BoardSpec::new(name, lateral_width, lateral_height, t)
            .describe(description)
            .at([x, 0.0, feet]);
        if lateral_holes {
            lateral = lateral.with_rect_hole(
                lateral_width / 2.0,
                (base_height + upper_height + t + fs_height - feet) / 2.0,
                ss_width,
                ss_height,
            );
        }
        specs.push(lateral);
    }

    for i in 0..pedal_number {
        specs.push(
            BoardSpec::new("Volume Pedals", pedal_width, pedal_height, t)
                .describe("The volume pedals")
                .at([
                    pedal_hole_width / 2.0
                        - i as f64 * (pedal_spacing + pedal_width)
                        - pedal_spacing,
                    base_depth - front_distance + t,
                    hole_start + 2.0 * pedal_spacing,
                ])
                .rotated([0.0, -30.0, 90.0]),
        );
    }

    // Manuals in the keyboard opening, on the main shelf, back edge
    // against the note stand front panel.
    let num_manuals = p.get_usize("keyboard_num_manuals")?;
    if num_manuals > 0 {
        let kbd_total_width = p.get_f64("keyboard_total_width")?;
        specs.extend(keyboard::stack_specs(
            &p,
            [-kbd_total_width / 2.0, kbd_back_y, base_height],
        )?);
    }

    Ok(specs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cutlist::cut_list;

    #[test]
    fn test_missing_width_fails_fast() {
        assert!(matches!(
            board_specs(&ParameterSet::new()),
            Err(BuildError::Param(_))
        ));
    }

    #[test]
    fn test_board_count_with_defaults() {
        let specs = board_specs(&default_parameters()).unwrap();
        // 23 cabinet boards, 3 pedals, 2 manuals of 62 parts each.
        assert_eq!(specs.len(), 23 + 3 + 2 * 62);
    }

    #[test]
    fn test_no_holes_by_default() {
        let specs = board_specs(&default_parameters()).unwrap();
        let left = specs
            .iter()
            .find(|s| s.name == "Cabinet Left Lateral")
            .unwrap();
        assert!(left.rect_holes.is_empty());
        let knobs = specs
            .iter()
            .find(|s| s.name == "Cabinet Left Knobs Panel")
            .unwrap();
        assert!(knobs.circle_holes.is_empty());
    }

    #[test]
    fn test_speaker_and_knob_holes_are_optional() {
        let mut params = default_parameters();
        params.set("enable_lateral_speaker_holes", true);
        params.set("enable_knob_holes", true);
        let specs = board_specs(&params).unwrap();
        let lateral = specs
            .iter()
            .find(|s| s.name == "Cabinet Right Lateral")
            .unwrap();
        assert_eq!(lateral.rect_holes.len(), 1);
        assert!((lateral.rect_holes[0].width - 100.0).abs() < 1e-9);
        let knobs = specs
            .iter()
            .find(|s| s.name == "Cabinet Left Knobs Panel")
            .unwrap();
        assert_eq!(knobs.circle_holes.len(), 12);
    }

    #[test]
    fn test_knob_grid_is_staggered() {
        let holes = knob_holes(362.0, 700.0, 2, 6, 30.0, 55.0);
        assert_eq!(holes.len(), 12);
        // Second row shifts right by half a pitch.
        assert!((holes[6].0 - (holes[0].0 + 27.5)).abs() < 1e-9);
        assert!((holes[6].1 - (holes[0].1 + 55.0)).abs() < 1e-9);
    }

    #[test]
    fn test_note_stand_slope_length() {
        let specs = board_specs(&default_parameters()).unwrap();
        let stand = specs.iter().find(|s| s.name == "Note Stand").unwrap();
        let expected = (500.0 - 70.0) / 10.0_f64.to_radians().cos();
        assert!((stand.max_height - expected).abs() < 1e-9);
    }

    #[test]
    fn test_cut_list_matches_layout_dimensions() {
        let specs = board_specs(&default_parameters()).unwrap();
        for entry in cut_list(&specs) {
            let spec = specs.iter().find(|s| s.name == entry.name).unwrap();
            assert_eq!(entry.width, spec.max_width);
            assert_eq!(entry.height, spec.max_height);
            assert_eq!(entry.thickness, spec.thickness);
        }
    }
}
