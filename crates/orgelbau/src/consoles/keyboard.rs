//! Keyboard manual layout.
//!
//! A manual is a felt base plate plus white and black keys. Keys are
//! laid right-to-left so the low C ends up on the player's left, and
//! manuals stack upward and backward like a real console. Keys are not
//! plywood, so all parts here carry `listed = false` and never appear
//! on the cutting list.

use orgelbau_params::{ParamSpec, ParameterSet};

use crate::board::BoardSpec;
use crate::materials::Material;
use crate::BuildError;

/// White keys per 12-note octave starting from C: C D E F G A B white,
/// the rest black.
const WHITE_KEY_PATTERN: [bool; 12] = [
    true, false, true, false, true, true, false, true, false, true, false, true,
];

/// Whether a black key follows each white degree C..B. None after E
/// and B.
const BLACK_KEY_AFTER: [bool; 7] = [true, true, false, true, true, true, false];

/// Number of white keys in a keyboard of `total_keys` starting on C.
pub fn calculate_white_keys(total_keys: usize) -> usize {
    (0..total_keys)
        .filter(|i| WHITE_KEY_PATTERN[i % 12])
        .count()
}

/// Width of one white key given the total keyboard width and gap.
pub fn white_key_width(total_width: f64, num_white_keys: usize, key_gap: f64) -> f64 {
    (total_width - (num_white_keys as f64 - 1.0) * key_gap) / num_white_keys as f64
}

/// Shared keyboard parameter declarations, extended into the schemas of
/// the consoles that carry manuals.
pub fn param_specs() -> Vec<ParamSpec> {
    vec![
        ParamSpec::with_count("keyboard_num_manuals", "Keyboards", 2),
        ParamSpec::with_count("keyboard_total_keys", "Keyboards", 61),
        ParamSpec::with_default("keyboard_total_width", "Keyboards", 870.0),
        ParamSpec::with_default("keyboard_white_key_length", "Keyboards", 150.0),
        ParamSpec::with_default("keyboard_white_key_height", "Keyboards", 15.0),
        ParamSpec::with_default("keyboard_black_key_width_ratio", "Keyboards", 0.65),
        ParamSpec::with_default("keyboard_black_key_length", "Keyboards", 95.0),
        ParamSpec::with_default("keyboard_black_key_height", "Keyboards", 10.0),
        ParamSpec::with_default("keyboard_key_gap", "Keyboards", 0.5),
        ParamSpec::with_default("keyboard_base_thickness", "Keyboards", 10.0),
        ParamSpec::with_default("keyboard_vertical_spacing", "Keyboards", 80.0),
        ParamSpec::with_default("keyboard_depth_offset", "Keyboards", 130.0),
    ]
}

/// Board specs for one manual with its back-left corner at `position`.
/// Keys extend toward the player in +Y.
pub fn manual_specs(
    params: &ParameterSet,
    position: [f64; 3],
) -> Result<Vec<BoardSpec>, BuildError> {
    let total_keys = params.get_usize("keyboard_total_keys")?;
    let total_width = params.get_f64("keyboard_total_width")?;
    let white_key_length = params.get_f64("keyboard_white_key_length")?;
    let white_key_height = params.get_f64("keyboard_white_key_height")?;
    let black_key_width_ratio = params.get_f64("keyboard_black_key_width_ratio")?;
    let black_key_length = params.get_f64("keyboard_black_key_length")?;
    let black_key_height = params.get_f64("keyboard_black_key_height")?;
    let key_gap = params.get_f64("keyboard_key_gap")?;
    let base_thickness = params.get_f64("keyboard_base_thickness")?;

    let num_white_keys = calculate_white_keys(total_keys);
    let key_width = white_key_width(total_width, num_white_keys, key_gap);
    let black_width = key_width * black_key_width_ratio;

    let [x, y, z] = position;
    let mut specs = Vec::with_capacity(2 * num_white_keys);

    // Flat boards use rotation (0,90,90): width along X, height along Y,
    // thickness downward from position.z.
    specs.push(
        BoardSpec::new("Keyboard Base", total_width, white_key_length, base_thickness)
            .describe("Base plate under one manual")
            .at([x + total_width, y, z + base_thickness])
            .rotated([0.0, 90.0, 90.0])
            .with_material(Material::Felt)
            .unlisted(),
    );

    for i in 0..num_white_keys {
        // Right-to-left so low notes land on the player's left.
        let x_pos = x + total_width - (i as f64 + 1.0) * key_width - i as f64 * key_gap;
        let note_index = i % 7;

        specs.push(
            BoardSpec::new("White Key", key_width, white_key_length, white_key_height)
                .at([x_pos + key_width, y, z + base_thickness + white_key_height])
                .rotated([0.0, 90.0, 90.0])
                .with_material(Material::Bone)
                .unlisted(),
        );

        if i < num_white_keys - 1 && BLACK_KEY_AFTER[note_index] {
            // Centered on the gap left of the current white key.
            let black_x = x_pos - key_gap / 2.0 - black_width / 2.0;
            specs.push(
                BoardSpec::new("Black Key", black_width, black_key_length, black_key_height)
                    .at([
                        black_x + black_width,
                        y,
                        z + base_thickness + white_key_height + black_key_height,
                    ])
                    .rotated([0.0, 90.0, 90.0])
                    .with_material(Material::Ebony)
                    .unlisted(),
            );
        }
    }

    Ok(specs)
}

/// Board specs for a full stack of manuals. Each manual above the first
/// steps back and up.
pub fn stack_specs(
    params: &ParameterSet,
    base_position: [f64; 3],
) -> Result<Vec<BoardSpec>, BuildError> {
    let num_manuals = params.get_usize("keyboard_num_manuals")?;
    let vertical_spacing = params.get_f64("keyboard_vertical_spacing")?;
    let white_key_length = params.get_f64("keyboard_white_key_length")?;

    // An offset of a full key length would leave no overlap between
    // manuals; clamp to key length minus 20 mm.
    let mut depth_offset = params.get_f64("keyboard_depth_offset")?;
    if depth_offset >= white_key_length {
        depth_offset = white_key_length - 20.0;
    }

    let mut specs = Vec::new();
    for i in 0..num_manuals {
        let position = [
            base_position[0],
            base_position[1] - i as f64 * depth_offset,
            base_position[2] + i as f64 * vertical_spacing,
        ];
        specs.extend(manual_specs(params, position)?);
    }
    Ok(specs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use orgelbau_params::Schema;

    fn keyboard_params() -> ParameterSet {
        Schema::new("keyboard", param_specs())
            .resolve(&ParameterSet::new())
            .unwrap()
    }

    #[test]
    fn test_white_key_count_for_61_keys() {
        assert_eq!(calculate_white_keys(61), 36);
    }

    #[test]
    fn test_white_key_width_formula() {
        let width = white_key_width(870.0, 36, 0.5);
        assert!((width - (870.0 - 35.0 * 0.5) / 36.0).abs() < 1e-12);
        assert!((width - 23.65).abs() < 0.01);
    }

    #[test]
    fn test_manual_key_counts() {
        let specs = manual_specs(&keyboard_params(), [0.0, 0.0, 0.0]).unwrap();
        let whites = specs.iter().filter(|s| s.name == "White Key").count();
        let blacks = specs.iter().filter(|s| s.name == "Black Key").count();
        // 61 keys = 36 white + 25 black.
        assert_eq!(whites, 36);
        assert_eq!(blacks, 25);
        assert_eq!(whites + blacks + 1, specs.len());
    }

    #[test]
    fn test_keys_are_never_listed() {
        let specs = stack_specs(&keyboard_params(), [0.0, 0.0, 0.0]).unwrap();
        assert!(specs.iter().all(|s| !s.listed));
    }

    #[test]
    fn test_stack_steps_up_and_back() {
        let specs = stack_specs(&keyboard_params(), [0.0, 0.0, 0.0]).unwrap();
        let bases: Vec<_> = specs.iter().filter(|s| s.name == "Keyboard Base").collect();
        assert_eq!(bases.len(), 2);
        assert!((bases[1].position[1] - (bases[0].position[1] - 130.0)).abs() < 1e-9);
        assert!((bases[1].position[2] - (bases[0].position[2] + 80.0)).abs() < 1e-9);
    }

    #[test]
    fn test_keyboard_spans_total_width() {
        let params = keyboard_params();
        let specs = manual_specs(&params, [0.0, 0.0, 0.0]).unwrap();
        let leftmost = specs
            .iter()
            .filter(|s| s.name == "White Key")
            .map(|s| s.position[0] - s.max_width)
            .fold(f64::INFINITY, f64::min);
        assert!(leftmost.abs() < 1e-9);
    }
}
