//! AGO pedalboard pattern generation.

/// One octave of the American Guild of Organists pedal layout:
/// `s` short (natural), `t` tall (sharp), `b` blank gap. Spaces are
/// visual separators and carry no width of their own.
pub const OCTAVE_PATTERN: &str = "ststsb stststs b";

/// Notes per octave (7 naturals + 5 sharps).
pub const NOTES_PER_OCTAVE: usize = 12;

/// Generate the AGO pedal pattern for a given note count.
///
/// Full octaves repeat [`OCTAVE_PATTERN`]; a remainder appends a prefix
/// of the template that stops on the last required playable note. The
/// returned string contains exactly `number_of_notes` occurrences of
/// `s` and `t` combined.
pub fn generate_ago_pattern(number_of_notes: usize) -> String {
    let complete_octaves = number_of_notes / NOTES_PER_OCTAVE;
    let remaining_notes = number_of_notes % NOTES_PER_OCTAVE;

    let mut parts: Vec<String> = Vec::with_capacity(complete_octaves + 1);
    for _ in 0..complete_octaves {
        parts.push(OCTAVE_PATTERN.to_string());
    }

    if remaining_notes > 0 {
        let mut partial = String::new();
        let mut note_count = 0;
        for ch in OCTAVE_PATTERN.chars() {
            if ch != ' ' {
                partial.push(ch);
                if ch == 's' || ch == 't' {
                    note_count += 1;
                    if note_count >= remaining_notes {
                        break;
                    }
                }
            } else if !partial.is_empty() {
                partial.push(ch);
            }
        }
        parts.push(partial.trim().to_string());
    }

    parts.join(" ")
}

/// Count the playable notes (`s` and `t`) in a pattern.
pub fn count_notes(pattern: &str) -> usize {
    pattern.chars().filter(|c| *c == 's' || *c == 't').count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_count_is_exact() {
        for n in 1..=36 {
            let pattern = generate_ago_pattern(n);
            assert_eq!(count_notes(&pattern), n, "pattern for {n}: {pattern}");
        }
    }

    #[test]
    fn test_full_octave() {
        assert_eq!(generate_ago_pattern(12), OCTAVE_PATTERN);
    }

    #[test]
    fn test_thirty_notes() {
        // Two full octaves plus a six-note partial.
        assert_eq!(
            generate_ago_pattern(30),
            "ststsb stststs b ststsb stststs b ststsb s"
        );
    }

    #[test]
    fn test_partial_octave_tail() {
        assert_eq!(generate_ago_pattern(5), "ststs");
        assert_eq!(generate_ago_pattern(6), "ststsb s");
    }

    #[test]
    fn test_zero_notes() {
        assert_eq!(generate_ago_pattern(0), "");
    }

    #[test]
    fn test_natural_to_sharp_ratio_per_octave() {
        let pattern = generate_ago_pattern(12);
        assert_eq!(pattern.matches('s').count(), 7);
        assert_eq!(pattern.matches('t').count(), 5);
    }
}
