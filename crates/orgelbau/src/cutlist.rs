//! Cutting-list derivation.
//!
//! Entries are derived straight from the board specs that also drive the
//! 3D build. Boards with identical name and dimensions (repeated pedals,
//! mirrored side panels built from one record) are folded into a single
//! line with a summed quantity.

use serde::{Deserialize, Serialize};

use crate::board::BoardSpec;

const DIM_EPS: f64 = 1e-6;

/// One line of the cutting list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutListEntry {
    /// Board name.
    pub name: String,
    /// Profile width in mm.
    pub width: f64,
    /// Profile height in mm.
    pub height: f64,
    /// Board thickness in mm.
    pub thickness: f64,
    /// Number of identical copies.
    pub quantity: u32,
    /// Purpose of the board.
    pub description: String,
    /// Extra manufacturing notes (notch coordinates and the like).
    pub notes: String,
}

impl CutListEntry {
    fn matches(&self, other: &CutListEntry) -> bool {
        self.name == other.name
            && (self.width - other.width).abs() < DIM_EPS
            && (self.height - other.height).abs() < DIM_EPS
            && (self.thickness - other.thickness).abs() < DIM_EPS
    }
}

/// Derive the cutting list from a board layout.
///
/// Unlisted boards (keys, caps marked `listed = false`) are skipped;
/// identical boards are aggregated.
pub fn cut_list(specs: &[BoardSpec]) -> Vec<CutListEntry> {
    let mut entries: Vec<CutListEntry> = Vec::new();
    for spec in specs.iter().filter(|s| s.listed) {
        let entry = spec.cut_entry();
        match entries.iter_mut().find(|e| e.matches(&entry)) {
            Some(existing) => existing.quantity += entry.quantity,
            None => entries.push(entry),
        }
    }
    entries
}

/// Total board area of the cutting list in square meters.
pub fn total_area_m2(entries: &[CutListEntry]) -> f64 {
    entries
        .iter()
        .map(|e| e.width * e.height * f64::from(e.quantity))
        .sum::<f64>()
        / 1e6
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_boards_are_aggregated() {
        let specs = vec![
            BoardSpec::new("Volume Pedals", 120.0, 240.0, 18.0).at([0.0, 0.0, 0.0]),
            BoardSpec::new("Volume Pedals", 120.0, 240.0, 18.0).at([130.0, 0.0, 0.0]),
            BoardSpec::new("Volume Pedals", 120.0, 240.0, 18.0).at([260.0, 0.0, 0.0]),
            BoardSpec::new("Back", 1300.0, 800.0, 18.0),
        ];
        let entries = cut_list(&specs);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].quantity, 3);
        assert_eq!(entries[1].quantity, 1);
    }

    #[test]
    fn test_unlisted_boards_are_skipped() {
        let specs = vec![
            BoardSpec::new("Board", 100.0, 100.0, 18.0),
            BoardSpec::new("White Key", 23.0, 150.0, 15.0).unlisted(),
        ];
        let entries = cut_list(&specs);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "Board");
    }

    #[test]
    fn test_total_area() {
        let specs = vec![
            BoardSpec::new("A", 1000.0, 500.0, 18.0),
            BoardSpec::new("A", 1000.0, 500.0, 18.0),
        ];
        let entries = cut_list(&specs);
        assert!((total_area_m2(&entries) - 1.0).abs() < 1e-9);
    }
}
