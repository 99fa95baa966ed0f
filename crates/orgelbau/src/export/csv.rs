//! Cutting-list CSV writer.

use std::fs;
use std::path::Path;

use crate::cutlist::CutListEntry;
use crate::export::ExportError;

const HEADER: &str = "Name,Width (mm),Height (mm),Thickness (mm),Description,Notes";

/// Quote a field when it contains a comma, a quote or a newline.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Render the cutting list as CSV text.
pub fn cut_list_csv(entries: &[CutListEntry]) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');
    for entry in entries {
        let description = if entry.quantity > 1 {
            format!("{} (quantity: {})", entry.description, entry.quantity)
        } else {
            entry.description.clone()
        };
        out.push_str(&format!(
            "{},{},{},{},{},{}\n",
            csv_field(&entry.name),
            entry.width,
            entry.height,
            entry.thickness,
            csv_field(&description),
            csv_field(&entry.notes),
        ));
    }
    out
}

/// Write the cutting list to a CSV file.
pub fn write_cut_list_csv(entries: &[CutListEntry], path: &Path) -> Result<(), ExportError> {
    fs::write(path, cut_list_csv(entries))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, quantity: u32, description: &str, notes: &str) -> CutListEntry {
        CutListEntry {
            name: name.to_string(),
            width: 500.0,
            height: 300.0,
            thickness: 18.0,
            quantity,
            description: description.to_string(),
            notes: notes.to_string(),
        }
    }

    #[test]
    fn test_header_and_row() {
        let csv = cut_list_csv(&[entry("Back", 1, "Back panel", "")]);
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Name,Width (mm),Height (mm),Thickness (mm),Description,Notes"
        );
        assert_eq!(lines.next().unwrap(), "Back,500,300,18,Back panel,");
    }

    #[test]
    fn test_quantity_lands_in_description() {
        let csv = cut_list_csv(&[entry("Pedal", 3, "Volume pedal", "")]);
        assert!(csv.contains("Volume pedal (quantity: 3)"));
    }

    #[test]
    fn test_comma_fields_are_quoted() {
        let csv = cut_list_csv(&[entry("Side", 1, "Left, notched", "Notch at: X=350mm, Y=150mm")]);
        assert!(csv.contains("\"Left, notched\""));
        assert!(csv.contains("\"Notch at: X=350mm, Y=150mm\""));
    }
}
