//! A3 technical-drawing sheet writer.
//!
//! A fixed 3x3 grid on a 420x297 mm page: the six orthographic views,
//! one isometric view, one vertically exploded view and a title block.
//! Edges come from the hidden-line projection; visible edges are drawn
//! solid, hidden edges dashed.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use orgelbau_drafting::{project_mesh, ProjectedView, ViewDirection};
use orgelbau_math::Transform;
use orgelbau_mesh::TriangleMesh;

use crate::assembly::Assembly;
use crate::export::ExportError;

const PAGE_W: f64 = 420.0;
const PAGE_H: f64 = 297.0;
const CELL_W: f64 = PAGE_W / 3.0;
const CELL_H: f64 = PAGE_H / 3.0;
const FIT: f64 = 0.85;
const EXPLODE_STEP: f64 = 150.0;

const VISIBLE_STROKE: &str = "#8B4513";
const HIDDEN_STROKE: &str = "#999999";

struct Cell {
    x: f64,
    y: f64,
}

/// Scale and offset mapping view coordinates into a cell, Y flipped so
/// model-up is page-up.
struct CellMap {
    scale: f64,
    offset_x: f64,
    offset_y: f64,
    min_x: f64,
    min_y: f64,
    cell: Cell,
}

impl CellMap {
    fn fit(view: &ProjectedView, cell: Cell) -> Option<Self> {
        if !view.bounds.is_valid() {
            return None;
        }
        let w = view.bounds.width().max(1e-9);
        let h = view.bounds.height().max(1e-9);
        let scale = (CELL_W * FIT / w).min(CELL_H * FIT / h);
        Some(Self {
            scale,
            offset_x: (CELL_W - w * scale) / 2.0,
            offset_y: (CELL_H - h * scale) / 2.0,
            min_x: view.bounds.min_x,
            min_y: view.bounds.min_y,
            cell,
        })
    }

    fn map(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.cell.x + self.offset_x + (x - self.min_x) * self.scale,
            self.cell.y + CELL_H - self.offset_y - (y - self.min_y) * self.scale,
        )
    }
}

fn edge_lines(out: &mut String, view: &ProjectedView, map: &CellMap) {
    for edge in view.visible_edges() {
        let (x1, y1) = map.map(edge.start.x, edge.start.y);
        let (x2, y2) = map.map(edge.end.x, edge.end.y);
        let _ = writeln!(
            out,
            r#"<line x1="{x1:.2}" y1="{y1:.2}" x2="{x2:.2}" y2="{y2:.2}" stroke="{VISIBLE_STROKE}" stroke-width="0.5"/>"#
        );
    }
    for edge in view.hidden_edges() {
        let (x1, y1) = map.map(edge.start.x, edge.start.y);
        let (x2, y2) = map.map(edge.end.x, edge.end.y);
        let _ = writeln!(
            out,
            r#"<line x1="{x1:.2}" y1="{y1:.2}" x2="{x2:.2}" y2="{y2:.2}" stroke="{HIDDEN_STROKE}" stroke-width="0.25" stroke-dasharray="2,1"/>"#
        );
    }
}

fn cell_label(out: &mut String, cell: &Cell, label: &str) {
    let _ = writeln!(
        out,
        r##"<text x="{:.2}" y="{:.2}" font-size="4" font-family="sans-serif" fill="#333333">{label}</text>"##,
        cell.x + 3.0,
        cell.y + 6.0,
    );
}

/// Horizontal dimension call-out under the view.
fn dim_horizontal(out: &mut String, map: &CellMap, view: &ProjectedView, label: &str) {
    let (x1, y) = map.map(view.bounds.min_x, view.bounds.min_y);
    let (x2, _) = map.map(view.bounds.max_x, view.bounds.min_y);
    let y = y + 5.0;
    let _ = writeln!(
        out,
        r##"<line x1="{x1:.2}" y1="{y:.2}" x2="{x2:.2}" y2="{y:.2}" stroke="#333333" stroke-width="0.25" marker-start="url(#arrow-rev)" marker-end="url(#arrow)"/>"##
    );
    let _ = writeln!(
        out,
        r##"<text x="{:.2}" y="{:.2}" font-size="3" font-family="sans-serif" fill="#333333" text-anchor="middle">{label}</text>"##,
        (x1 + x2) / 2.0,
        y - 1.0,
    );
}

/// Vertical dimension call-out left of the view.
fn dim_vertical(out: &mut String, map: &CellMap, view: &ProjectedView, label: &str) {
    let (x, y1) = map.map(view.bounds.min_x, view.bounds.min_y);
    let (_, y2) = map.map(view.bounds.min_x, view.bounds.max_y);
    let x = x - 5.0;
    let _ = writeln!(
        out,
        r##"<line x1="{x:.2}" y1="{y1:.2}" x2="{x:.2}" y2="{y2:.2}" stroke="#333333" stroke-width="0.25" marker-start="url(#arrow-rev)" marker-end="url(#arrow)"/>"##
    );
    let _ = writeln!(
        out,
        r##"<text x="{:.2}" y="{:.2}" font-size="3" font-family="sans-serif" fill="#333333" text-anchor="middle" transform="rotate(-90 {:.2} {:.2})">{label}</text>"##,
        x - 1.0,
        (y1 + y2) / 2.0,
        x - 1.0,
        (y1 + y2) / 2.0,
    );
}

/// Parts lifted apart along +Z for the exploded view.
fn exploded_mesh(assembly: &Assembly) -> TriangleMesh {
    let mut merged = TriangleMesh::new();
    for (i, part) in assembly.parts.iter().enumerate() {
        let mut mesh = part.mesh.clone();
        mesh.apply_transform(&Transform::placement(
            [0.0, 0.0, i as f64 * EXPLODE_STEP],
            [0.0, 0.0, 0.0],
        ));
        merged.merge(&mesh);
    }
    merged
}

/// Render the drawing sheet as an SVG document.
pub fn drawing_svg(assembly: &Assembly) -> String {
    let mesh = assembly.merged_mesh();
    let (dims, entry_count) = match assembly.bounding_box() {
        Some((min, max)) => (
            format!(
                "{:.0} x {:.0} x {:.0} mm",
                max.x - min.x,
                max.y - min.y,
                max.z - min.z
            ),
            assembly.num_parts(),
        ),
        None => ("empty".to_string(), 0),
    };

    let mut out = String::new();
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{PAGE_W}mm" height="{PAGE_H}mm" viewBox="0 0 {PAGE_W} {PAGE_H}">"#
    );
    out.push_str(concat!(
        "<defs>\n",
        r##"<marker id="arrow" markerWidth="6" markerHeight="6" refX="5" refY="3" orient="auto"><path d="M0,0 L6,3 L0,6 z" fill="#333333"/></marker>"##,
        "\n",
        r##"<marker id="arrow-rev" markerWidth="6" markerHeight="6" refX="1" refY="3" orient="auto"><path d="M6,0 L0,3 L6,6 z" fill="#333333"/></marker>"##,
        "\n</defs>\n",
    ));
    let _ = writeln!(
        out,
        r##"<rect x="0" y="0" width="{PAGE_W}" height="{PAGE_H}" fill="white" stroke="#333333" stroke-width="0.5"/>"##
    );

    // Grid lines.
    for i in 1..3 {
        let x = CELL_W * i as f64;
        let y = CELL_H * i as f64;
        let _ = writeln!(
            out,
            r##"<line x1="{x}" y1="0" x2="{x}" y2="{PAGE_H}" stroke="#cccccc" stroke-width="0.2"/>"##
        );
        let _ = writeln!(
            out,
            r##"<line x1="0" y1="{y}" x2="{PAGE_W}" y2="{y}" stroke="#cccccc" stroke-width="0.2"/>"##
        );
    }

    let ortho = [
        ("Front", ViewDirection::Front, 0, 0),
        ("Back", ViewDirection::Back, 1, 0),
        ("Top", ViewDirection::Top, 2, 0),
        ("Bottom", ViewDirection::Bottom, 0, 1),
        ("Left", ViewDirection::Left, 1, 1),
        ("Right", ViewDirection::Right, 2, 1),
    ];
    for (label, direction, col, row) in ortho {
        let cell = Cell {
            x: CELL_W * col as f64,
            y: CELL_H * row as f64,
        };
        cell_label(&mut out, &cell, label);
        let view = project_mesh(&mesh, direction);
        if let Some(map) = CellMap::fit(&view, cell) {
            edge_lines(&mut out, &view, &map);
            if label == "Front" {
                dim_horizontal(
                    &mut out,
                    &map,
                    &view,
                    &format!("{:.0}", view.bounds.width()),
                );
                dim_vertical(
                    &mut out,
                    &map,
                    &view,
                    &format!("{:.0}", view.bounds.height()),
                );
            }
            if label == "Right" {
                dim_horizontal(
                    &mut out,
                    &map,
                    &view,
                    &format!("{:.0}", view.bounds.width()),
                );
            }
        }
    }

    // Bottom row: isometric, exploded, title block.
    let iso_cell = Cell { x: 0.0, y: CELL_H * 2.0 };
    cell_label(&mut out, &iso_cell, "Isometric");
    let iso = project_mesh(&mesh, ViewDirection::ISOMETRIC_STANDARD);
    if let Some(map) = CellMap::fit(&iso, iso_cell) {
        edge_lines(&mut out, &iso, &map);
    }

    let exploded_cell = Cell { x: CELL_W, y: CELL_H * 2.0 };
    cell_label(&mut out, &exploded_cell, "Exploded");
    let exploded = project_mesh(&exploded_mesh(assembly), ViewDirection::Front);
    if let Some(map) = CellMap::fit(&exploded, exploded_cell) {
        edge_lines(&mut out, &exploded, &map);
    }

    let tb = Cell { x: CELL_W * 2.0, y: CELL_H * 2.0 };
    let _ = writeln!(
        out,
        r##"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="none" stroke="#333333" stroke-width="0.4"/>"##,
        tb.x + 5.0,
        tb.y + 5.0,
        CELL_W - 10.0,
        CELL_H - 10.0,
    );
    for (i, line) in [
        format!("ORGAN CONSOLE: {}", assembly.name.to_uppercase()),
        format!("Parts: {entry_count}"),
        format!("Overall: {dims}"),
        "Scale: fitted per view".to_string(),
    ]
    .iter()
    .enumerate()
    {
        let _ = writeln!(
            out,
            r##"<text x="{:.2}" y="{:.2}" font-size="4" font-family="sans-serif" fill="#333333">{line}</text>"##,
            tb.x + 9.0,
            tb.y + 14.0 + i as f64 * 8.0,
        );
    }

    out.push_str("</svg>\n");
    out
}

/// Write the drawing sheet to an SVG file.
pub fn write_drawing_svg(assembly: &Assembly, path: &Path) -> Result<(), ExportError> {
    fs::write(path, drawing_svg(assembly))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::tests::small_assembly;

    #[test]
    fn test_sheet_structure() {
        let svg = drawing_svg(&small_assembly());
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"viewBox="0 0 420 297""#));
        for label in ["Front", "Back", "Top", "Bottom", "Left", "Right", "Isometric", "Exploded"] {
            assert!(svg.contains(&format!(">{label}</text>")), "missing {label}");
        }
        assert!(svg.contains("ORGAN CONSOLE: TEST"));
    }

    #[test]
    fn test_edge_styles() {
        // A small board centered behind a large one, so the front view
        // genuinely occludes edges.
        use crate::board::BoardSpec;
        use crate::consoles;
        use orgelbau_mesh::TessellationQuality;

        let specs = vec![
            BoardSpec::new("Big", 100.0, 100.0, 2.0).rotated([0.0, 0.0, 90.0]),
            BoardSpec::new("Small", 50.0, 50.0, 2.0)
                .at([-25.0, 50.0, 25.0])
                .rotated([0.0, 0.0, 90.0]),
        ];
        let assembly = consoles::assemble("occlusion", &specs, TessellationQuality::Coarse).unwrap();
        let svg = drawing_svg(&assembly);
        assert!(svg.contains(VISIBLE_STROKE));
        assert!(svg.contains("stroke-dasharray"));
    }

    #[test]
    fn test_dimension_markers() {
        let svg = drawing_svg(&small_assembly());
        assert!(svg.contains(r#"marker-end="url(#arrow)""#));
        assert!(svg.contains(r#"<marker id="arrow""#));
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet.svg");
        write_drawing_svg(&small_assembly(), &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.ends_with("</svg>\n"));
    }
}
