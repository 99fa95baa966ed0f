//! DXF cutting-list writer.
//!
//! One sheet of 1:10 board profiles, stacked vertically: each distinct
//! board becomes a closed polyline on layer `BOARDS` with its holes,
//! an annotation label on `TEXT` and width/height dimension lines on
//! `DIMENSIONS`.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use orgelbau_sketch::board_outline;

use crate::board::BoardSpec;
use crate::cutlist::{cut_list, total_area_m2};
use crate::export::ExportError;

const SCALE: f64 = 0.1;
const MARGIN: f64 = 15.0;
const ROW_GAP: f64 = 20.0;
const TEXT_HEIGHT: f64 = 4.0;

struct Dxf {
    body: String,
}

impl Dxf {
    fn new() -> Self {
        Self {
            body: String::new(),
        }
    }

    fn code(&mut self, code: u32, value: impl std::fmt::Display) {
        let _ = writeln!(self.body, "{code}\n{value}");
    }

    fn polyline(&mut self, layer: &str, points: &[(f64, f64)], closed: bool) {
        self.code(0, "LWPOLYLINE");
        self.code(8, layer);
        self.code(90, points.len());
        self.code(70, if closed { 1 } else { 0 });
        for (x, y) in points {
            self.code(10, format!("{x:.3}"));
            self.code(20, format!("{y:.3}"));
        }
    }

    fn line(&mut self, layer: &str, from: (f64, f64), to: (f64, f64)) {
        self.code(0, "LINE");
        self.code(8, layer);
        self.code(10, format!("{:.3}", from.0));
        self.code(20, format!("{:.3}", from.1));
        self.code(11, format!("{:.3}", to.0));
        self.code(21, format!("{:.3}", to.1));
    }

    fn circle(&mut self, layer: &str, center: (f64, f64), radius: f64) {
        self.code(0, "CIRCLE");
        self.code(8, layer);
        self.code(10, format!("{:.3}", center.0));
        self.code(20, format!("{:.3}", center.1));
        self.code(40, format!("{radius:.3}"));
    }

    fn text(&mut self, layer: &str, at: (f64, f64), height: f64, content: &str) {
        self.code(0, "TEXT");
        self.code(8, layer);
        self.code(10, format!("{:.3}", at.0));
        self.code(20, format!("{:.3}", at.1));
        self.code(40, format!("{height:.3}"));
        self.code(1, content);
    }
}

fn header() -> String {
    let mut d = Dxf::new();
    d.code(0, "SECTION");
    d.code(2, "HEADER");
    d.code(9, "$ACADVER");
    d.code(1, "AC1015");
    d.code(9, "$INSUNITS");
    d.code(70, 4);
    d.code(0, "ENDSEC");
    d.body
}

fn layer_table() -> String {
    let mut d = Dxf::new();
    d.code(0, "SECTION");
    d.code(2, "TABLES");
    d.code(0, "TABLE");
    d.code(2, "LAYER");
    d.code(70, 3);
    for (name, color) in [("BOARDS", 1), ("TEXT", 3), ("DIMENSIONS", 2)] {
        d.code(0, "LAYER");
        d.code(2, name);
        d.code(70, 0);
        d.code(62, color);
        d.code(6, "CONTINUOUS");
    }
    d.code(0, "ENDTAB");
    d.code(0, "ENDSEC");
    d.body
}

/// Render the 1:10 cutting sheet for a board layout.
pub fn cut_list_dxf(specs: &[BoardSpec]) -> String {
    let entries = cut_list(specs);
    let mut d = Dxf::new();
    d.code(0, "SECTION");
    d.code(2, "ENTITIES");

    let mut max_x: f64 = 0.0;
    let mut cursor_y = MARGIN;

    for entry in &entries {
        // The first listed spec with this name carries the notch and
        // hole geometry; aggregation only ever folds identical boards.
        let Some(spec) = specs.iter().find(|s| s.listed && s.name == entry.name) else {
            continue;
        };

        let outline: Vec<(f64, f64)> =
            board_outline(spec.max_width, spec.max_height, spec.min_width, spec.min_height)
                .iter()
                .map(|p| (MARGIN + p.x * SCALE, cursor_y + p.y * SCALE))
                .collect();
        d.polyline("BOARDS", &outline, true);

        for h in &spec.rect_holes {
            let x0 = MARGIN + (h.cx - h.width / 2.0) * SCALE;
            let y0 = cursor_y + (h.cy - h.height / 2.0) * SCALE;
            let x1 = MARGIN + (h.cx + h.width / 2.0) * SCALE;
            let y1 = cursor_y + (h.cy + h.height / 2.0) * SCALE;
            d.polyline("BOARDS", &[(x0, y0), (x1, y0), (x1, y1), (x0, y1)], true);
        }
        for h in &spec.circle_holes {
            d.circle(
                "BOARDS",
                (MARGIN + h.cx * SCALE, cursor_y + h.cy * SCALE),
                h.diameter / 2.0 * SCALE,
            );
        }

        let w = spec.max_width * SCALE;
        let h = spec.max_height * SCALE;

        // Width dimension under the board, height dimension to its left.
        d.line("DIMENSIONS", (MARGIN, cursor_y - 3.0), (MARGIN + w, cursor_y - 3.0));
        d.text(
            "DIMENSIONS",
            (MARGIN + w / 2.0 - 5.0, cursor_y - 7.0),
            TEXT_HEIGHT * 0.75,
            &format!("{}", entry.width),
        );
        d.line("DIMENSIONS", (MARGIN - 3.0, cursor_y), (MARGIN - 3.0, cursor_y + h));
        d.text(
            "DIMENSIONS",
            (MARGIN - 12.0, cursor_y + h / 2.0),
            TEXT_HEIGHT * 0.75,
            &format!("{}", entry.height),
        );

        let mut label = format!(
            "{} ({} x {} x {} mm)",
            entry.name, entry.width, entry.height, entry.thickness
        );
        if entry.quantity > 1 {
            let _ = write!(label, " x{}", entry.quantity);
        }
        d.text("TEXT", (MARGIN + w + 8.0, cursor_y + h / 2.0), TEXT_HEIGHT, &label);

        max_x = max_x.max(MARGIN + w + 8.0 + label.len() as f64 * TEXT_HEIGHT * 0.7);
        cursor_y += h + ROW_GAP;
    }

    // Title block and totals above the stack, border around everything.
    let board_count: u32 = entries.iter().map(|e| e.quantity).sum();
    d.text(
        "TEXT",
        (MARGIN, cursor_y + 10.0),
        TEXT_HEIGHT * 1.5,
        "ORGAN CONSOLE - CUTTING LIST (1:10 SCALE)",
    );
    d.text(
        "TEXT",
        (MARGIN, cursor_y + 2.0),
        TEXT_HEIGHT,
        &format!(
            "{} boards, {:.2} m2 total",
            board_count,
            total_area_m2(&entries)
        ),
    );

    let top = cursor_y + 20.0;
    let right = max_x.max(MARGIN + 120.0) + MARGIN;
    d.polyline(
        "DIMENSIONS",
        &[(0.0, 0.0), (right, 0.0), (right, top), (0.0, top)],
        true,
    );

    d.code(0, "ENDSEC");

    let mut out = header();
    out.push_str(&layer_table());
    out.push_str(&d.body);
    out.push_str("0\nEOF\n");
    out
}

/// Write the cutting sheet to a DXF file.
pub fn write_cut_list_dxf(specs: &[BoardSpec], path: &Path) -> Result<(), ExportError> {
    fs::write(path, cut_list_dxf(specs))?;
    Ok(())
}
