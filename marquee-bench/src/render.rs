//! ASCII-art rendering of decoded frames
//!
//! Each cell is drawn as 7 rows of 5 characters, `O` for a lit pixel and
//! `.` for a dark one. Cells sit side by side, one space apart.

use marquee_core::font::{GLYPH_HEIGHT, GLYPH_WIDTH};
use marquee_core::{DecodedCell, Glyph};

/// One row of a glyph
pub fn glyph_row(glyph: Glyph, row: usize) -> String {
    (0..GLYPH_WIDTH)
        .map(|col| if glyph.at(row, col) { 'O' } else { '.' })
        .collect()
}

/// All cells of a frame, one line per pixel row
pub fn render_frame(cells: &[DecodedCell]) -> String {
    (0..GLYPH_HEIGHT)
        .map(|row| {
            cells
                .iter()
                .map(|cell| glyph_row(cell.glyph, row))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
