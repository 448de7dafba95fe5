//! Character cells

use marquee_protocol::Grb;

use crate::config::DimmerLevel;
use crate::decoder::DecodedCell;
use crate::font::Glyph;

/// One character slot: a glyph drawn in a single color
///
/// Cells are values; the buffer replaces them whole and never edits one in
/// place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CharacterCell {
    pub glyph: Glyph,
    pub color: Grb,
}

impl CharacterCell {
    /// Dark cell, the content of every slot after reset
    pub const BLANK: CharacterCell = CharacterCell {
        glyph: Glyph::BLANK,
        color: Grb::BLACK,
    };

    pub const fn new(glyph: Glyph, color: Grb) -> Self {
        Self { glyph, color }
    }

    /// Check if no pixel is lit
    pub const fn is_blank(&self) -> bool {
        self.glyph.is_blank()
    }

    /// What an observer of the LED line sees for this cell
    ///
    /// A cell with no lit pixel, or whose color dims to black, carries no
    /// recoverable color and reads back as a blank glyph.
    pub fn rendered(&self, dimmer: DimmerLevel) -> DecodedCell {
        let color = self.color.dimmed(dimmer.shift());
        if self.glyph.is_blank() || color.is_black() {
            DecodedCell::BLANK
        } else {
            DecodedCell {
                glyph: self.glyph,
                color: Some(color),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font;
    use crate::palette;

    #[test]
    fn test_blank_cell() {
        assert!(CharacterCell::BLANK.is_blank());
        assert_eq!(CharacterCell::default(), CharacterCell::BLANK);
        assert_eq!(
            CharacterCell::BLANK.rendered(DimmerLevel::FULL),
            DecodedCell::BLANK
        );
    }

    #[test]
    fn test_rendered_applies_dimmer() {
        let cell = CharacterCell::new(font::glyph(b'A'), palette::color(3));
        let dim = DimmerLevel::new(2).unwrap();

        let seen = cell.rendered(dim);
        assert_eq!(seen.glyph, cell.glyph);
        assert_eq!(seen.color, Some(Grb::new(51, 44, 0)));
    }

    #[test]
    fn test_space_reads_back_blank_whatever_its_color() {
        let cell = CharacterCell::new(font::glyph(b' '), palette::color(9));
        assert_eq!(cell.rendered(DimmerLevel::FULL), DecodedCell::BLANK);
    }

    #[test]
    fn test_color_dimmed_to_black_reads_back_blank() {
        let cell = CharacterCell::new(font::glyph(b'x'), Grb::new(3, 0, 0));
        let dim = DimmerLevel::new(3).unwrap();
        assert_eq!(cell.rendered(dim), DecodedCell::BLANK);
    }
}
