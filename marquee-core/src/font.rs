//! 5x7 bitmap font
//!
//! Glyphs cover printable ASCII (32..=126). Every other byte resolves to the
//! blank glyph.
//!
//! A [`Glyph`] stores its 35 pixels row-major: pixel `row * 5 + col` is bit
//! `row * 5 + col`, row 0 at the top and column 0 on the left. The source
//! table below is column-major (five bytes per character, bit 0 = top row),
//! the layout most 5x7 LCD fonts are published in.

/// Glyph width in pixels
pub const GLYPH_WIDTH: usize = 5;

/// Glyph height in pixels
pub const GLYPH_HEIGHT: usize = 7;

/// Pixels per glyph
pub const GLYPH_PIXELS: usize = GLYPH_WIDTH * GLYPH_HEIGHT;

/// First character in the table
pub const FIRST_PRINTABLE: u8 = b' ';

/// Last character in the table
pub const LAST_PRINTABLE: u8 = b'~';

const PIXEL_MASK: u64 = (1 << GLYPH_PIXELS) - 1;

/// A 35-pixel character bitmap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Glyph(u64);

impl Glyph {
    /// All pixels off
    pub const BLANK: Glyph = Glyph(0);

    /// Build a glyph from raw row-major pixel bits; bits above 34 are dropped
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits & PIXEL_MASK)
    }

    /// Raw row-major pixel bits
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Build a glyph from five column bytes, bit 0 = top row
    pub const fn from_columns(columns: [u8; GLYPH_WIDTH]) -> Self {
        let mut bits = 0u64;
        let mut col = 0;
        while col < GLYPH_WIDTH {
            let mut row = 0;
            while row < GLYPH_HEIGHT {
                if (columns[col] >> row) & 1 != 0 {
                    bits |= 1 << (row * GLYPH_WIDTH + col);
                }
                row += 1;
            }
            col += 1;
        }
        Self(bits)
    }

    /// Pixel by row-major index, 0..35
    pub const fn pixel(self, index: usize) -> bool {
        index < GLYPH_PIXELS && (self.0 >> index) & 1 != 0
    }

    /// Pixel at `row`, `col`
    pub const fn at(self, row: usize, col: usize) -> bool {
        col < GLYPH_WIDTH && self.pixel(row * GLYPH_WIDTH + col)
    }

    /// Set a pixel by row-major index
    pub fn set_pixel(&mut self, index: usize, on: bool) {
        if index >= GLYPH_PIXELS {
            return;
        }
        if on {
            self.0 |= 1 << index;
        } else {
            self.0 &= !(1 << index);
        }
    }

    /// Check if no pixel is lit
    pub const fn is_blank(self) -> bool {
        self.0 == 0
    }

    /// Number of lit pixels
    pub const fn lit(self) -> u32 {
        self.0.count_ones()
    }
}

/// Look up the glyph for a byte
pub fn glyph(byte: u8) -> Glyph {
    if (FIRST_PRINTABLE..=LAST_PRINTABLE).contains(&byte) {
        GLYPHS[(byte - FIRST_PRINTABLE) as usize]
    } else {
        Glyph::BLANK
    }
}

/// Reverse lookup: the printable character drawn by `glyph`
///
/// The blank glyph maps to a space.
pub fn character(glyph: Glyph) -> Option<u8> {
    GLYPHS
        .iter()
        .position(|g| *g == glyph)
        .map(|index| FIRST_PRINTABLE + index as u8)
}

const GLYPH_COUNT: usize = (LAST_PRINTABLE - FIRST_PRINTABLE) as usize + 1;

static GLYPHS: [Glyph; GLYPH_COUNT] = build_glyphs();

const fn build_glyphs() -> [Glyph; GLYPH_COUNT] {
    let mut glyphs = [Glyph::BLANK; GLYPH_COUNT];
    let mut i = 0;
    while i < GLYPH_COUNT {
        glyphs[i] = Glyph::from_columns(FONT_5X7[i]);
        i += 1;
    }
    glyphs
}

#[rustfmt::skip]
const FONT_5X7: [[u8; GLYPH_WIDTH]; GLYPH_COUNT] = [
    [0x00, 0x00, 0x00, 0x00, 0x00], // ' '
    [0x00, 0x00, 0x5F, 0x00, 0x00], // '!'
    [0x00, 0x07, 0x00, 0x07, 0x00], // '"'
    [0x14, 0x7F, 0x14, 0x7F, 0x14], // '#'
    [0x24, 0x2A, 0x7F, 0x2A, 0x12], // '$'
    [0x23, 0x13, 0x08, 0x64, 0x62], // '%'
    [0x36, 0x49, 0x55, 0x22, 0x50], // '&'
    [0x00, 0x05, 0x03, 0x00, 0x00], // '''
    [0x00, 0x1C, 0x22, 0x41, 0x00], // '('
    [0x00, 0x41, 0x22, 0x1C, 0x00], // ')'
    [0x08, 0x2A, 0x1C, 0x2A, 0x08], // '*'
    [0x08, 0x08, 0x3E, 0x08, 0x08], // '+'
    [0x00, 0x50, 0x30, 0x00, 0x00], // ','
    [0x08, 0x08, 0x08, 0x08, 0x08], // '-'
    [0x00, 0x60, 0x60, 0x00, 0x00], // '.'
    [0x20, 0x10, 0x08, 0x04, 0x02], // '/'
    [0x3E, 0x51, 0x49, 0x45, 0x3E], // '0'
    [0x00, 0x42, 0x7F, 0x40, 0x00], // '1'
    [0x42, 0x61, 0x51, 0x49, 0x46], // '2'
    [0x21, 0x41, 0x45, 0x4B, 0x31], // '3'
    [0x18, 0x14, 0x12, 0x7F, 0x10], // '4'
    [0x27, 0x45, 0x45, 0x45, 0x39], // '5'
    [0x3C, 0x4A, 0x49, 0x49, 0x30], // '6'
    [0x01, 0x71, 0x09, 0x05, 0x03], // '7'
    [0x36, 0x49, 0x49, 0x49, 0x36], // '8'
    [0x06, 0x49, 0x49, 0x29, 0x1E], // '9'
    [0x00, 0x36, 0x36, 0x00, 0x00], // ':'
    [0x00, 0x56, 0x36, 0x00, 0x00], // ';'
    [0x08, 0x14, 0x22, 0x41, 0x00], // '<'
    [0x14, 0x14, 0x14, 0x14, 0x14], // '='
    [0x00, 0x41, 0x22, 0x14, 0x08], // '>'
    [0x02, 0x01, 0x51, 0x09, 0x06], // '?'
    [0x32, 0x49, 0x79, 0x41, 0x3E], // '@'
    [0x7E, 0x11, 0x11, 0x11, 0x7E], // 'A'
    [0x7F, 0x49, 0x49, 0x49, 0x36], // 'B'
    [0x3E, 0x41, 0x41, 0x41, 0x22], // 'C'
    [0x7F, 0x41, 0x41, 0x22, 0x1C], // 'D'
    [0x7F, 0x49, 0x49, 0x49, 0x41], // 'E'
    [0x7F, 0x09, 0x09, 0x09, 0x01], // 'F'
    [0x3E, 0x41, 0x49, 0x49, 0x7A], // 'G'
    [0x7F, 0x08, 0x08, 0x08, 0x7F], // 'H'
    [0x00, 0x41, 0x7F, 0x41, 0x00], // 'I'
    [0x20, 0x40, 0x41, 0x3F, 0x01], // 'J'
    [0x7F, 0x08, 0x14, 0x22, 0x41], // 'K'
    [0x7F, 0x40, 0x40, 0x40, 0x40], // 'L'
    [0x7F, 0x02, 0x0C, 0x02, 0x7F], // 'M'
    [0x7F, 0x04, 0x08, 0x10, 0x7F], // 'N'
    [0x3E, 0x41, 0x41, 0x41, 0x3E], // 'O'
    [0x7F, 0x09, 0x09, 0x09, 0x06], // 'P'
    [0x3E, 0x41, 0x51, 0x21, 0x5E], // 'Q'
    [0x7F, 0x09, 0x19, 0x29, 0x46], // 'R'
    [0x46, 0x49, 0x49, 0x49, 0x31], // 'S'
    [0x01, 0x01, 0x7F, 0x01, 0x01], // 'T'
    [0x3F, 0x40, 0x40, 0x40, 0x3F], // 'U'
    [0x1F, 0x20, 0x40, 0x20, 0x1F], // 'V'
    [0x3F, 0x40, 0x38, 0x40, 0x3F], // 'W'
    [0x63, 0x14, 0x08, 0x14, 0x63], // 'X'
    [0x07, 0x08, 0x70, 0x08, 0x07], // 'Y'
    [0x61, 0x51, 0x49, 0x45, 0x43], // 'Z'
    [0x00, 0x7F, 0x41, 0x41, 0x00], // '['
    [0x02, 0x04, 0x08, 0x10, 0x20], // '\'
    [0x00, 0x41, 0x41, 0x7F, 0x00], // ']'
    [0x04, 0x02, 0x01, 0x02, 0x04], // '^'
    [0x40, 0x40, 0x40, 0x40, 0x40], // '_'
    [0x00, 0x01, 0x02, 0x04, 0x00], // '`'
    [0x20, 0x54, 0x54, 0x54, 0x78], // 'a'
    [0x7F, 0x48, 0x44, 0x44, 0x38], // 'b'
    [0x38, 0x44, 0x44, 0x44, 0x20], // 'c'
    [0x38, 0x44, 0x44, 0x48, 0x7F], // 'd'
    [0x38, 0x54, 0x54, 0x54, 0x18], // 'e'
    [0x08, 0x7E, 0x09, 0x01, 0x02], // 'f'
    [0x0C, 0x52, 0x52, 0x52, 0x3E], // 'g'
    [0x7F, 0x08, 0x04, 0x04, 0x78], // 'h'
    [0x00, 0x44, 0x7D, 0x40, 0x00], // 'i'
    [0x20, 0x40, 0x44, 0x3D, 0x00], // 'j'
    [0x7F, 0x10, 0x28, 0x44, 0x00], // 'k'
    [0x00, 0x41, 0x7F, 0x40, 0x00], // 'l'
    [0x7C, 0x04, 0x18, 0x04, 0x78], // 'm'
    [0x7C, 0x08, 0x04, 0x04, 0x78], // 'n'
    [0x38, 0x44, 0x44, 0x44, 0x38], // 'o'
    [0x7C, 0x14, 0x14, 0x14, 0x08], // 'p'
    [0x08, 0x14, 0x14, 0x18, 0x7C], // 'q'
    [0x7C, 0x08, 0x04, 0x04, 0x08], // 'r'
    [0x48, 0x54, 0x54, 0x54, 0x20], // 's'
    [0x04, 0x3F, 0x44, 0x40, 0x20], // 't'
    [0x3C, 0x40, 0x40, 0x20, 0x7C], // 'u'
    [0x1C, 0x20, 0x40, 0x20, 0x1C], // 'v'
    [0x3C, 0x40, 0x30, 0x40, 0x3C], // 'w'
    [0x44, 0x28, 0x10, 0x28, 0x44], // 'x'
    [0x0C, 0x50, 0x50, 0x50, 0x3C], // 'y'
    [0x44, 0x64, 0x54, 0x4C, 0x44], // 'z'
    [0x00, 0x08, 0x36, 0x41, 0x00], // '{'
    [0x00, 0x00, 0x7F, 0x00, 0x00], // '|'
    [0x00, 0x41, 0x36, 0x08, 0x00], // '}'
    [0x08, 0x04, 0x08, 0x10, 0x08], // '~'
];
