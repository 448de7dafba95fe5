//! Frame decoder
//!
//! Inverse of the matrix encoder: assembles line bits into pixels and
//! pixels into cells. Only what is visible on the line can be recovered, so
//! a cell with no lit pixel decodes without a color.

use heapless::Vec;
use marquee_protocol::color::BITS_PER_PIXEL;
use marquee_protocol::Grb;

use crate::config::MAX_CHARS;
use crate::font::{Glyph, GLYPH_PIXELS};

/// Cells of one decoded frame
pub type DecodedFrame = Vec<DecodedCell, MAX_CHARS>;

/// Decoding errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// Lit pixels of one cell carry different colors
    MixedColors { cell: usize },
    /// Frame ended inside a cell
    Truncated { bits: usize },
    /// More cells than any buffer holds
    TooManyCells,
}

/// A cell as seen on the LED line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DecodedCell {
    pub glyph: Glyph,
    /// Color of the lit pixels, `None` when no pixel is lit
    pub color: Option<Grb>,
}

impl DecodedCell {
    pub const BLANK: DecodedCell = DecodedCell {
        glyph: Glyph::BLANK,
        color: None,
    };
}

/// Incremental bits-to-cells decoder
#[derive(Debug, Clone, Default)]
pub struct FrameDecoder {
    pixel: u32,
    pixel_bits: usize,
    pixel_index: usize,
    glyph: Glyph,
    color: Option<Grb>,
    cells: usize,
    /// An error was reported; drop bits until the frame ends
    faulted: bool,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one line bit
    ///
    /// Returns a cell on its last bit. After an error the rest of the frame
    /// is ignored.
    pub fn push_bit(&mut self, bit: bool) -> Result<Option<DecodedCell>, DecodeError> {
        if self.faulted {
            return Ok(None);
        }
        if self.cells == MAX_CHARS {
            return self.fail(DecodeError::TooManyCells);
        }

        self.pixel = (self.pixel << 1) | bit as u32;
        self.pixel_bits += 1;
        if self.pixel_bits < BITS_PER_PIXEL {
            return Ok(None);
        }

        let color = Grb::from_bits(self.pixel);
        self.pixel = 0;
        self.pixel_bits = 0;

        if !color.is_black() {
            match self.color {
                Some(seen) if seen != color => {
                    return self.fail(DecodeError::MixedColors { cell: self.cells });
                }
                _ => self.color = Some(color),
            }
            self.glyph.set_pixel(self.pixel_index, true);
        }

        self.pixel_index += 1;
        if self.pixel_index < GLYPH_PIXELS {
            return Ok(None);
        }

        let cell = DecodedCell {
            glyph: self.glyph,
            color: self.color,
        };
        self.pixel_index = 0;
        self.glyph = Glyph::BLANK;
        self.color = None;
        self.cells += 1;
        Ok(Some(cell))
    }

    /// End of frame: returns the number of cells decoded and resets
    pub fn finish(&mut self) -> Result<usize, DecodeError> {
        let partial = self.pixel_index * BITS_PER_PIXEL + self.pixel_bits;
        let faulted = self.faulted;
        let cells = self.cells;
        *self = Self::default();

        if faulted {
            // Already reported
            Ok(cells)
        } else if partial != 0 {
            Err(DecodeError::Truncated { bits: partial })
        } else {
            Ok(cells)
        }
    }

    /// Cells completed in the current frame
    pub fn cells(&self) -> usize {
        self.cells
    }

    fn fail(&mut self, error: DecodeError) -> Result<Option<DecodedCell>, DecodeError> {
        self.faulted = true;
        Err(error)
    }
}

/// Decode a complete frame
pub fn decode<I>(bits: I) -> Result<DecodedFrame, DecodeError>
where
    I: IntoIterator<Item = bool>,
{
    let mut decoder = FrameDecoder::new();
    let mut frame = DecodedFrame::new();

    for bit in bits {
        if let Some(cell) = decoder.push_bit(bit)? {
            frame.push(cell).map_err(|_| DecodeError::TooManyCells)?;
        }
    }
    decoder.finish()?;
    Ok(frame)
}
