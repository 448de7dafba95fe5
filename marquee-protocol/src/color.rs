//! 24-bit pixel colors in wire order.

/// Number of bits sent per pixel
pub const BITS_PER_PIXEL: usize = 24;

/// A pixel color as it travels on the LED line: green, red, blue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Grb {
    pub g: u8,
    pub r: u8,
    pub b: u8,
}

impl Grb {
    /// All channels off
    pub const BLACK: Grb = Grb { g: 0, r: 0, b: 0 };

    /// Create a color from its channels
    pub const fn new(g: u8, r: u8, b: u8) -> Self {
        Self { g, r, b }
    }

    /// Build a color from its 24-bit wire value (`0xGGRRBB`)
    pub const fn from_bits(bits: u32) -> Self {
        Self {
            g: (bits >> 16) as u8,
            r: (bits >> 8) as u8,
            b: bits as u8,
        }
    }

    /// 24-bit wire value (`0xGGRRBB`)
    pub const fn to_bits(self) -> u32 {
        ((self.g as u32) << 16) | ((self.r as u32) << 8) | self.b as u32
    }

    /// Bit `index` of the wire sequence, 0 being the first bit sent
    /// (green MSB) and 23 the last (blue LSB).
    pub const fn wire_bit(self, index: usize) -> bool {
        (self.to_bits() >> (BITS_PER_PIXEL - 1 - index)) & 1 != 0
    }

    /// Scale every channel down by `2^shift`
    pub const fn dimmed(self, shift: u8) -> Self {
        Self {
            g: self.g >> shift,
            r: self.r >> shift,
            b: self.b >> shift,
        }
    }

    /// Check if every channel is off
    pub const fn is_black(self) -> bool {
        self.g == 0 && self.r == 0 && self.b == 0
    }
}
