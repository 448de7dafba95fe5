//! Sixteen-color hue wheel
//!
//! Hue swept in 16 steps of 22.5° at saturation 1.0 and value 0.8, each
//! channel truncated to 8 bits.

use marquee_protocol::Grb;

/// Number of palette entries
pub const PALETTE_SIZE: usize = 16;

/// Palette index mask
pub const INDEX_MASK: u8 = (PALETTE_SIZE - 1) as u8;

/// The palette in green, red, blue order
pub const PALETTE: [Grb; PALETTE_SIZE] = [
    Grb::new(0, 204, 0),     // 0°     red
    Grb::new(76, 204, 0),    // 22.5°
    Grb::new(153, 204, 0),   // 45°
    Grb::new(204, 178, 0),   // 67.5°
    Grb::new(204, 102, 0),   // 90°
    Grb::new(204, 25, 0),    // 112.5°
    Grb::new(204, 0, 51),    // 135°
    Grb::new(204, 0, 127),   // 157.5°
    Grb::new(204, 0, 204),   // 180°   cyan
    Grb::new(127, 0, 204),   // 202.5°
    Grb::new(51, 0, 204),    // 225°
    Grb::new(0, 25, 204),    // 247.5°
    Grb::new(0, 102, 204),   // 270°
    Grb::new(0, 178, 204),   // 292.5°
    Grb::new(0, 204, 153),   // 315°
    Grb::new(0, 204, 76),    // 337.5°
];

/// Palette entry for the low four bits of `index`
pub const fn color(index: u8) -> Grb {
    PALETTE[(index & INDEX_MASK) as usize]
}

/// Index of a palette color
pub fn index_of(color: Grb) -> Option<u8> {
    PALETTE
        .iter()
        .position(|entry| *entry == color)
        .map(|index| index as u8)
}
