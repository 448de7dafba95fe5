//! Palette generator
//!
//! Rebuilds the controller's 16-color table from its definition: hue in
//! steps of 22.5°, saturation 1.0, value 0.8, every channel scaled to 255
//! and truncated.

use marquee_core::palette::PALETTE_SIZE;
use marquee_core::Grb;

/// Saturation of every entry
pub const SATURATION: f64 = 1.0;

/// Value (brightness) of every entry
pub const VALUE: f64 = 0.8;

/// HSV to RGB, all components in 0.0..=1.0
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> (f64, f64, f64) {
    if s == 0.0 {
        return (v, v, v);
    }
    let sector = (h * 6.0) as i64;
    let f = h * 6.0 - sector as f64;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    match sector.rem_euclid(6) {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    }
}

/// Palette entry `index` computed from its hue
pub fn entry(index: usize) -> Grb {
    let hue_deg = index as f64 * (360.0 / PALETTE_SIZE as f64);
    let (r, g, b) = hsv_to_rgb(hue_deg / 360.0, SATURATION, VALUE);
    Grb::new(channel(g), channel(r), channel(b))
}

/// The whole palette
pub fn generate() -> [Grb; PALETTE_SIZE] {
    std::array::from_fn(entry)
}

/// Wire representation, green then red then blue, MSB first
pub fn binary_string(color: Grb) -> String {
    format!("{:024b}", color.to_bits())
}

fn channel(level: f64) -> u8 {
    (level * 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_core::palette::PALETTE;

    #[test]
    fn test_generated_matches_table() {
        assert_eq!(generate(), PALETTE);
    }

    #[test]
    fn test_binary_string() {
        assert_eq!(binary_string(PALETTE[0]), "000000001100110000000000");
        assert_eq!(binary_string(PALETTE[8]), "110011000000000011001100");
    }

    #[test]
    fn test_primary_hues() {
        let (r, g, b) = hsv_to_rgb(0.0, 1.0, 1.0);
        assert_eq!((r, g, b), (1.0, 0.0, 0.0));
        let (r, g, b) = hsv_to_rgb(2.0 / 3.0, 1.0, 1.0);
        assert_eq!((r, g, b), (0.0, 0.0, 1.0));
    }
}
