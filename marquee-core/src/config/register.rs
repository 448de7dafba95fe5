//! Configuration register layout
//!
//! ```text
//!   7       6        5   4    3     2        1   0
//! ┌───────┬────────┬───────┬─────┬────────┬───────┐
//! │ FIXED │  EXT   │DIMMER │  -  │  LOOP  │ CHARS │
//! │ COLOR │REFRESH │       │     │  BACK  │       │
//! └───────┴────────┴───────┴─────┴────────┴───────┘
//! ```
//! CHARS: `00` → 2, `01` → 4, `1x` → 8.

use super::types::{CharCount, Config, DimmerLevel};

/// Character count field
pub const CHARS_MASK: u8 = 0b0000_0011;

/// Loopback enable
pub const LOOPBACK_BIT: u8 = 1 << 2;

/// Dimmer field position
pub const DIMMER_SHIFT: u8 = 4;

/// Dimmer field
pub const DIMMER_MASK: u8 = 0b0011_0000;

/// External refresh enable
pub const EXT_REFRESH_BIT: u8 = 1 << 6;

/// Fixed color enable
pub const FIXED_COLOR_BIT: u8 = 1 << 7;

impl Config {
    /// Decode the configuration register
    ///
    /// Every register value is valid; bit 3 is ignored.
    pub const fn from_register(reg: u8) -> Self {
        let num_chars = match reg & CHARS_MASK {
            0b00 => CharCount::Two,
            0b01 => CharCount::Four,
            _ => CharCount::Eight,
        };

        Self {
            num_chars,
            uart_loopback: reg & LOOPBACK_BIT != 0,
            // Two bits never exceed the highest level
            dimmer: match DimmerLevel::new((reg & DIMMER_MASK) >> DIMMER_SHIFT) {
                Ok(level) => level,
                Err(_) => DimmerLevel::FULL,
            },
            ext_refresh: reg & EXT_REFRESH_BIT != 0,
            fixed_color: reg & FIXED_COLOR_BIT != 0,
        }
    }

    /// Encode as a configuration register value
    pub const fn to_register(&self) -> u8 {
        let chars = match self.num_chars {
            CharCount::Two => 0b00,
            CharCount::Four => 0b01,
            CharCount::Eight => 0b10,
        };

        let mut reg = chars | (self.dimmer.shift() << DIMMER_SHIFT);
        if self.uart_loopback {
            reg |= LOOPBACK_BIT;
        }
        if self.ext_refresh {
            reg |= EXT_REFRESH_BIT;
        }
        if self.fixed_color {
            reg |= FIXED_COLOR_BIT;
        }
        reg
    }
}
