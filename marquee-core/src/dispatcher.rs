//! Byte classification and routing
//!
//! ```text
//!   byte & 0x80 != 0           → color command, index = byte & 0x0F
//!   byte == 0x0D, ext_refresh  → refresh trigger
//!   anything else              → character
//! ```

use marquee_protocol::Grb;

use crate::buffer::CharacterBuffer;
use crate::cell::CharacterCell;
use crate::config::Config;
use crate::font;
use crate::palette;
use crate::traits::ColorSource;

/// Marks a color command
pub const COLOR_COMMAND_BIT: u8 = 0x80;

/// Palette index field of a color command
pub const COLOR_INDEX_MASK: u8 = 0x0F;

/// Carriage return, the refresh trigger in external refresh mode
pub const REFRESH_BYTE: u8 = 0x0D;

/// Meaning of a received byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Load the color register with a palette entry
    SelectColor(u8),
    /// Render the buffer now
    Refresh,
    /// Append a character
    Character(u8),
}

impl Command {
    /// Classify a byte under the session configuration
    pub const fn classify(byte: u8, config: &Config) -> Self {
        if byte & COLOR_COMMAND_BIT != 0 {
            Command::SelectColor(byte & COLOR_INDEX_MASK)
        } else if byte == REFRESH_BYTE && config.ext_refresh {
            Command::Refresh
        } else {
            Command::Character(byte)
        }
    }
}

/// Outcome of dispatching one byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dispatch {
    /// Color register loaded with this palette index
    ColorSelected(u8),
    /// Refresh trigger for the scheduler
    RefreshRequested,
    /// Cell appended to the buffer
    CellPushed(CharacterCell),
}

/// Color used for characters in fixed-color mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ColorRegister {
    index: u8,
}

impl Default for ColorRegister {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorRegister {
    /// Register at its reset value, palette entry 0
    pub const fn new() -> Self {
        Self { index: 0 }
    }

    /// Load a palette entry
    pub fn select(&mut self, index: u8) {
        self.index = index & COLOR_INDEX_MASK;
    }

    /// Current palette index
    pub const fn index(&self) -> u8 {
        self.index
    }

    /// Current color
    pub const fn color(&self) -> Grb {
        palette::color(self.index)
    }
}

/// Routes bytes to the color register or the character buffer
///
/// The dispatcher is the only writer of both.
#[derive(Debug, Clone)]
pub struct CommandDispatcher {
    config: Config,
    register: ColorRegister,
}

impl CommandDispatcher {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            register: ColorRegister::new(),
        }
    }

    /// Handle one received byte
    pub fn dispatch<S: ColorSource>(
        &mut self,
        byte: u8,
        buffer: &mut CharacterBuffer,
        colors: &mut S,
    ) -> Dispatch {
        match Command::classify(byte, &self.config) {
            Command::SelectColor(index) => {
                self.register.select(index);
                Dispatch::ColorSelected(index)
            }
            Command::Refresh => Dispatch::RefreshRequested,
            Command::Character(ch) => {
                let color = if self.config.fixed_color {
                    self.register.color()
                } else {
                    palette::color(colors.next_index())
                };
                let cell = CharacterCell::new(font::glyph(ch), color);
                buffer.push(cell);
                Dispatch::CellPushed(cell)
            }
        }
    }

    pub fn color_register(&self) -> &ColorRegister {
        &self.register
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
