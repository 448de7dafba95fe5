//! Configuration type definitions

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum character slots
pub const MAX_CHARS: usize = 8;

/// Highest dimmer level
pub const MAX_DIMMER_LEVEL: u8 = 3;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Character count is not 2, 4 or 8
    InvalidCharCount(u8),
    /// Dimmer level above 3
    InvalidDimmerLevel(u8),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::InvalidCharCount(count) => {
                write!(f, "invalid character count {} (must be 2, 4 or 8)", count)
            }
            ConfigError::InvalidDimmerLevel(level) => {
                write!(f, "invalid dimmer level {} (must be 0-3)", level)
            }
        }
    }
}

/// Number of character slots in the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub enum CharCount {
    #[default]
    Two,
    Four,
    Eight,
}

impl CharCount {
    /// Number of slots
    pub const fn get(self) -> usize {
        match self {
            CharCount::Two => 2,
            CharCount::Four => 4,
            CharCount::Eight => 8,
        }
    }
}

impl TryFrom<u8> for CharCount {
    type Error = ConfigError;

    fn try_from(count: u8) -> Result<Self, ConfigError> {
        match count {
            2 => Ok(CharCount::Two),
            4 => Ok(CharCount::Four),
            8 => Ok(CharCount::Eight),
            _ => Err(ConfigError::InvalidCharCount(count)),
        }
    }
}

impl From<CharCount> for u8 {
    fn from(count: CharCount) -> u8 {
        count.get() as u8
    }
}

/// Output brightness reduction
///
/// Every color channel is shifted right by the level when pixels are sent;
/// level 0 is full brightness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub struct DimmerLevel(u8);

impl DimmerLevel {
    /// Full brightness
    pub const FULL: DimmerLevel = DimmerLevel(0);

    /// Create a dimmer level, 0..=3
    pub const fn new(level: u8) -> Result<Self, ConfigError> {
        if level > MAX_DIMMER_LEVEL {
            return Err(ConfigError::InvalidDimmerLevel(level));
        }
        Ok(Self(level))
    }

    /// Channel shift applied at output
    pub const fn shift(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for DimmerLevel {
    type Error = ConfigError;

    fn try_from(level: u8) -> Result<Self, ConfigError> {
        Self::new(level)
    }
}

impl From<DimmerLevel> for u8 {
    fn from(level: DimmerLevel) -> u8 {
        level.0
    }
}

/// Controller configuration
///
/// Sampled once at reset, immutable for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Config {
    /// Character slots in the scrolling buffer
    pub num_chars: CharCount,
    /// Echo every received byte on TX
    pub uart_loopback: bool,
    /// Output brightness reduction
    pub dimmer: DimmerLevel,
    /// Render only when a CR byte is received
    pub ext_refresh: bool,
    /// Color characters from the color register instead of drawing colors
    pub fixed_color: bool,
}
