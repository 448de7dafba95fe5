//! Error types for the verification bench.

use marquee_core::{ConfigError, DecodeError, TimingError};
use marquee_protocol::PulseError;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while driving the controller or checking its outputs.
#[derive(Error, Debug)]
pub enum Error {
    /// LED pulse outside its timing window.
    #[error("LED pulse violation at tick {tick}: {error:?}")]
    Pulse { tick: u64, error: PulseError },

    /// LED bit stream does not form valid cells.
    #[error("LED frame decode error at tick {tick}: {error:?}")]
    Decode { tick: u64, error: DecodeError },

    /// No frame arrived in time.
    #[error("no LED frame within {us} us")]
    Timeout { us: u64 },

    /// LED line active while it should be quiet.
    #[error("unexpected LED activity at tick {tick}")]
    UnexpectedFrame { tick: u64 },

    /// Rendered text differs from the expected text.
    #[error("frame mismatch: expected {expected:?}, got {actual:?}")]
    TextMismatch { expected: String, actual: String },

    /// Rendered colors differ from the expected palette indices.
    #[error("color mismatch: expected {expected:?}, got {actual:?}")]
    ColorMismatch {
        expected: Vec<u8>,
        actual: Vec<Option<u8>>,
    },

    /// Loopback output differs from the bytes sent.
    #[error("echo mismatch: expected {expected:02X?}, got {actual:02X?}")]
    EchoMismatch { expected: Vec<u8>, actual: Vec<u8> },

    /// Invalid device configuration.
    #[error("invalid configuration: {0}")]
    Config(ConfigError),

    /// Clock rate or durations unusable.
    #[error("invalid timing: {0}")]
    Timing(TimingError),

    /// Scenario file could not be parsed.
    #[error("scenario parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Scenario file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ConfigError> for Error {
    fn from(error: ConfigError) -> Self {
        Error::Config(error)
    }
}

impl From<TimingError> for Error {
    fn from(error: TimingError) -> Self {
        Error::Timing(error)
    }
}
