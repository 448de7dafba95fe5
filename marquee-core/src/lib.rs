//! Board-agnostic model of the Marquee character ticker
//!
//! The controller receives bytes on a 9600 baud UART line, keeps the last
//! few characters in a scrolling buffer and streams them as 5x7 pixel cells
//! over a chained RGB LED line:
//!
//! ```text
//!  RX ─► UartReceiver ─► CommandDispatcher ─┬─► ColorRegister
//!            │                              └─► CharacterBuffer
//!            │                                        │ snapshot
//!            │             RefreshScheduler ──────────┤
//!            │                                        ▼
//!            └─► UartTransmitter ─► TX       LedMatrixEncoder ─► LED
//!                (loopback only)
//! ```
//!
//! Everything advances once per clock tick through [`Controller::step`]:
//!
//! - Configuration register decoding and derived timing
//! - Font and palette tables
//! - Ring buffer with copy-on-read snapshots
//! - Refresh phase machine and trigger policies
//! - Frame encoder and its inverse

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod buffer;
pub mod cell;
pub mod config;
pub mod controller;
pub mod decoder;
pub mod dispatcher;
pub mod encoder;
pub mod font;
pub mod palette;
pub mod random;
pub mod scheduler;
pub mod state;
pub mod traits;

pub use buffer::{CharacterBuffer, Snapshot};
pub use cell::CharacterCell;
pub use config::{
    CharCount, Config, ConfigError, DimmerLevel, Timing, TimingConfig, TimingError, MAX_CHARS,
};
pub use controller::{Controller, Inputs, Outputs};
pub use decoder::{decode, DecodeError, DecodedCell, DecodedFrame, FrameDecoder};
pub use dispatcher::{ColorRegister, Command, CommandDispatcher, Dispatch};
pub use encoder::LedMatrixEncoder;
pub use font::Glyph;
pub use random::Lfsr16;
pub use scheduler::{RefreshPolicy, RefreshScheduler};
pub use state::{RefreshEvent, RefreshPhase};
pub use traits::ColorSource;

pub use marquee_protocol::Grb;
