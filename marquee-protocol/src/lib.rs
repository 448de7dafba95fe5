//! Marquee line protocols
//!
//! This crate defines the two serial lines of the Marquee controller at the
//! bit level. Both are sampled or driven once per clock tick, so the state
//! machines here never block and never look at wall-clock time.
//!
//! # UART (input and loopback)
//!
//! 9600 baud, 8 data bits, no parity, 1 stop bit, idle high:
//! ```text
//!  idle ─┐     ┌───┬───┬─ ─ ─┬───┬─────── idle
//!        │START│ D0│ D1│     │ D7│ STOP
//!        └─────┴───┴───┴─ ─ ─┴───┘
//! ```
//!
//! # Chained LED line (output)
//!
//! Every bit occupies one 1250 ns period that starts with a high pulse:
//! ```text
//!  "0"  ┌────┐                 "1"  ┌────────┐
//!       │400 │       850 ns         │ 800 ns │     450 ns
//!  ─────┘    └──────────────   ─────┘        └──────────
//! ```
//! A pulse of (300, 625] ns is a `0`, (625, 900) ns is a `1`. A low line for
//! at least 50 µs latches the frame.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod color;
pub mod pulse;
pub mod uart;

pub use color::Grb;
pub use pulse::{classify_pulse, PulseDecoder, PulseError, PulseEvent, RESET_NS};
pub use uart::{UartError, UartReceiver, UartTransmitter, BAUD_RATE};
