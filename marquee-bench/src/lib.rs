//! Verification bench for the Marquee controller
//!
//! Drives the clocked controller model from its UART line and checks what
//! comes out of the LED and loopback lines:
//!
//! - [`harness`]: UART driver, LED and UART monitors, [`Bench`]
//! - [`scenario`]: TOML scenario files and their runner
//! - [`demo`]: the counter demo stream
//! - [`palette`]: palette generator, checked against the stored table
//! - [`render`]: ASCII art of decoded frames

pub mod demo;
pub mod error;
pub mod harness;
pub mod palette;
pub mod render;
pub mod scenario;

pub use error::{Error, Result};
pub use harness::{Bench, CapturedFrame, LedMonitor, UartDriver, UartMonitor};
pub use scenario::{Report, Scenario, Step};
