//! Configuration types
//!
//! The controller configuration is sampled once at reset from an 8-bit
//! register and never changes afterwards. Clock-derived durations live in
//! [`Timing`].

pub mod register;
pub mod timing;
pub mod types;

pub use register::*;
pub use timing::*;
pub use types::*;
