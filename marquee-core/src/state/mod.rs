//! Refresh phase machine
//!
//! Every frame goes through the same three phases. The machine is explicit,
//! finite and deterministic; timing lives in the scheduler.

pub mod events;
pub mod machine;

pub use events::RefreshEvent;
pub use machine::RefreshPhase;
