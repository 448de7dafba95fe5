//! Frame scheduling
//!
//! Decides when the buffer is rendered and walks the refresh phase machine
//! through each frame.

pub mod policy;
pub mod refresh;

pub use policy::RefreshPolicy;
pub use refresh::RefreshScheduler;
