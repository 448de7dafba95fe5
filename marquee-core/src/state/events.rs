//! Events that move the refresh phase

/// Refresh phase events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RefreshEvent {
    /// A frame is due and a snapshot has been handed to the encoder
    Trigger,
    /// The encoder sent the last bit of the frame
    FrameComplete,
    /// The line has been low for the full reset gap
    GapElapsed,
}
