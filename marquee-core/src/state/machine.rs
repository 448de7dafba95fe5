//! Refresh phase definition

use super::events::RefreshEvent;

/// Phase of the LED line
///
/// ```text
///            Trigger              FrameComplete
///   Idle ─────────────► Rendering ─────────────► ResetGap
///    ▲                                              │
///    └──────────────────── GapElapsed ──────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RefreshPhase {
    /// Line low, waiting for a trigger
    #[default]
    Idle,
    /// Encoder streaming a snapshot
    Rendering,
    /// Line held low so the LEDs latch the frame
    ResetGap,
}

impl RefreshPhase {
    /// Check if a new frame may start
    pub fn accepts_trigger(&self) -> bool {
        matches!(self, RefreshPhase::Idle)
    }

    /// Check if a frame is on the line, gap included
    pub fn is_busy(&self) -> bool {
        !self.accepts_trigger()
    }

    /// Process an event and return the next phase
    ///
    /// Events that do not apply leave the phase unchanged; a trigger outside
    /// `Idle` never interrupts the frame in flight.
    pub fn transition(self, event: RefreshEvent) -> Self {
        use RefreshEvent::*;
        use RefreshPhase::*;

        match (self, event) {
            (Idle, Trigger) => Rendering,
            (Rendering, FrameComplete) => ResetGap,
            (ResetGap, GapElapsed) => Idle,
            _ => self,
        }
    }
}
