//! Refresh scheduler
//!
//! Keeps the pending-frame latch and the two countdowns that gate it: the
//! receiver quiet time (internal policy) and the reset gap after each frame.

use super::policy::RefreshPolicy;
use crate::config::Timing;
use crate::state::{RefreshEvent, RefreshPhase};

/// Frame trigger and phase tracking
#[derive(Debug, Clone)]
pub struct RefreshScheduler {
    policy: RefreshPolicy,
    phase: RefreshPhase,
    /// A frame is owed; survives until the scheduler is back in `Idle`
    pending: bool,
    /// Ticks since the last buffer change or receiver activity
    quiet_ticks: u32,
    idle_refresh_ticks: u32,
    reset_gap_ticks: u32,
    gap_remaining: u32,
    frames: u32,
}

impl RefreshScheduler {
    /// Create a scheduler at reset
    ///
    /// Under the internal policy the blank buffer is owed a first frame.
    pub fn new(policy: RefreshPolicy, timing: &Timing) -> Self {
        Self {
            policy,
            phase: RefreshPhase::Idle,
            pending: policy.follows_buffer(),
            quiet_ticks: 0,
            idle_refresh_ticks: timing.idle_refresh_ticks,
            reset_gap_ticks: timing.reset_gap_ticks,
            gap_remaining: 0,
            frames: 0,
        }
    }

    /// The buffer was written
    pub fn buffer_changed(&mut self) {
        if self.policy.follows_buffer() {
            self.pending = true;
            self.quiet_ticks = 0;
        }
    }

    /// Explicit refresh trigger, latched until it can be served
    pub fn request(&mut self) {
        self.pending = true;
    }

    /// Advance one tick
    ///
    /// Returns `true` on the tick a frame starts; the caller must hand a
    /// snapshot to the encoder on that tick.
    pub fn step(&mut self, rx_busy: bool) -> bool {
        if self.phase == RefreshPhase::ResetGap {
            if self.gap_remaining == 0 {
                self.phase = self.phase.transition(RefreshEvent::GapElapsed);
            } else {
                self.gap_remaining -= 1;
            }
        }

        if rx_busy {
            self.quiet_ticks = 0;
        } else {
            self.quiet_ticks = self.quiet_ticks.saturating_add(1);
        }

        if !self.ready() {
            return false;
        }

        self.pending = false;
        self.frames = self.frames.wrapping_add(1);
        self.phase = self.phase.transition(RefreshEvent::Trigger);
        true
    }

    /// The encoder sent the last bit; start the reset gap
    pub fn frame_complete(&mut self) {
        if self.phase == RefreshPhase::Rendering {
            self.phase = self.phase.transition(RefreshEvent::FrameComplete);
            self.gap_remaining = self.reset_gap_ticks;
        }
    }

    fn ready(&self) -> bool {
        if !self.pending || !self.phase.accepts_trigger() {
            return false;
        }
        match self.policy {
            RefreshPolicy::Internal => self.quiet_ticks >= self.idle_refresh_ticks,
            RefreshPolicy::External => true,
        }
    }

    pub fn phase(&self) -> RefreshPhase {
        self.phase
    }

    pub fn policy(&self) -> RefreshPolicy {
        self.policy
    }

    /// Check if a frame is owed
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Frames started since reset
    pub fn frames(&self) -> u32 {
        self.frames
    }
}
