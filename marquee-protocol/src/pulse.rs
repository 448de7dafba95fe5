//! Single-wire LED pulse timing
//!
//! Timing contract of the chained LED line and an observer that turns a
//! sampled line back into bits. The observer is what a logic analyser or a
//! test bench attached to the output would do; the controller itself only
//! ever produces pulses.

/// Nominal bit period
pub const BIT_PERIOD_NS: u32 = 1250;

/// Nominal high time of a `0` bit
pub const T0H_NS: u32 = 400;

/// Nominal high time of a `1` bit
pub const T1H_NS: u32 = 800;

/// Pulses must be strictly longer than this
pub const MIN_PULSE_NS: u32 = 300;

/// Pulses strictly longer than this are `1` bits
pub const ONE_THRESHOLD_NS: u32 = 625;

/// Pulses must be strictly shorter than this
pub const MAX_PULSE_NS: u32 = 900;

/// Minimum low time that latches a frame
pub const RESET_NS: u32 = 50_000;

/// Pulse timing violations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PulseError {
    /// High pulse of at most 300 ns
    TooShort { ns: u32 },
    /// High pulse of at least 900 ns
    TooLong { ns: u32 },
}

/// Something the line said
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PulseEvent {
    /// A complete high pulse, decoded
    Bit(bool),
    /// The line stayed low for the reset time after activity
    Reset,
}

/// Classify a high pulse by its width
pub fn classify_pulse(ns: u32) -> Result<bool, PulseError> {
    if ns <= MIN_PULSE_NS {
        Err(PulseError::TooShort { ns })
    } else if ns >= MAX_PULSE_NS {
        Err(PulseError::TooLong { ns })
    } else {
        Ok(ns > ONE_THRESHOLD_NS)
    }
}

/// Observer for a sampled LED line
///
/// Feed one sample per clock tick. High pulses are measured from the first
/// high sample to the first low sample.
#[derive(Debug, Clone)]
pub struct PulseDecoder {
    /// Sample period in picoseconds
    tick_ps: u64,
    level: bool,
    high_ticks: u32,
    low_ticks: u32,
    /// Pulses were seen since the last reset
    active: bool,
}

impl PulseDecoder {
    /// Create an observer for a line sampled at `clock_hz`
    pub fn new(clock_hz: u32) -> Self {
        Self {
            tick_ps: 1_000_000_000_000 / u64::from(clock_hz.max(1)),
            level: false,
            high_ticks: 0,
            low_ticks: 0,
            active: false,
        }
    }

    /// Feed one sample
    ///
    /// Returns `Ok(Some(event))` when a pulse ends or a reset is seen,
    /// `Ok(None)` otherwise and `Err` on a pulse outside the valid window.
    pub fn step(&mut self, line: bool) -> Result<Option<PulseEvent>, PulseError> {
        match (self.level, line) {
            (false, true) => {
                self.level = true;
                self.high_ticks = 1;
                Ok(None)
            }
            (true, true) => {
                self.high_ticks = self.high_ticks.saturating_add(1);
                Ok(None)
            }
            (true, false) => {
                self.level = false;
                self.low_ticks = 1;
                self.active = true;
                let ns = self.ticks_to_ns(self.high_ticks);
                classify_pulse(ns).map(|bit| Some(PulseEvent::Bit(bit)))
            }
            (false, false) => {
                self.low_ticks = self.low_ticks.saturating_add(1);
                if self.active && self.ticks_to_ns(self.low_ticks) >= RESET_NS {
                    self.active = false;
                    return Ok(Some(PulseEvent::Reset));
                }
                Ok(None)
            }
        }
    }

    /// Check if the line is inside a frame (pulses seen, no reset yet)
    pub fn in_frame(&self) -> bool {
        self.active || self.level
    }

    /// Length of the current low stretch in nanoseconds
    pub fn low_ns(&self) -> u32 {
        if self.level {
            0
        } else {
            self.ticks_to_ns(self.low_ticks)
        }
    }

    fn ticks_to_ns(&self, ticks: u32) -> u32 {
        let ns = u64::from(ticks) * self.tick_ps / 1000;
        ns.min(u64::from(u32::MAX)) as u32
    }
}
