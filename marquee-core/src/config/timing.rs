//! Clock-derived durations
//!
//! All state machines count ticks of one clock. [`Timing`] converts the
//! nominal durations of both lines into tick counts once, at construction,
//! and checks that the rounded LED pulse widths still land in their windows.

use marquee_protocol::pulse::{
    BIT_PERIOD_NS, MAX_PULSE_NS, MIN_PULSE_NS, ONE_THRESHOLD_NS, RESET_NS, T0H_NS, T1H_NS,
};
use marquee_protocol::BAUD_RATE;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default system clock (50 ns per tick)
pub const DEFAULT_CLOCK_HZ: u32 = 20_000_000;

/// Default receiver idle time before an automatic refresh
pub const DEFAULT_IDLE_REFRESH_NS: u32 = 1_000_000;

/// Default low time after each frame
pub const DEFAULT_RESET_GAP_NS: u32 = 60_000;

/// Shortest usable UART bit period in ticks
pub const MIN_UART_BIT_TICKS: u32 = 4;

const NS_PER_S: u64 = 1_000_000_000;

/// Timing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimingError {
    /// Clock too slow for the UART bit period
    ClockTooSlow { clock_hz: u32 },
    /// A rounded LED pulse falls outside its window
    PulseOutOfWindow { ns: u32 },
    /// Reset gap shorter than the latch time
    ResetGapTooShort { ns: u32 },
}

impl core::fmt::Display for TimingError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TimingError::ClockTooSlow { clock_hz } => {
                write!(f, "clock of {} Hz is too slow for 9600 baud", clock_hz)
            }
            TimingError::PulseOutOfWindow { ns } => {
                write!(f, "LED pulse of {} ns falls outside its window", ns)
            }
            TimingError::ResetGapTooShort { ns } => {
                write!(f, "reset gap of {} ns is shorter than 50 us", ns)
            }
        }
    }
}

/// Timing parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimingConfig {
    /// System clock frequency
    pub clock_hz: u32,
    /// Receiver idle time before an automatic refresh (ns)
    pub idle_refresh_ns: u32,
    /// Low time after each frame (ns)
    pub reset_gap_ns: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            clock_hz: DEFAULT_CLOCK_HZ,
            idle_refresh_ns: DEFAULT_IDLE_REFRESH_NS,
            reset_gap_ns: DEFAULT_RESET_GAP_NS,
        }
    }
}

/// Durations in clock ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timing {
    /// System clock frequency
    pub clock_hz: u32,
    /// UART bit period
    pub uart_bit_ticks: u32,
    /// Receiver idle time before an automatic refresh
    pub idle_refresh_ticks: u32,
    /// LED bit period
    pub led_bit_ticks: u32,
    /// High time of a `0` bit
    pub t0h_ticks: u32,
    /// High time of a `1` bit
    pub t1h_ticks: u32,
    /// Low time after each frame
    pub reset_gap_ticks: u32,
}

impl Default for Timing {
    fn default() -> Self {
        Self::derive(&TimingConfig::default())
    }
}

impl Timing {
    /// Derive tick counts and validate them
    pub fn new(config: &TimingConfig) -> Result<Self, TimingError> {
        if config.clock_hz / BAUD_RATE < MIN_UART_BIT_TICKS {
            return Err(TimingError::ClockTooSlow {
                clock_hz: config.clock_hz,
            });
        }

        let timing = Self::derive(config);

        let t0h = timing.ticks_to_ns(timing.t0h_ticks);
        if t0h <= MIN_PULSE_NS || t0h > ONE_THRESHOLD_NS {
            return Err(TimingError::PulseOutOfWindow { ns: t0h });
        }
        let t1h = timing.ticks_to_ns(timing.t1h_ticks);
        if t1h <= ONE_THRESHOLD_NS || t1h >= MAX_PULSE_NS {
            return Err(TimingError::PulseOutOfWindow { ns: t1h });
        }
        // A `1` must still return low before the next bit
        if timing.led_bit_ticks <= timing.t1h_ticks {
            return Err(TimingError::PulseOutOfWindow { ns: t1h });
        }

        let gap = timing.ticks_to_ns(timing.reset_gap_ticks);
        if gap < RESET_NS {
            return Err(TimingError::ResetGapTooShort { ns: gap });
        }

        Ok(timing)
    }

    fn derive(config: &TimingConfig) -> Self {
        let clock_hz = config.clock_hz.max(1);
        Self {
            clock_hz,
            uart_bit_ticks: clock_hz / BAUD_RATE,
            idle_refresh_ticks: ns_to_ticks(config.idle_refresh_ns, clock_hz).max(1),
            led_bit_ticks: ns_to_ticks(BIT_PERIOD_NS, clock_hz),
            t0h_ticks: ns_to_ticks(T0H_NS, clock_hz),
            t1h_ticks: ns_to_ticks(T1H_NS, clock_hz),
            reset_gap_ticks: ns_to_ticks(config.reset_gap_ns, clock_hz),
        }
    }

    /// Convert a tick count to nanoseconds, truncating
    pub fn ticks_to_ns(&self, ticks: u32) -> u32 {
        let ns = u64::from(ticks) * NS_PER_S / u64::from(self.clock_hz);
        ns.min(u64::from(u32::MAX)) as u32
    }

    /// Convert nanoseconds to the nearest tick count
    pub fn ns_to_ticks(&self, ns: u32) -> u32 {
        ns_to_ticks(ns, self.clock_hz)
    }

    /// Ticks on the LED line for one full frame of `cells` characters
    pub fn frame_ticks(&self, cells: usize) -> u64 {
        cells as u64 * crate::encoder::BITS_PER_CELL as u64 * u64::from(self.led_bit_ticks)
    }
}

fn ns_to_ticks(ns: u32, clock_hz: u32) -> u32 {
    let ticks = (u64::from(ns) * u64::from(clock_hz) + NS_PER_S / 2) / NS_PER_S;
    ticks.min(u64::from(u32::MAX)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timing_at_20mhz() {
        let timing = Timing::new(&TimingConfig::default()).unwrap();

        assert_eq!(timing, Timing::default());
        assert_eq!(timing.uart_bit_ticks, 2083);
        assert_eq!(timing.led_bit_ticks, 25);
        assert_eq!(timing.t0h_ticks, 8);
        assert_eq!(timing.t1h_ticks, 16);
        assert_eq!(timing.reset_gap_ticks, 1200);
        assert_eq!(timing.idle_refresh_ticks, 20_000);
        assert_eq!(timing.ticks_to_ns(timing.t0h_ticks), 400);
    }

    #[test]
    fn test_other_clock_rates() {
        let timing = Timing::new(&TimingConfig {
            clock_hz: 12_000_000,
            ..TimingConfig::default()
        })
        .unwrap();
        assert_eq!(timing.led_bit_ticks, 15);
        assert_eq!(timing.t0h_ticks, 5); // 416 ns
        assert_eq!(timing.t1h_ticks, 10); // 833 ns
    }

    #[test]
    fn test_slow_clock_rejected() {
        let result = Timing::new(&TimingConfig {
            clock_hz: 2_000_000,
            ..TimingConfig::default()
        });
        // 500 ns per tick cannot hit the `1` window
        assert_eq!(result, Err(TimingError::PulseOutOfWindow { ns: 1000 }));

        let result = Timing::new(&TimingConfig {
            clock_hz: 20_000,
            ..TimingConfig::default()
        });
        assert_eq!(result, Err(TimingError::ClockTooSlow { clock_hz: 20_000 }));
    }

    #[test]
    fn test_short_reset_gap_rejected() {
        let result = Timing::new(&TimingConfig {
            reset_gap_ns: 40_000,
            ..TimingConfig::default()
        });
        assert_eq!(result, Err(TimingError::ResetGapTooShort { ns: 40_000 }));
    }
}
