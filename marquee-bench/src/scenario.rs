//! Scenario files
//!
//! A scenario is a TOML document with a `[device]` table and an ordered list
//! of `[[step]]` tables, each tagged by `action`:
//!
//! ```toml
//! name = "scroll"
//!
//! [device]
//! num_chars = 2
//!
//! [[step]]
//! action = "expect_frame"
//! text = "  "
//!
//! [[step]]
//! action = "send"
//! text = "Cir"
//!
//! [[step]]
//! action = "expect_frame"
//! text = "ir"
//! ```

use std::path::Path;
use std::str::FromStr;

use marquee_core::config::{DEFAULT_CLOCK_HZ, DEFAULT_IDLE_REFRESH_NS, DEFAULT_RESET_GAP_NS};
use marquee_core::{CharCount, Config, DimmerLevel, Timing, TimingConfig};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::harness::Bench;

/// Scenario file contents
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    /// Label used in logs
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub device: Device,

    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

/// Device configuration and clock
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Device {
    pub num_chars: CharCount,
    pub loopback: bool,
    pub dimmer: DimmerLevel,
    pub ext_refresh: bool,
    pub fixed_color: bool,
    pub clock_hz: u32,
    pub idle_refresh_us: u32,
    pub reset_gap_us: u32,
}

impl Default for Device {
    fn default() -> Self {
        Self {
            num_chars: CharCount::default(),
            loopback: false,
            dimmer: DimmerLevel::FULL,
            ext_refresh: false,
            fixed_color: false,
            clock_hz: DEFAULT_CLOCK_HZ,
            idle_refresh_us: DEFAULT_IDLE_REFRESH_NS / 1000,
            reset_gap_us: DEFAULT_RESET_GAP_NS / 1000,
        }
    }
}

impl Device {
    pub fn config(&self) -> Config {
        Config {
            num_chars: self.num_chars,
            uart_loopback: self.loopback,
            dimmer: self.dimmer,
            ext_refresh: self.ext_refresh,
            fixed_color: self.fixed_color,
        }
    }

    pub fn timing(&self) -> Result<Timing> {
        let timing = Timing::new(&TimingConfig {
            clock_hz: self.clock_hz,
            idle_refresh_ns: self.idle_refresh_us.saturating_mul(1000),
            reset_gap_ns: self.reset_gap_us.saturating_mul(1000),
        })?;
        Ok(timing)
    }
}

fn default_timeout_us() -> u64 {
    20_000
}

/// One scenario action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case", deny_unknown_fields)]
pub enum Step {
    /// Queue raw `bytes`, then `text`, on the RX line
    Send {
        #[serde(default)]
        bytes: Vec<u8>,
        #[serde(default)]
        text: String,
    },
    /// Let time pass
    Wait { us: u64 },
    /// Take the next LED frame and check it
    ExpectFrame {
        text: String,
        /// Palette index of every lit cell, left to right
        #[serde(default)]
        colors: Option<Vec<u8>>,
        #[serde(default = "default_timeout_us")]
        timeout_us: u64,
    },
    /// No LED activity for `us`
    ExpectQuiet { us: u64 },
    /// Loopback output since the last check
    ExpectEcho {
        #[serde(default)]
        bytes: Vec<u8>,
        #[serde(default)]
        text: String,
    },
}

/// Outcome of a passing scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Report {
    pub steps: usize,
    pub frames: usize,
    pub ticks: u64,
}

impl FromStr for Scenario {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }
}

impl Scenario {
    /// Read and parse a scenario file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        content.parse()
    }

    /// Run every step against a fresh controller
    pub fn run(&self) -> Result<Report> {
        let timing = self.device.timing()?;
        let config = self.device.config();
        info!(name = %self.name, ?config, "scenario start");

        let mut bench = Bench::new(config, &timing);
        let mut frames = 0;

        for (index, step) in self.steps.iter().enumerate() {
            info!(step = index, ?step, "step");
            match step {
                Step::Send { bytes, text } => {
                    bench.send(bytes);
                    bench.send(text.as_bytes());
                }
                Step::Wait { us } => bench.run_us(*us)?,
                Step::ExpectFrame {
                    text,
                    colors,
                    timeout_us,
                } => {
                    let frame = bench.next_frame(*timeout_us)?;
                    frames += 1;
                    if frame.text() != *text {
                        return Err(Error::TextMismatch {
                            expected: text.clone(),
                            actual: frame.text(),
                        });
                    }
                    if let Some(expected) = colors {
                        let actual = frame.lit_palette_indices();
                        let matches = actual.len() == expected.len()
                            && actual.iter().zip(expected).all(|(a, e)| *a == Some(*e));
                        if !matches {
                            return Err(Error::ColorMismatch {
                                expected: expected.clone(),
                                actual,
                            });
                        }
                    }
                }
                Step::ExpectQuiet { us } => bench.expect_quiet(*us)?,
                Step::ExpectEcho { bytes, text } => {
                    let mut expected = bytes.clone();
                    expected.extend_from_slice(text.as_bytes());
                    let actual = bench.echo(expected.len())?;
                    if actual != expected {
                        return Err(Error::EchoMismatch { expected, actual });
                    }
                }
            }
        }

        let report = Report {
            steps: self.steps.len(),
            frames,
            ticks: bench.ticks(),
        };
        info!(name = %self.name, ?report, "scenario passed");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
name = "sample"

[device]
num_chars = 4
fixed_color = true
dimmer = 1

[[step]]
action = "send"
bytes = [0x87]
text = "Da"

[[step]]
action = "wait"
us = 1500

[[step]]
action = "expect_frame"
text = "  Da"
colors = [7, 7]
"#;

    #[test]
    fn test_parse_sample() {
        let scenario: Scenario = SAMPLE.parse().unwrap();
        assert_eq!(scenario.name, "sample");
        assert_eq!(scenario.device.num_chars, CharCount::Four);
        assert!(scenario.device.fixed_color);
        assert_eq!(scenario.device.dimmer.shift(), 1);
        assert_eq!(scenario.device.clock_hz, DEFAULT_CLOCK_HZ);
        assert_eq!(
            scenario.steps[0],
            Step::Send {
                bytes: vec![0x87],
                text: "Da".into()
            }
        );
        assert_eq!(
            scenario.steps[2],
            Step::ExpectFrame {
                text: "  Da".into(),
                colors: Some(vec![7, 7]),
                timeout_us: 20_000,
            }
        );
    }

    #[test]
    fn test_invalid_values_rejected() {
        let bad_count = "[device]\nnum_chars = 3\n";
        assert!(matches!(
            bad_count.parse::<Scenario>(),
            Err(Error::Parse(_))
        ));

        let bad_action = "[[step]]\naction = \"jump\"\n";
        assert!(bad_action.parse::<Scenario>().is_err());
    }

    #[test]
    fn test_slow_clock_rejected() {
        let scenario: Scenario = "[device]\nclock_hz = 1000\n".parse().unwrap();
        assert!(matches!(scenario.run(), Err(Error::Timing(_))));
    }

    #[test]
    fn test_mismatch_reported() {
        let scenario: Scenario = r#"
[[step]]
action = "expect_frame"
text = "no"
"#
        .parse()
        .unwrap();
        match scenario.run() {
            Err(Error::TextMismatch { expected, actual }) => {
                assert_eq!(expected, "no");
                assert_eq!(actual, "  ");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
