//! Bit-level UART state machines
//!
//! Both machines are clocked: `step` is called once per tick and the bit
//! period is given in ticks (`clock_hz / BAUD_RATE`). Frames are 8N1,
//! LSB first, idle high.

use heapless::Deque;

/// Line rate of both UART directions
pub const BAUD_RATE: u32 = 9600;

/// Data bits per frame
pub const DATA_BITS: u8 = 8;

/// Bits on the wire per frame (start + data + stop)
pub const FRAME_BITS: u8 = DATA_BITS + 2;

/// Bytes the transmitter can hold while a frame is in flight
pub const TX_QUEUE_DEPTH: usize = 8;

/// Errors reported by the UART machines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartError {
    /// Transmit queue is full; the byte was not accepted
    QueueFull,
}

/// Receiver state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum RxState {
    /// Line high, waiting for a falling edge
    Idle,
    /// Falling edge seen, waiting for the start bit centre
    Start { countdown: u32 },
    /// Waiting for the centre of data bit `index`
    Data { index: u8, countdown: u32 },
    /// Waiting for the centre of the stop bit
    Stop { countdown: u32 },
}

/// UART receiver
///
/// Detects the start bit on a falling edge, confirms it half a bit later and
/// then samples every bit at its centre. A frame whose stop bit reads low is
/// dropped and counted as a framing error; the receiver then waits for the
/// line to return high before it looks for the next start bit.
#[derive(Debug, Clone)]
pub struct UartReceiver {
    bit_ticks: u32,
    state: RxState,
    shift: u8,
    last_level: bool,
    framing_errors: u32,
}

impl UartReceiver {
    /// Create a receiver with a bit period of `bit_ticks` clock ticks
    pub fn new(bit_ticks: u32) -> Self {
        Self {
            bit_ticks: bit_ticks.max(2),
            state: RxState::Idle,
            shift: 0,
            // A start bit is only valid after the line has been seen high
            last_level: false,
            framing_errors: 0,
        }
    }

    /// Reset to idle, keeping the error counter
    pub fn reset(&mut self) {
        self.state = RxState::Idle;
        self.shift = 0;
        self.last_level = false;
    }

    /// Sample the line for one tick
    ///
    /// Returns `Some(byte)` on the tick the stop bit of a valid frame is
    /// sampled.
    pub fn step(&mut self, line: bool) -> Option<u8> {
        let falling = self.last_level && !line;
        self.last_level = line;

        match self.state {
            RxState::Idle => {
                if falling {
                    self.state = RxState::Start {
                        countdown: self.bit_ticks / 2,
                    };
                }
                None
            }
            RxState::Start { countdown } => {
                let countdown = countdown.saturating_sub(1);
                if countdown > 0 {
                    self.state = RxState::Start { countdown };
                } else if line {
                    // Glitch shorter than half a bit
                    self.state = RxState::Idle;
                } else {
                    self.shift = 0;
                    self.state = RxState::Data {
                        index: 0,
                        countdown: self.bit_ticks,
                    };
                }
                None
            }
            RxState::Data { index, countdown } => {
                let countdown = countdown.saturating_sub(1);
                if countdown > 0 {
                    self.state = RxState::Data { index, countdown };
                    return None;
                }

                if line {
                    self.shift |= 1 << index;
                }
                self.state = if index + 1 == DATA_BITS {
                    RxState::Stop {
                        countdown: self.bit_ticks,
                    }
                } else {
                    RxState::Data {
                        index: index + 1,
                        countdown: self.bit_ticks,
                    }
                };
                None
            }
            RxState::Stop { countdown } => {
                let countdown = countdown.saturating_sub(1);
                if countdown > 0 {
                    self.state = RxState::Stop { countdown };
                    return None;
                }

                self.state = RxState::Idle;
                if line {
                    Some(self.shift)
                } else {
                    self.framing_errors = self.framing_errors.saturating_add(1);
                    None
                }
            }
        }
    }

    /// Check if a frame is being received
    pub fn is_busy(&self) -> bool {
        self.state != RxState::Idle
    }

    /// Number of frames dropped because the stop bit was low
    pub fn framing_errors(&self) -> u32 {
        self.framing_errors
    }

    /// Bit period in ticks
    pub fn bit_ticks(&self) -> u32 {
        self.bit_ticks
    }
}

/// Transmitter state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TxState {
    Idle,
    /// Shifting out `frame`, `bit` is the index of the bit on the line
    Sending { frame: u16, bit: u8, countdown: u32 },
}

/// UART transmitter
///
/// Serializes queued bytes as start bit, 8 data bits LSB first and a stop
/// bit, one bit every `bit_ticks` ticks. The line idles high.
#[derive(Debug, Clone)]
pub struct UartTransmitter {
    bit_ticks: u32,
    queue: Deque<u8, TX_QUEUE_DEPTH>,
    state: TxState,
}

impl UartTransmitter {
    /// Create a transmitter with a bit period of `bit_ticks` clock ticks
    pub fn new(bit_ticks: u32) -> Self {
        Self {
            bit_ticks: bit_ticks.max(1),
            queue: Deque::new(),
            state: TxState::Idle,
        }
    }

    /// Queue a byte for transmission
    pub fn write(&mut self, byte: u8) -> Result<(), UartError> {
        self.queue.push_back(byte).map_err(|_| UartError::QueueFull)
    }

    /// Drive the line for one tick
    ///
    /// Returns the line level for this tick.
    pub fn step(&mut self) -> bool {
        if self.state == TxState::Idle {
            if let Some(byte) = self.queue.pop_front() {
                self.state = TxState::Sending {
                    frame: Self::frame(byte),
                    bit: 0,
                    countdown: self.bit_ticks,
                };
            }
        }

        match self.state {
            TxState::Idle => true,
            TxState::Sending {
                frame,
                bit,
                countdown,
            } => {
                let level = (frame >> bit) & 1 != 0;
                let countdown = countdown - 1;

                self.state = if countdown > 0 {
                    TxState::Sending {
                        frame,
                        bit,
                        countdown,
                    }
                } else if bit + 1 == FRAME_BITS {
                    TxState::Idle
                } else {
                    TxState::Sending {
                        frame,
                        bit: bit + 1,
                        countdown: self.bit_ticks,
                    }
                };
                level
            }
        }
    }

    /// Check if nothing is queued or in flight
    pub fn is_idle(&self) -> bool {
        self.state == TxState::Idle && self.queue.is_empty()
    }

    /// Bytes waiting behind the frame in flight
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Line bits of one frame, first bit in the LSB
    fn frame(byte: u8) -> u16 {
        // start (0), data, stop (1)
        (1 << (FRAME_BITS - 1)) | ((byte as u16) << 1)
    }
}
