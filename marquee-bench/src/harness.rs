//! Verification harness
//!
//! Wraps a [`Controller`] with a UART driver on its RX line and monitors on
//! its LED and TX lines. Everything runs in lockstep, one clock tick per
//! [`Bench::tick`].

use std::collections::VecDeque;

use marquee_core::decoder::FrameDecoder;
use marquee_core::{
    font, palette, ColorSource, Config, Controller, DecodedCell, Grb, Inputs, Lfsr16, Timing,
};
use marquee_protocol::uart::TX_QUEUE_DEPTH;
use marquee_protocol::{PulseDecoder, PulseEvent, UartReceiver, UartTransmitter};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::render::render_frame;

/// Extra bit periods allowed for the loopback path
const ECHO_SLACK_BITS: u64 = 12;

/// A frame captured from the LED line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedFrame {
    pub cells: Vec<DecodedCell>,
    /// Tick of the reset that closed the frame
    pub tick: u64,
}

impl CapturedFrame {
    /// Characters shown, `?` for a bitmap not in the font
    pub fn text(&self) -> String {
        self.cells
            .iter()
            .map(|cell| font::character(cell.glyph).map_or('?', char::from))
            .collect()
    }

    /// Palette index of every cell, `None` for blank or off-palette cells
    pub fn palette_indices(&self) -> Vec<Option<u8>> {
        self.cells
            .iter()
            .map(|cell| cell.color.and_then(palette::index_of))
            .collect()
    }

    /// Palette index of every cell with a lit pixel
    pub fn lit_palette_indices(&self) -> Vec<Option<u8>> {
        self.cells
            .iter()
            .filter_map(|cell| cell.color)
            .map(palette::index_of)
            .collect()
    }

    /// Color of every cell as seen on the line
    pub fn colors(&self) -> Vec<Option<Grb>> {
        self.cells.iter().map(|cell| cell.color).collect()
    }

    /// Check if no cell has a lit pixel
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|cell| cell.glyph.is_blank())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// ASCII art of the frame
    pub fn render(&self) -> String {
        render_frame(&self.cells)
    }
}

/// Serializes bytes onto the controller's RX line
#[derive(Debug)]
pub struct UartDriver {
    uart: UartTransmitter,
    pending: VecDeque<u8>,
    /// High ticks still to send before the first start bit
    lead_in: u32,
}

impl UartDriver {
    pub fn new(bit_ticks: u32) -> Self {
        Self {
            uart: UartTransmitter::new(bit_ticks),
            pending: VecDeque::new(),
            // The receiver needs to see the line high first
            lead_in: bit_ticks,
        }
    }

    /// Queue bytes behind anything already pending
    pub fn send(&mut self, bytes: &[u8]) {
        self.pending.extend(bytes);
    }

    /// Line level for the next tick
    pub fn step(&mut self) -> bool {
        if self.lead_in > 0 {
            self.lead_in -= 1;
            return true;
        }
        while self.uart.queued() < TX_QUEUE_DEPTH {
            let Some(byte) = self.pending.pop_front() else {
                break;
            };
            if self.uart.write(byte).is_err() {
                self.pending.push_front(byte);
                break;
            }
        }
        self.uart.step()
    }

    /// Check if every byte has left the line
    pub fn is_idle(&self) -> bool {
        self.pending.is_empty() && self.uart.is_idle()
    }
}

/// Decodes the LED line into frames
#[derive(Debug)]
pub struct LedMonitor {
    pulses: PulseDecoder,
    decoder: FrameDecoder,
    cells: Vec<DecodedCell>,
    frames: VecDeque<CapturedFrame>,
    /// Current run of low samples
    low_ticks: u64,
    tick_ns: f64,
    /// Low time before each frame, in nanoseconds
    gaps_ns: Vec<u64>,
    last_level: bool,
}

impl LedMonitor {
    pub fn new(clock_hz: u32) -> Self {
        Self {
            pulses: PulseDecoder::new(clock_hz),
            decoder: FrameDecoder::new(),
            cells: Vec::new(),
            frames: VecDeque::new(),
            low_ticks: 0,
            tick_ns: 1e9 / f64::from(clock_hz.max(1)),
            gaps_ns: Vec::new(),
            last_level: false,
        }
    }

    /// Sample the line at `tick`
    pub fn step(&mut self, tick: u64, level: bool) -> Result<()> {
        if level && !self.last_level && !self.pulses.in_frame() {
            // First pulse of a frame; the low run before it is the gap
            self.gaps_ns
                .push((self.low_ticks as f64 * self.tick_ns).round() as u64);
        }
        self.last_level = level;
        self.low_ticks = if level { 0 } else { self.low_ticks + 1 };

        let event = self.pulses.step(level).map_err(|error| {
            warn!(tick, ?error, "LED pulse out of window");
            Error::Pulse { tick, error }
        })?;

        match event {
            Some(PulseEvent::Bit(bit)) => {
                let cell = self.decoder.push_bit(bit).map_err(|error| {
                    warn!(tick, ?error, "undecodable LED frame");
                    Error::Decode { tick, error }
                })?;
                if let Some(cell) = cell {
                    debug!(tick, ?cell, "cell decoded");
                    self.cells.push(cell);
                }
            }
            Some(PulseEvent::Reset) => {
                let result = self.decoder.finish();
                let frame = CapturedFrame {
                    cells: std::mem::take(&mut self.cells),
                    tick,
                };
                result.map_err(|error| Error::Decode { tick, error })?;
                info!(tick, text = %frame.text(), "LED frame");
                debug!("\n{}", frame.render());
                self.frames.push_back(frame);
            }
            None => {}
        }
        Ok(())
    }

    /// Oldest captured frame not yet taken
    pub fn take_frame(&mut self) -> Option<CapturedFrame> {
        self.frames.pop_front()
    }

    /// Check if a frame is on the line
    pub fn is_active(&self) -> bool {
        self.pulses.in_frame()
    }

    /// Low time before every frame seen so far, the first one included
    pub fn gaps_ns(&self) -> &[u64] {
        &self.gaps_ns
    }
}

/// Collects bytes from the controller's TX line
#[derive(Debug)]
pub struct UartMonitor {
    uart: UartReceiver,
    bytes: Vec<u8>,
}

impl UartMonitor {
    pub fn new(bit_ticks: u32) -> Self {
        Self {
            uart: UartReceiver::new(bit_ticks),
            bytes: Vec::new(),
        }
    }

    pub fn step(&mut self, level: bool) {
        if let Some(byte) = self.uart.step(level) {
            debug!(byte = format_args!("{:#04x}", byte), "echo");
            self.bytes.push(byte);
        }
    }

    /// Take every byte received so far
    pub fn take(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.bytes)
    }

    pub fn received(&self) -> usize {
        self.bytes.len()
    }

    pub fn framing_errors(&self) -> u32 {
        self.uart.framing_errors()
    }
}

/// Controller under test with its driver and monitors
#[derive(Debug)]
pub struct Bench<S: ColorSource = Lfsr16> {
    controller: Controller<S>,
    driver: UartDriver,
    led: LedMonitor,
    echo: UartMonitor,
    tick: u64,
}

impl Bench<Lfsr16> {
    /// Bench around a controller at reset
    pub fn new(config: Config, timing: &Timing) -> Self {
        Self::with_controller(Controller::new(config, timing))
    }
}

impl<S: ColorSource> Bench<S> {
    pub fn with_controller(controller: Controller<S>) -> Self {
        let timing = *controller.timing();
        Self {
            controller,
            driver: UartDriver::new(timing.uart_bit_ticks),
            led: LedMonitor::new(timing.clock_hz),
            echo: UartMonitor::new(timing.uart_bit_ticks),
            tick: 0,
        }
    }

    /// Queue bytes on the RX line
    pub fn send(&mut self, bytes: &[u8]) {
        debug!(count = bytes.len(), "queue bytes");
        self.driver.send(bytes);
    }

    /// Advance one clock tick
    pub fn tick(&mut self) -> Result<()> {
        let rx = self.driver.step();
        let outputs = self.controller.step(Inputs { rx });
        if let Some(dispatch) = outputs.dispatch {
            debug!(tick = self.tick, ?dispatch, "byte dispatched");
        }
        self.led.step(self.tick, outputs.led)?;
        self.echo.step(outputs.tx);
        self.tick += 1;
        Ok(())
    }

    pub fn run_ticks(&mut self, ticks: u64) -> Result<()> {
        for _ in 0..ticks {
            self.tick()?;
        }
        Ok(())
    }

    pub fn run_us(&mut self, us: u64) -> Result<()> {
        self.run_ticks(self.us_to_ticks(us))
    }

    /// Next captured frame, waiting up to `timeout_us`
    pub fn next_frame(&mut self, timeout_us: u64) -> Result<CapturedFrame> {
        let deadline = self.tick + self.us_to_ticks(timeout_us);
        loop {
            if let Some(frame) = self.led.take_frame() {
                return Ok(frame);
            }
            if self.tick >= deadline {
                return Err(Error::Timeout { us: timeout_us });
            }
            self.tick()?;
        }
    }

    /// Run for `us` and fail on any LED activity
    pub fn expect_quiet(&mut self, us: u64) -> Result<()> {
        if self.led.take_frame().is_some() {
            return Err(Error::UnexpectedFrame { tick: self.tick });
        }
        for _ in 0..self.us_to_ticks(us) {
            self.tick()?;
            if self.led.is_active() {
                return Err(Error::UnexpectedFrame { tick: self.tick });
            }
        }
        Ok(())
    }

    /// Wait for `count` loopback bytes and take everything echoed so far
    pub fn echo(&mut self, count: usize) -> Result<Vec<u8>> {
        let bit_ticks = u64::from(self.controller.timing().uart_bit_ticks);
        let mut budget = (count as u64 + 1) * ECHO_SLACK_BITS * bit_ticks;
        while (!self.driver.is_idle() || self.echo.received() < count) && budget > 0 {
            self.tick()?;
            budget -= 1;
        }
        Ok(self.echo.take())
    }

    pub fn controller(&self) -> &Controller<S> {
        &self.controller
    }

    pub fn led(&self) -> &LedMonitor {
        &self.led
    }

    pub fn echo_monitor(&self) -> &UartMonitor {
        &self.echo
    }

    /// Ticks since reset
    pub fn ticks(&self) -> u64 {
        self.tick
    }

    fn us_to_ticks(&self, us: u64) -> u64 {
        us.saturating_mul(u64::from(self.controller.timing().clock_hz)) / 1_000_000
    }
}
