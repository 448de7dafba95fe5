//! Controller top level
//!
//! Owns every component and advances them once per clock tick in a fixed
//! order:
//!
//! 1. color source
//! 2. UART receiver, then for a received byte the loopback queue and the
//!    dispatcher
//! 3. refresh scheduler; a due frame hands a buffer snapshot to the encoder
//! 4. LED encoder
//! 5. UART transmitter

use marquee_protocol::{UartReceiver, UartTransmitter};

use crate::buffer::{CharacterBuffer, Snapshot};
use crate::config::{Config, Timing};
use crate::dispatcher::{ColorRegister, CommandDispatcher, Dispatch};
use crate::encoder::LedMatrixEncoder;
use crate::random::Lfsr16;
use crate::scheduler::{RefreshPolicy, RefreshScheduler};
use crate::state::RefreshPhase;
use crate::traits::ColorSource;

/// Input lines for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Inputs {
    /// UART receive line
    pub rx: bool,
}

impl Default for Inputs {
    /// Idle UART line
    fn default() -> Self {
        Self { rx: true }
    }
}

/// Output lines and notable events of one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Outputs {
    /// LED data line
    pub led: bool,
    /// UART transmit line
    pub tx: bool,
    /// What the byte received on this tick did
    pub dispatch: Option<Dispatch>,
    /// A frame started on this tick
    pub frame_started: bool,
}

/// The character ticker
#[derive(Debug, Clone)]
pub struct Controller<S: ColorSource = Lfsr16> {
    config: Config,
    timing: Timing,
    receiver: UartReceiver,
    transmitter: UartTransmitter,
    dispatcher: CommandDispatcher,
    buffer: CharacterBuffer,
    scheduler: RefreshScheduler,
    encoder: LedMatrixEncoder,
    colors: S,
    /// Loopback bytes dropped on a full transmit queue
    tx_overruns: u32,
}

impl Controller<Lfsr16> {
    /// Controller at reset with the default color source
    pub fn new(config: Config, timing: &Timing) -> Self {
        Self::with_color_source(config, timing, Lfsr16::default())
    }

    /// Controller at reset, configured from the register value
    pub fn from_register(reg: u8, timing: &Timing) -> Self {
        Self::new(Config::from_register(reg), timing)
    }
}

impl<S: ColorSource> Controller<S> {
    /// Controller at reset drawing colors from `colors`
    pub fn with_color_source(config: Config, timing: &Timing, colors: S) -> Self {
        Self {
            config,
            timing: *timing,
            receiver: UartReceiver::new(timing.uart_bit_ticks),
            transmitter: UartTransmitter::new(timing.uart_bit_ticks),
            dispatcher: CommandDispatcher::new(config),
            buffer: CharacterBuffer::new(config.num_chars),
            scheduler: RefreshScheduler::new(RefreshPolicy::from_config(&config), timing),
            encoder: LedMatrixEncoder::new(timing, config.dimmer),
            colors,
            tx_overruns: 0,
        }
    }

    /// Advance one clock tick
    pub fn step(&mut self, inputs: Inputs) -> Outputs {
        self.colors.tick();

        let mut dispatch = None;
        if let Some(byte) = self.receiver.step(inputs.rx) {
            if self.config.uart_loopback && self.transmitter.write(byte).is_err() {
                self.tx_overruns = self.tx_overruns.saturating_add(1);
            }

            let result = self
                .dispatcher
                .dispatch(byte, &mut self.buffer, &mut self.colors);
            match result {
                Dispatch::CellPushed(_) => self.scheduler.buffer_changed(),
                Dispatch::RefreshRequested => self.scheduler.request(),
                Dispatch::ColorSelected(_) => {}
            }
            dispatch = Some(result);
        }

        let frame_started = self.scheduler.step(self.receiver.is_busy());
        if frame_started {
            let accepted = self.encoder.start(self.buffer.snapshot());
            debug_assert!(accepted, "frame started while the encoder was busy");
        }

        let led = self.encoder.step();
        if self.encoder.take_finished() {
            self.scheduler.frame_complete();
        }

        let tx = self.transmitter.step();

        Outputs {
            led,
            tx,
            dispatch,
            frame_started,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    pub fn buffer(&self) -> &CharacterBuffer {
        &self.buffer
    }

    pub fn color_register(&self) -> &ColorRegister {
        self.dispatcher.color_register()
    }

    pub fn phase(&self) -> RefreshPhase {
        self.scheduler.phase()
    }

    /// Snapshot owned by the encoder for the current or last frame
    pub fn frame_snapshot(&self) -> &Snapshot {
        self.encoder.snapshot()
    }

    /// Frames started since reset
    pub fn frames(&self) -> u32 {
        self.scheduler.frames()
    }

    /// UART frames dropped for a low stop bit
    pub fn framing_errors(&self) -> u32 {
        self.receiver.framing_errors()
    }

    pub fn tx_overruns(&self) -> u32 {
        self.tx_overruns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CharCount;
    use crate::font;
    use std::vec::Vec;

    /// Drive `bytes` into the controller followed by `idle` quiet ticks
    fn send<S: ColorSource>(
        controller: &mut Controller<S>,
        bytes: &[u8],
        idle: u32,
    ) -> Vec<Outputs> {
        let bit_ticks = controller.timing().uart_bit_ticks;
        let mut uart = UartTransmitter::new(bit_ticks);
        let mut outputs = Vec::new();
        let mut rest = bytes.iter();

        // The receiver only takes a start bit after seeing the line high
        if !bytes.is_empty() {
            for _ in 0..bit_ticks {
                outputs.push(controller.step(Inputs::default()));
            }
        }

        loop {
            while uart.queued() < 2 {
                match rest.next() {
                    Some(&byte) => uart.write(byte).unwrap(),
                    None => break,
                }
            }
            if uart.is_idle() {
                break;
            }
            let rx = uart.step();
            outputs.push(controller.step(Inputs { rx }));
        }
        for _ in 0..idle {
            outputs.push(controller.step(Inputs::default()));
        }
        outputs
    }

    fn run_until<S: ColorSource>(
        controller: &mut Controller<S>,
        limit: u32,
        done: impl Fn(&Controller<S>) -> bool,
    ) -> bool {
        for _ in 0..limit {
            if done(controller) {
                return true;
            }
            controller.step(Inputs::default());
        }
        done(controller)
    }

    fn text(snapshot: &Snapshot) -> std::string::String {
        snapshot
            .iter()
            .map(|c| font::character(c.glyph).unwrap_or(b'?') as char)
            .collect()
    }

    #[test]
    fn test_first_frame_after_idle_time() {
        let timing = Timing::default();
        let mut controller = Controller::new(Config::default(), &timing);

        let outputs = send(&mut controller, &[], timing.idle_refresh_ticks);
        let started = outputs.iter().position(|o| o.frame_started);
        assert_eq!(started, Some(timing.idle_refresh_ticks as usize - 1));
        assert_eq!(controller.phase(), RefreshPhase::Rendering);
        assert_eq!(text(controller.frame_snapshot()), "  ");
    }

    #[test]
    fn test_no_frame_without_trigger_in_external_mode() {
        let timing = Timing::default();
        let config = Config {
            ext_refresh: true,
            num_chars: CharCount::Four,
            ..Config::default()
        };
        let mut controller = Controller::new(config, &timing);

        let outputs = send(&mut controller, b"AB", 3 * timing.idle_refresh_ticks);
        assert!(outputs.iter().all(|o| !o.led));
        assert_eq!(controller.frames(), 0);

        let outputs = send(&mut controller, b"\r", 10);
        assert!(outputs.iter().any(|o| o.frame_started));
        assert_eq!(text(controller.frame_snapshot()), "  AB");
    }

    #[test]
    fn test_snapshot_unaffected_by_bytes_during_frame() {
        let timing = Timing::default();
        let mut controller = Controller::new(Config::default(), &timing);

        assert!(run_until(&mut controller, 2 * timing.idle_refresh_ticks, |c| {
            c.phase() == RefreshPhase::Rendering
        }));

        // One byte takes about half of a two-cell frame
        let outputs = send(&mut controller, b"Q", 0);
        assert!(outputs.iter().any(|o| matches!(o.dispatch, Some(Dispatch::CellPushed(_)))));
        assert_eq!(controller.phase(), RefreshPhase::Rendering);
        assert_eq!(text(&controller.buffer().snapshot()), " Q");
        assert_eq!(text(controller.frame_snapshot()), "  ");

        assert!(run_until(&mut controller, 200_000, |c| c.frames() == 2));
        assert_eq!(text(controller.frame_snapshot()), " Q");
    }

    #[test]
    fn test_loopback_echo() {
        let timing = Timing::default();
        let mut controller = Controller::from_register(0b0000_0100, &timing);
        assert!(controller.config().uart_loopback);

        let sent = [b'H', 0x85, 0x00, 0xFF, b'\r'];
        let outputs = send(&mut controller, &sent, 12 * timing.uart_bit_ticks);

        let mut monitor = UartReceiver::new(timing.uart_bit_ticks);
        let echoed: Vec<u8> = outputs.iter().filter_map(|o| monitor.step(o.tx)).collect();
        assert_eq!(echoed, sent);
        assert_eq!(monitor.framing_errors(), 0);
        assert_eq!(controller.tx_overruns(), 0);
    }

    #[test]
    fn test_no_echo_without_loopback() {
        let timing = Timing::default();
        let mut controller = Controller::new(Config::default(), &timing);
        let outputs = send(&mut controller, b"hi", timing.uart_bit_ticks);
        assert!(outputs.iter().all(|o| o.tx));
    }

    #[test]
    fn test_framing_error_is_absorbed() {
        let timing = Timing::default();
        let mut controller = Controller::new(Config::default(), &timing);
        let bit = timing.uart_bit_ticks;

        // Idle, then start bit, eight zero bits and a low stop bit
        send(&mut controller, &[], bit);
        for _ in 0..(10 * bit) {
            assert_eq!(controller.step(Inputs { rx: false }).dispatch, None);
        }
        send(&mut controller, &[], bit);
        assert_eq!(controller.framing_errors(), 1);
        assert!(controller.buffer().iter().all(|c| c.is_blank()));

        send(&mut controller, b"k", 0);
        assert_eq!(text(&controller.buffer().snapshot()), " k");
    }

    #[test]
    fn test_trigger_during_frame_renders_next_frame() {
        let timing = Timing::default();
        let config = Config {
            ext_refresh: true,
            ..Config::default()
        };
        let mut controller = Controller::new(config, &timing);

        // Second CR arrives while the first frame is on the line
        send(&mut controller, b"x\r\r", 0);
        assert_eq!(controller.frames(), 1);
        assert!(run_until(&mut controller, 200_000, |c| c.frames() == 2));
        assert!(run_until(&mut controller, 200_000, |c| {
            c.phase() == RefreshPhase::Idle
        }));
        assert_eq!(controller.frames(), 2);
        assert_eq!(text(controller.frame_snapshot()), " x");
    }

    #[test]
    fn test_color_commands_do_not_touch_buffer() {
        let timing = Timing::default();
        let mut controller = Controller::from_register(0b1000_0000, &timing);

        let outputs = send(&mut controller, &[0x8C], 0);
        assert!(outputs
            .iter()
            .any(|o| o.dispatch == Some(Dispatch::ColorSelected(12))));
        assert_eq!(controller.color_register().index(), 12);
        assert!(controller.buffer().iter().all(|c| c.is_blank()));
    }
}
