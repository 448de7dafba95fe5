//! LED matrix encoder
//!
//! Serializes a snapshot onto the single-wire LED line. Cells go out in
//! buffer order, each as 35 pixels row by row; a lit pixel carries the cell
//! color and a dark one 24 zero bits. Each bit is a high pulse at the start
//! of a fixed period:
//!
//! ```text
//!        ┌──── t0h ────┐                       ┌──────── t1h ────────┐
//!  "0"  ─┘             └───────────────  "1"  ─┘                     └─────
//!        ├──────────── led_bit_ticks ───────┤
//! ```
//!
//! The dimmer shifts every channel right by its level as bits are sent.
//! Only at level 0 is every lit pixel an exact palette entry; at higher
//! levels the line carries the dimmed palette color.

use marquee_protocol::color::BITS_PER_PIXEL;

use crate::buffer::Snapshot;
use crate::cell::CharacterCell;
use crate::config::{DimmerLevel, Timing};
use crate::font::GLYPH_PIXELS;

/// Line bits per character cell
pub const BITS_PER_CELL: usize = GLYPH_PIXELS * BITS_PER_PIXEL;

/// Bit `n` of the frame for `cells`, or `None` past the end
pub fn frame_bit(cells: &[CharacterCell], dimmer: DimmerLevel, n: usize) -> Option<bool> {
    let cell = cells.get(n / BITS_PER_CELL)?;
    let offset = n % BITS_PER_CELL;
    let pixel = offset / BITS_PER_PIXEL;

    Some(
        cell.glyph.pixel(pixel)
            && cell
                .color
                .dimmed(dimmer.shift())
                .wire_bit(offset % BITS_PER_PIXEL),
    )
}

/// All bits of the frame for `cells`, in line order
pub fn frame_bits(
    cells: &[CharacterCell],
    dimmer: DimmerLevel,
) -> impl Iterator<Item = bool> + '_ {
    (0..cells.len() * BITS_PER_CELL).filter_map(move |n| frame_bit(cells, dimmer, n))
}

/// Drives the LED line from a snapshot, one tick at a time
#[derive(Debug, Clone)]
pub struct LedMatrixEncoder {
    bit_ticks: u32,
    t0h_ticks: u32,
    t1h_ticks: u32,
    dimmer: DimmerLevel,
    snapshot: Snapshot,
    /// Next bit to send
    bit_index: usize,
    bit: bool,
    tick_in_bit: u32,
    busy: bool,
    finished: bool,
}

impl LedMatrixEncoder {
    pub fn new(timing: &Timing, dimmer: DimmerLevel) -> Self {
        Self {
            bit_ticks: timing.led_bit_ticks.max(1),
            t0h_ticks: timing.t0h_ticks,
            t1h_ticks: timing.t1h_ticks,
            dimmer,
            snapshot: Snapshot::new(),
            bit_index: 0,
            bit: false,
            tick_in_bit: 0,
            busy: false,
            finished: false,
        }
    }

    /// Take ownership of a snapshot and start streaming it
    ///
    /// Returns `false` and leaves the frame in flight alone when busy.
    pub fn start(&mut self, snapshot: Snapshot) -> bool {
        if self.busy {
            return false;
        }

        self.snapshot = snapshot;
        self.bit_index = 0;
        self.tick_in_bit = 0;
        match frame_bit(&self.snapshot, self.dimmer, 0) {
            Some(bit) => {
                self.bit = bit;
                self.busy = true;
            }
            // Nothing to send
            None => self.finished = true,
        }
        true
    }

    /// Drive the line for one tick, returning its level
    pub fn step(&mut self) -> bool {
        if !self.busy {
            return false;
        }

        let high_ticks = if self.bit {
            self.t1h_ticks
        } else {
            self.t0h_ticks
        };
        let level = self.tick_in_bit < high_ticks;

        self.tick_in_bit += 1;
        if self.tick_in_bit == self.bit_ticks {
            self.tick_in_bit = 0;
            self.bit_index += 1;
            match frame_bit(&self.snapshot, self.dimmer, self.bit_index) {
                Some(bit) => self.bit = bit,
                None => {
                    self.busy = false;
                    self.finished = true;
                }
            }
        }
        level
    }

    /// Check if a frame is being sent
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Report a completed frame once
    pub fn take_finished(&mut self) -> bool {
        core::mem::take(&mut self.finished)
    }

    /// Snapshot of the current or last frame
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Bits sent of the current frame
    pub fn bits_sent(&self) -> usize {
        self.bit_index
    }
}
