//! Pseudo-random palette indices

use crate::palette::INDEX_MASK;
use crate::traits::ColorSource;

/// Feedback taps of the 16-bit maximal-length Galois LFSR
pub const LFSR_TAPS: u16 = 0xB400;

/// Reset value of the LFSR
pub const LFSR_SEED: u16 = 0xACE1;

/// 16-bit Galois LFSR, period 65535
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Lfsr16 {
    state: u16,
}

impl Default for Lfsr16 {
    fn default() -> Self {
        Self::new(LFSR_SEED)
    }
}

impl Lfsr16 {
    /// Create an LFSR; a zero seed would lock up and is replaced
    pub const fn new(seed: u16) -> Self {
        Self {
            state: if seed == 0 { LFSR_SEED } else { seed },
        }
    }

    /// Current register value
    pub const fn state(&self) -> u16 {
        self.state
    }

    /// Shift once
    pub fn advance(&mut self) -> u16 {
        let lsb = self.state & 1;
        self.state >>= 1;
        if lsb != 0 {
            self.state ^= LFSR_TAPS;
        }
        self.state
    }
}

impl ColorSource for Lfsr16 {
    fn tick(&mut self) {
        self.advance();
    }

    fn next_index(&mut self) -> u8 {
        self.state as u8 & INDEX_MASK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maximal_period() {
        let mut lfsr = Lfsr16::default();
        let mut period = 0u32;
        loop {
            period += 1;
            if lfsr.advance() == LFSR_SEED {
                break;
            }
            assert_ne!(lfsr.state(), 0);
        }
        assert_eq!(period, 65_535);
    }

    #[test]
    fn test_zero_seed_replaced() {
        assert_eq!(Lfsr16::new(0).state(), LFSR_SEED);
    }

    #[test]
    fn test_indices_cover_palette() {
        let mut lfsr = Lfsr16::default();
        let mut seen = [false; 16];
        for _ in 0..1000 {
            lfsr.tick();
            let index = lfsr.next_index();
            assert!(index < 16);
            seen[index as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_reading_does_not_advance() {
        let mut lfsr = Lfsr16::new(0x1234);
        assert_eq!(lfsr.next_index(), 0x4);
        assert_eq!(lfsr.next_index(), 0x4);
        lfsr.tick();
        assert_eq!(lfsr.state(), 0x091A);
    }
}
