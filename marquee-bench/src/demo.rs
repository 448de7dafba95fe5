//! Counter demo stream
//!
//! Each number goes out as four digits and a newline. Every hundredth number
//! is preceded by a color command that steps through the palette.

use marquee_core::dispatcher::COLOR_COMMAND_BIT;
use marquee_core::palette::PALETTE_SIZE;

/// Numbers sharing one color
pub const NUMBERS_PER_COLOR: u32 = 100;

/// Bytes sent for number `n`
pub fn counter_message(n: u32) -> Vec<u8> {
    let mut message = Vec::with_capacity(6);
    if n % NUMBERS_PER_COLOR == 0 {
        let index = (n / NUMBERS_PER_COLOR) % PALETTE_SIZE as u32;
        message.push(COLOR_COMMAND_BIT | index as u8);
    }
    message.extend_from_slice(format!("{:04}\n", n).as_bytes());
    message
}

/// Messages for the numbers `0..count`
pub fn counter_stream(count: u32) -> impl Iterator<Item = Vec<u8>> {
    (0..count).map(counter_message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_command_every_hundredth() {
        assert_eq!(counter_message(0), b"\x800000\n");
        assert_eq!(counter_message(1), b"0001\n");
        assert_eq!(counter_message(300), b"\x830300\n");
        assert_eq!(counter_message(1700), b"\x811700\n");
    }

    #[test]
    fn test_stream() {
        let messages: Vec<_> = counter_stream(101).collect();
        assert_eq!(messages.len(), 101);
        assert_eq!(messages[42], b"0042\n");
        assert_eq!(messages[100][0], 0x81);
    }
}
