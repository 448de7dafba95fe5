//! Scrolling character buffer
//!
//! A fixed ring of `num_chars` cells. New characters enter at the tail and
//! push the oldest one out of the head, so the row scrolls left by one slot
//! per character. The buffer is always full: after reset every slot holds a
//! blank cell.

use heapless::Vec;

use crate::cell::CharacterCell;
use crate::config::{CharCount, MAX_CHARS};

/// Owned copy of the buffer, oldest cell first
pub type Snapshot = Vec<CharacterCell, MAX_CHARS>;

/// Fixed-capacity ring FIFO of character cells
#[derive(Debug, Clone)]
pub struct CharacterBuffer {
    cells: [CharacterCell; MAX_CHARS],
    /// Index of the oldest cell
    head: usize,
    len: usize,
}

impl CharacterBuffer {
    /// Create a buffer of `count` blank cells
    pub fn new(count: CharCount) -> Self {
        Self {
            cells: [CharacterCell::BLANK; MAX_CHARS],
            head: 0,
            len: count.get(),
        }
    }

    /// Append a cell at the tail, returning the evicted head
    pub fn push(&mut self, cell: CharacterCell) -> CharacterCell {
        // The head slot becomes the new tail
        let evicted = core::mem::replace(&mut self.cells[self.head], cell);
        self.head = (self.head + 1) % self.len;
        evicted
    }

    /// Copy the cells out in display order
    pub fn snapshot(&self) -> Snapshot {
        self.iter().collect()
    }

    /// Cells in display order, oldest first
    pub fn iter(&self) -> impl Iterator<Item = CharacterCell> + '_ {
        (0..self.len).map(move |i| self.cells[(self.head + i) % self.len])
    }

    /// Cell at display position `index`
    pub fn get(&self, index: usize) -> Option<CharacterCell> {
        (index < self.len).then(|| self.cells[(self.head + index) % self.len])
    }

    /// Number of slots (always full)
    pub fn len(&self) -> usize {
        self.len
    }

    /// Never true; a buffer has at least two slots
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Maximum number of slots any buffer can have
    pub const fn capacity(&self) -> usize {
        MAX_CHARS
    }

    /// Blank every slot
    pub fn clear(&mut self) {
        self.cells = [CharacterCell::BLANK; MAX_CHARS];
        self.head = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::{self, Glyph};
    use crate::palette;

    fn cell(ch: u8) -> CharacterCell {
        CharacterCell::new(font::glyph(ch), palette::color(ch))
    }

    fn text(buffer: &CharacterBuffer) -> std::string::String {
        buffer
            .iter()
            .map(|c| font::character(c.glyph).unwrap_or(b'?') as char)
            .collect()
    }

    #[test]
    fn test_starts_full_of_blanks() {
        for count in [CharCount::Two, CharCount::Four, CharCount::Eight] {
            let buffer = CharacterBuffer::new(count);
            assert_eq!(buffer.len(), count.get());
            assert_eq!(buffer.snapshot().len(), count.get());
            assert!(buffer.iter().all(|c| c == CharacterCell::BLANK));
        }
    }

    #[test]
    fn test_push_scrolls_left() {
        let mut buffer = CharacterBuffer::new(CharCount::Two);
        for &ch in b"Cir" {
            buffer.push(cell(ch));
        }
        assert_eq!(text(&buffer), "ir");

        let evicted = buffer.push(cell(b'o'));
        assert_eq!(evicted.glyph, font::glyph(b'i'));
        assert_eq!(text(&buffer), "ro");
    }

    #[test]
    fn test_four_slots() {
        let mut buffer = CharacterBuffer::new(CharCount::Four);
        for &ch in b"Cir" {
            buffer.push(cell(ch));
        }
        assert_eq!(text(&buffer), " Cir");
        assert_eq!(buffer.get(0), Some(CharacterCell::BLANK));
        assert_eq!(buffer.get(4), None);

        buffer.push(cell(b'o'));
        buffer.push(cell(b'X'));
        assert_eq!(text(&buffer), "iroX");
    }

    #[test]
    fn test_snapshot_is_decoupled() {
        let mut buffer = CharacterBuffer::new(CharCount::Eight);
        for &ch in b"01234567" {
            buffer.push(cell(ch));
        }
        let snapshot = buffer.snapshot();
        buffer.push(cell(b'8'));
        buffer.push(cell(b'9'));

        assert_eq!(snapshot[0].glyph, font::glyph(b'0'));
        assert_eq!(text(&buffer), "23456789");
        assert_eq!(buffer.capacity(), MAX_CHARS);
    }

    #[test]
    fn test_clear() {
        let mut buffer = CharacterBuffer::new(CharCount::Four);
        buffer.push(cell(b'Q'));
        buffer.clear();
        assert_eq!(buffer.len(), 4);
        assert!(buffer.iter().all(|c| c.glyph == Glyph::BLANK));
    }
}
