//! Color selection trait

/// Source of palette indices for characters in drawn-color mode
///
/// The controller clocks the source once per tick whether or not a
/// character arrives, so the index drawn for a byte depends on when it
/// arrived.
pub trait ColorSource {
    /// Advance one clock tick
    fn tick(&mut self) {}

    /// Palette index for the next character; only the low four bits are used
    fn next_index(&mut self) -> u8;
}

impl<S: ColorSource + ?Sized> ColorSource for &mut S {
    fn tick(&mut self) {
        (**self).tick()
    }

    fn next_index(&mut self) -> u8 {
        (**self).next_index()
    }
}
