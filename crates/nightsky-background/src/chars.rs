//! Character constants for terminal rendering.

/// Star characters ordered from dimmest to brightest.
pub const STAR_CHARS: &[char] = &['·', '.', '+', '*', '✧', '✦'];

/// Upper half block: foreground paints the top sub-pixel, background the bottom.
pub const UPPER_HALF: &str = "▀";

/// Lower half block.
pub const LOWER_HALF: &str = "▄";
