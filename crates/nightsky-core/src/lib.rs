//! Core types for the nightsky star field.
//!
//! Shared between the animation crate, the configuration crate and the
//! binary: colours, surface geometry, tuning constants and the injectable
//! time and randomness sources the animator is driven by.

mod clock;
mod random;
mod tuning;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use clock::{Clock, ManualClock, SystemClock};
pub use random::{FastRandom, RandomSource, ScriptedRandom};
pub use tuning::{
    FieldTuning, MAX_BATCH_SIZE, MAX_STARS, SPAWN_INTERVAL_MS, SPAWN_PROBABILITY, STAR_DENSITY_AREA,
    STREAK_STAGGER_MS, SURFACE_HEIGHT_FACTOR,
};

/// An opaque RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `RRGGBB`, with or without a leading `#`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }

        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

        Some(Self { r, g, b })
    }
}

impl From<Rgb> for ratatui::style::Color {
    fn from(c: Rgb) -> Self {
        ratatui::style::Color::Rgb(c.r, c.g, c.b)
    }
}

/// Size of the visible terminal window, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// The drawing surface that pre-covers the whole scroll extent.
    pub fn surface(&self) -> SurfaceSize {
        SurfaceSize::new(self.width, self.height * SURFACE_HEIGHT_FACTOR)
    }
}

/// Size of the drawing surface, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SurfaceSize {
    pub width: f64,
    pub height: f64,
}

impl SurfaceSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// True when either dimension is zero (or negative).
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// How the raster is turned into terminal cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Two sub-pixels per cell using the upper half block.
    #[default]
    Blocks,
    /// One star character per cell, picked by brightness.
    Glyphs,
}

impl RenderMode {
    /// Switch to the other mode.
    pub fn toggle(&self) -> Self {
        match self {
            RenderMode::Blocks => RenderMode::Glyphs,
            RenderMode::Glyphs => RenderMode::Blocks,
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderMode::Blocks => write!(f, "blocks"),
            RenderMode::Glyphs => write!(f, "glyphs"),
        }
    }
}

impl FromStr for RenderMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "blocks" => Ok(RenderMode::Blocks),
            "glyphs" => Ok(RenderMode::Glyphs),
            other => Err(format!("unknown render mode '{other}' (expected blocks or glyphs)")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_from_hex() {
        assert_eq!(Rgb::from_hex("1a1b26"), Some(Rgb::new(0x1a, 0x1b, 0x26)));
        assert_eq!(Rgb::from_hex("#FFFFFF"), Some(Rgb::WHITE));
        assert_eq!(Rgb::from_hex("fff"), None);
        assert_eq!(Rgb::from_hex("zzzzzz"), None);
        assert_eq!(Rgb::from_hex("#+f+f+f"), None);
        assert_eq!(Rgb::from_hex("-1ffff"), None);
    }

    #[test]
    fn test_viewport_surface_is_three_screens_tall() {
        let surface = Viewport::new(800.0, 600.0).surface();
        assert_eq!(surface, SurfaceSize::new(800.0, 1800.0));
        assert_eq!(surface.area(), 1_440_000.0);
    }

    #[test]
    fn test_surface_is_empty() {
        assert!(SurfaceSize::new(0.0, 100.0).is_empty());
        assert!(SurfaceSize::new(100.0, 0.0).is_empty());
        assert!(!SurfaceSize::new(1.0, 1.0).is_empty());
    }

    #[test]
    fn test_render_mode_toggle_and_parse() {
        assert_eq!(RenderMode::Blocks.toggle(), RenderMode::Glyphs);
        assert_eq!(RenderMode::Glyphs.toggle(), RenderMode::Blocks);
        assert_eq!("Glyphs".parse::<RenderMode>(), Ok(RenderMode::Glyphs));
        assert!("braille".parse::<RenderMode>().is_err());
        assert_eq!(RenderMode::Blocks.to_string(), "blocks");
    }
}
