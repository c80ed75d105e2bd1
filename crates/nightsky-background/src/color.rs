//! Colour utility functions for the star field.

use nightsky_core::Rgb;

/// Colours used when drawing the field.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    /// Colour of every ambient star.
    pub star: Rgb,
    /// Streak colours; each new streak picks one at random.
    pub streaks: Vec<Rgb>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            star: Rgb::WHITE,
            streaks: vec![Rgb::WHITE],
        }
    }
}

impl Palette {
    /// Streak colour at `index`, falling back to white for an empty palette.
    pub fn streak(&self, index: usize) -> Rgb {
        self.streaks.get(index).copied().unwrap_or(Rgb::WHITE)
    }
}

/// Perceived brightness in `[0, 1]` (Rec. 709 weights).
pub fn luminance(c: Rgb) -> f64 {
    (0.2126 * c.r as f64 + 0.7152 * c.g as f64 + 0.0722 * c.b as f64) / 255.0
}

/// Linear interpolation from `a` to `b`; `t` is clamped to `[0, 1]`.
pub fn mix(a: Rgb, b: Rgb, t: f64) -> Rgb {
    let t = t.clamp(0.0, 1.0);
    let lerp = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * t).round() as u8;
    Rgb::new(lerp(a.r, b.r), lerp(a.g, b.g), lerp(a.b, b.b))
}
