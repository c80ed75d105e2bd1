//! Ambient star population.

use std::ops::Range;

use nightsky_core::{FieldTuning, RandomSource, Rgb, SurfaceSize};

use crate::surface::DrawSurface;

/// Star radius in pixels.
pub const STAR_SIZE: Range<f64> = 0.5..2.5;
/// Base star alpha.
pub const STAR_OPACITY: Range<f64> = 0.3..1.0;
/// Blink period in seconds.
pub const BLINK_PERIOD_SECS: Range<f64> = 2.0..5.0;
/// A star blinks when its draw lands above this.
pub const BLINK_THRESHOLD: f64 = 0.7;
/// Stars larger than this get a glow.
pub const GLOW_SIZE_THRESHOLD: f64 = 1.5;
pub const GLOW_RADIUS_FACTOR: f64 = 3.0;
pub const GLOW_OPACITY_FACTOR: f64 = 0.3;

/// A fixed background point light.
#[derive(Debug, Clone, PartialEq)]
pub struct AmbientStar {
    pub x: f64,
    pub y: f64,
    /// Radius in pixels.
    pub size: f64,
    /// Base alpha in `(0, 1]`.
    pub opacity: f64,
    pub blinking: bool,
    /// Oscillation period in seconds; only used when blinking.
    pub blink_period: f64,
}

impl AmbientStar {
    /// Draw a star uniformly placed on the surface.
    pub fn random(surface: SurfaceSize, rng: &mut impl RandomSource) -> Self {
        let x = rng.next_f64() * surface.width;
        let y = rng.next_f64() * surface.height;
        let size = rng.range(STAR_SIZE.start, STAR_SIZE.end);
        let opacity = rng.range(STAR_OPACITY.start, STAR_OPACITY.end);
        let blinking = rng.above(BLINK_THRESHOLD);
        let blink_period = rng.range(BLINK_PERIOD_SECS.start, BLINK_PERIOD_SECS.end);

        Self {
            x,
            y,
            size,
            opacity,
            blinking,
            blink_period,
        }
    }

    /// Alpha at `time_secs`; blinking stars oscillate within `[0, opacity]`.
    pub fn opacity_at(&self, time_secs: f64) -> f64 {
        if self.blinking && self.blink_period > 0.0 {
            self.opacity * (0.5 + 0.5 * (time_secs / self.blink_period).sin())
        } else {
            self.opacity
        }
    }

    pub fn has_glow(&self) -> bool {
        self.size > GLOW_SIZE_THRESHOLD
    }

    pub fn draw(&self, surface: &mut impl DrawSurface, time_secs: f64, color: Rgb) {
        let opacity = self.opacity_at(time_secs);
        surface.fill_circle(self.x, self.y, self.size, color, opacity);

        if self.has_glow() {
            surface.radial_glow(
                self.x,
                self.y,
                self.size * GLOW_RADIUS_FACTOR,
                color,
                opacity * GLOW_OPACITY_FACTOR,
            );
        }
    }
}

/// Generate the star population for a surface: one star per
/// `tuning.star_density_area` square pixels.
pub fn generate_population(
    surface: SurfaceSize,
    tuning: &FieldTuning,
    rng: &mut impl RandomSource,
) -> Vec<AmbientStar> {
    let count = tuning.star_count(surface.area());
    (0..count)
        .map(|_| AmbientStar::random(surface, rng))
        .collect()
}
