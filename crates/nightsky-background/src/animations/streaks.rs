//! Shooting-star streaks.

use std::ops::Range;

use nightsky_core::{RandomSource, Rgb, SurfaceSize};

use crate::color::Palette;
use crate::surface::DrawSurface;

/// Trail length in pixels.
pub const STREAK_LENGTH: Range<f64> = 50.0..130.0;
/// Speed along each axis, pixels per second.
pub const STREAK_SPEED: Range<f64> = 150.0..450.0;
pub const STREAK_OPACITY: Range<f64> = 0.7..1.0;
/// Stroke width, also the head radius.
pub const STREAK_WIDTH: Range<f64> = 1.0..3.0;
/// Streaks start in this top fraction of the surface.
pub const ORIGIN_BAND: f64 = 1.0 / 3.0;
pub const HEAD_GLOW_RADIUS_FACTOR: f64 = 4.0;
pub const HEAD_GLOW_OPACITY_FACTOR: f64 = 0.5;

/// A moving line-plus-head effect travelling down and to the right.
#[derive(Debug, Clone, PartialEq)]
pub struct StreakEvent {
    /// Head position.
    pub x: f64,
    pub y: f64,
    pub length: f64,
    pub speed: f64,
    pub line_width: f64,
    pub opacity: f64,
    pub color: Rgb,
    /// Cleared once the head leaves the surface.
    pub active: bool,
    /// Clock time (ms) before which the streak neither moves nor draws.
    pub scheduled_at: f64,
}

impl StreakEvent {
    /// Draw a new streak starting in the upper third of the surface.
    pub fn random(
        surface: SurfaceSize,
        scheduled_at: f64,
        palette: &Palette,
        rng: &mut impl RandomSource,
    ) -> Self {
        let x = rng.next_f64() * surface.width;
        let y = rng.next_f64() * (surface.height * ORIGIN_BAND);
        let length = rng.range(STREAK_LENGTH.start, STREAK_LENGTH.end);
        let speed = rng.range(STREAK_SPEED.start, STREAK_SPEED.end);
        let opacity = rng.range(STREAK_OPACITY.start, STREAK_OPACITY.end);
        let line_width = rng.range(STREAK_WIDTH.start, STREAK_WIDTH.end);
        let color = if palette.streaks.len() > 1 {
            palette.streak(rng.index(palette.streaks.len()))
        } else {
            palette.streak(0)
        };

        Self {
            x,
            y,
            length,
            speed,
            line_width,
            opacity,
            color,
            active: true,
            scheduled_at,
        }
    }

    /// True once the clock has reached `scheduled_at`.
    pub fn is_due(&self, now_ms: f64) -> bool {
        now_ms >= self.scheduled_at
    }

    /// Move the head by `delta_secs` and deactivate it once it is past the
    /// surface by more than its own length. Returns whether it is still active.
    pub fn advance(&mut self, delta_secs: f64, surface: SurfaceSize) -> bool {
        let step = self.speed * delta_secs.max(0.0);
        self.x += step;
        self.y += step;

        if self.x > surface.width + self.length || self.y > surface.height + self.length {
            self.active = false;
        }
        self.active
    }

    /// Tail end of the trail.
    pub fn tail(&self) -> (f64, f64) {
        (self.x - self.length, self.y - self.length)
    }

    pub fn draw(&self, surface: &mut impl DrawSurface) {
        surface.gradient_line(
            (self.x, self.y),
            self.tail(),
            self.line_width,
            self.color,
            self.opacity,
        );
        surface.fill_circle(self.x, self.y, self.line_width, self.color, self.opacity);
        surface.radial_glow(
            self.x,
            self.y,
            self.line_width * HEAD_GLOW_RADIUS_FACTOR,
            self.color,
            self.opacity * HEAD_GLOW_OPACITY_FACTOR,
        );
    }
}
