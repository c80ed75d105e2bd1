//! Tunable constants for star density and streak spawning.

use serde::{Deserialize, Serialize};

/// Surface area (px²) per ambient star.
pub const STAR_DENSITY_AREA: f64 = 35_000.0;

/// Minimum time between two spawn batches.
pub const SPAWN_INTERVAL_MS: f64 = 1_500.0;

/// Chance that a permitted spawn actually happens.
pub const SPAWN_PROBABILITY: f64 = 0.7;

/// Delay between consecutive streaks of one batch.
pub const STREAK_STAGGER_MS: f64 = 100.0;

/// Largest number of streaks per batch.
pub const MAX_BATCH_SIZE: u32 = 3;

/// Upper bound on the ambient star population, whatever the surface size.
pub const MAX_STARS: usize = 20_000;

/// Surface height as a multiple of the viewport height.
pub const SURFACE_HEIGHT_FACTOR: f64 = 3.0;

/// Tuning values for a star field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldTuning {
    pub star_density_area: f64,
    pub spawn_interval_ms: f64,
    pub spawn_probability: f64,
    pub stagger_ms: f64,
    pub max_batch_size: u32,
}

impl Default for FieldTuning {
    fn default() -> Self {
        Self {
            star_density_area: STAR_DENSITY_AREA,
            spawn_interval_ms: SPAWN_INTERVAL_MS,
            spawn_probability: SPAWN_PROBABILITY,
            stagger_ms: STREAK_STAGGER_MS,
            max_batch_size: MAX_BATCH_SIZE,
        }
    }
}

impl FieldTuning {
    /// Number of ambient stars for a surface of the given area, at most [`MAX_STARS`].
    pub fn star_count(&self, area: f64) -> usize {
        let count = (area / self.star_density_area).floor();
        if !count.is_finite() || count <= 0.0 {
            return 0;
        }
        (count as usize).min(MAX_STARS)
    }
}
