//! Rate-limited, probabilistic streak spawning.

use nightsky_core::{FieldTuning, RandomSource};

/// Decides once per frame whether a new batch of streaks appears.
#[derive(Debug, Clone, Default)]
pub struct SpawnGate {
    /// Clock time of the last batch, `None` before the first one.
    last_spawn_ms: Option<f64>,
}

impl SpawnGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_spawn_ms(&self) -> Option<f64> {
        self.last_spawn_ms
    }

    /// Returns the batch size when a batch is created at `now_ms`.
    ///
    /// A batch needs `spawn_interval_ms` to have passed since the previous
    /// one and then passes a `spawn_probability` draw. A failed draw does
    /// not restart the interval.
    pub fn try_spawn(
        &mut self,
        now_ms: f64,
        tuning: &FieldTuning,
        rng: &mut impl RandomSource,
    ) -> Option<usize> {
        if let Some(last) = self.last_spawn_ms
            && now_ms - last < tuning.spawn_interval_ms
        {
            return None;
        }

        if !rng.above(1.0 - tuning.spawn_probability) {
            return None;
        }

        let max = tuning.max_batch_size.max(1) as usize;
        let count = rng.index(max) + 1;
        self.last_spawn_ms = Some(now_ms);
        Some(count)
    }
}
