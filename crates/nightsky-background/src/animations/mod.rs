//! Star field pieces: the ambient population, streaks and the spawn gate.

pub mod spawn;
pub mod stars;
pub mod streaks;
