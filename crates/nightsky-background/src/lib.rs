//! Star field animation for nightsky.
//!
//! A [`FieldAnimator`] owns a population of ambient stars and a set of
//! shooting-star streaks and redraws them every frame onto a
//! [`DrawSurface`]. The surface used by the terminal front end is a
//! [`PixelCanvas`], which [`render`] turns into ratatui spans.

mod animations;
mod canvas;
mod chars;
mod color;
mod render;
mod state;
mod surface;

pub use animations::spawn::SpawnGate;
pub use animations::stars::{AmbientStar, generate_population};
pub use animations::streaks::StreakEvent;
pub use canvas::PixelCanvas;
pub use color::{Palette, luminance, mix};
pub use render::{render, window_lines};
pub use state::{AnimatorPhase, FieldAnimator};
pub use surface::DrawSurface;
