//! The drawing surface the animator paints on.

use nightsky_core::Rgb;

/// A canvas-like target in logical pixel coordinates.
///
/// Alphas are in `[0, 1]`; implementations clamp anything outside.
pub trait DrawSurface {
    /// Erase everything drawn so far.
    fn clear(&mut self);

    /// Solid disc.
    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: Rgb, alpha: f64);

    /// Disc whose alpha falls off linearly from `alpha` at the centre to zero at `radius`.
    fn radial_glow(&mut self, x: f64, y: f64, radius: f64, color: Rgb, alpha: f64);

    /// Stroke from `head` to `tail`, fading from `alpha` at the head to zero at the tail.
    fn gradient_line(
        &mut self,
        head: (f64, f64),
        tail: (f64, f64),
        width: f64,
        color: Rgb,
        alpha: f64,
    );
}

#[cfg(test)]
pub(crate) mod recording {
    use super::*;

    /// One recorded draw operation.
    #[derive(Debug, Clone, PartialEq)]
    pub enum DrawCall {
        Clear,
        Circle {
            x: f64,
            y: f64,
            radius: f64,
            alpha: f64,
        },
        Glow {
            x: f64,
            y: f64,
            radius: f64,
            alpha: f64,
        },
        Line {
            head: (f64, f64),
            tail: (f64, f64),
            width: f64,
            alpha: f64,
        },
    }

    /// Surface that keeps a log of every call instead of drawing.
    #[derive(Debug, Default)]
    pub struct RecordingSurface {
        pub calls: Vec<DrawCall>,
    }

    impl RecordingSurface {
        /// Calls made since the most recent clear.
        pub fn last_frame(&self) -> &[DrawCall] {
            let start = self
                .calls
                .iter()
                .rposition(|c| *c == DrawCall::Clear)
                .map(|i| i + 1)
                .unwrap_or(0);
            &self.calls[start..]
        }

        pub fn lines(&self) -> Vec<&DrawCall> {
            self.last_frame()
                .iter()
                .filter(|c| matches!(c, DrawCall::Line { .. }))
                .collect()
        }
    }

    impl DrawSurface for RecordingSurface {
        fn clear(&mut self) {
            self.calls.push(DrawCall::Clear);
        }

        fn fill_circle(&mut self, x: f64, y: f64, radius: f64, _color: Rgb, alpha: f64) {
            self.calls.push(DrawCall::Circle {
                x,
                y,
                radius,
                alpha,
            });
        }

        fn radial_glow(&mut self, x: f64, y: f64, radius: f64, _color: Rgb, alpha: f64) {
            self.calls.push(DrawCall::Glow {
                x,
                y,
                radius,
                alpha,
            });
        }

        fn gradient_line(
            &mut self,
            head: (f64, f64),
            tail: (f64, f64),
            width: f64,
            _color: Rgb,
            alpha: f64,
        ) {
            self.calls.push(DrawCall::Line {
                head,
                tail,
                width,
                alpha,
            });
        }
    }
}
