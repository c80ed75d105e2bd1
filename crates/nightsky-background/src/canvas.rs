//! Pixel raster that backs the terminal surface.

use std::collections::HashMap;

use nightsky_core::{Rgb, SurfaceSize};

use crate::color::mix;
use crate::surface::DrawSurface;

/// Divisor applied to a glow squeezed into a single sub-pixel
/// (mean alpha of a linear falloff over a disc).
const COLLAPSED_GLOW_FACTOR: f64 = 1.0 / 3.0;

/// An RGB raster whose pixels are coarser than the logical coordinates
/// drawn into it.
///
/// Each raster pixel covers `pixel_width × pixel_height` logical pixels.
/// Shapes too small to cover any pixel centre still light the pixel that
/// contains them, so sub-pixel stars stay visible.
#[derive(Debug, Clone)]
pub struct PixelCanvas {
    pixel_width: f64,
    pixel_height: f64,
    cols: usize,
    rows: usize,
    background: Rgb,
    pixels: Vec<Rgb>,
}

impl PixelCanvas {
    /// Create an empty canvas; call [`PixelCanvas::resize`] before drawing.
    pub fn new(pixel_width: f64, pixel_height: f64, background: Rgb) -> Self {
        Self {
            pixel_width: pixel_width.max(f64::EPSILON),
            pixel_height: pixel_height.max(f64::EPSILON),
            cols: 0,
            rows: 0,
            background,
            pixels: Vec::new(),
        }
    }

    /// Resize to cover `size`. Empty sizes are ignored.
    pub fn resize(&mut self, size: SurfaceSize) {
        if size.is_empty() {
            return;
        }
        self.cols = (size.width / self.pixel_width).ceil() as usize;
        self.rows = (size.height / self.pixel_height).ceil() as usize;
        self.pixels = vec![self.background; self.cols * self.rows];
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn background(&self) -> Rgb {
        self.background
    }

    /// Colour at a raster position; the background outside the raster.
    pub fn pixel(&self, col: usize, row: usize) -> Rgb {
        if col >= self.cols || row >= self.rows {
            return self.background;
        }
        self.pixels[row * self.cols + col]
    }

    /// Source-over blend onto one pixel.
    fn blend(&mut self, col: isize, row: isize, color: Rgb, alpha: f64) {
        if col < 0 || row < 0 || alpha <= 0.0 {
            return;
        }
        let (col, row) = (col as usize, row as usize);
        if col >= self.cols || row >= self.rows {
            return;
        }
        let idx = row * self.cols + col;
        self.pixels[idx] = mix(self.pixels[idx], color, alpha.min(1.0));
    }

    /// Raster pixel containing a logical point.
    fn containing(&self, x: f64, y: f64) -> (isize, isize) {
        (
            (x / self.pixel_width).floor() as isize,
            (y / self.pixel_height).floor() as isize,
        )
    }

    /// Pixels whose centre lies within `radius` of `(x, y)`, with the
    /// distance from the centre.
    fn cells_within(&self, x: f64, y: f64, radius: f64) -> Vec<(isize, isize, f64)> {
        let min_col = ((x - radius) / self.pixel_width).floor() as isize;
        let max_col = ((x + radius) / self.pixel_width).ceil() as isize;
        let min_row = ((y - radius) / self.pixel_height).floor() as isize;
        let max_row = ((y + radius) / self.pixel_height).ceil() as isize;

        let mut cells = Vec::new();
        for row in min_row..=max_row {
            for col in min_col..=max_col {
                let cx = (col as f64 + 0.5) * self.pixel_width;
                let cy = (row as f64 + 0.5) * self.pixel_height;
                let dist = ((cx - x).powi(2) + (cy - y).powi(2)).sqrt();
                if dist <= radius {
                    cells.push((col, row, dist));
                }
            }
        }
        cells
    }

    /// Like [`Self::cells_within`], but never empty: a disc smaller than
    /// a pixel maps onto the pixel containing its centre.
    fn footprint(&self, x: f64, y: f64, radius: f64) -> (Vec<(isize, isize, f64)>, bool) {
        let cells = self.cells_within(x, y, radius);
        if cells.is_empty() {
            let (col, row) = self.containing(x, y);
            (vec![(col, row, 0.0)], true)
        } else {
            (cells, false)
        }
    }
}

impl DrawSurface for PixelCanvas {
    fn clear(&mut self) {
        self.pixels.fill(self.background);
    }

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: Rgb, alpha: f64) {
        let (cells, _) = self.footprint(x, y, radius);
        for (col, row, _) in cells {
            self.blend(col, row, color, alpha);
        }
    }

    fn radial_glow(&mut self, x: f64, y: f64, radius: f64, color: Rgb, alpha: f64) {
        if radius <= 0.0 {
            return;
        }
        let (cells, collapsed) = self.footprint(x, y, radius);
        for (col, row, dist) in cells {
            let a = if collapsed {
                alpha * COLLAPSED_GLOW_FACTOR
            } else {
                alpha * (1.0 - dist / radius)
            };
            self.blend(col, row, color, a);
        }
    }

    fn gradient_line(
        &mut self,
        head: (f64, f64),
        tail: (f64, f64),
        width: f64,
        color: Rgb,
        alpha: f64,
    ) {
        let (dx, dy) = (tail.0 - head.0, tail.1 - head.1);
        let length = (dx * dx + dy * dy).sqrt();
        let step = self.pixel_width.min(self.pixel_height) * 0.5;
        let steps = (length / step).ceil().max(1.0) as usize;
        let half_width = width * 0.5;

        // Strongest alpha per pixel, so overlapping samples blend once.
        let mut coverage: HashMap<(isize, isize), f64> = HashMap::new();
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            let a = alpha * (1.0 - t);
            if a <= 0.0 {
                continue;
            }
            let (px, py) = (head.0 + dx * t, head.1 + dy * t);
            let (cells, _) = self.footprint(px, py, half_width);
            for (col, row, _) in cells {
                let entry = coverage.entry((col, row)).or_insert(0.0);
                *entry = entry.max(a);
            }
        }

        for ((col, row), a) in coverage {
            self.blend(col, row, color, a);
        }
    }
}
