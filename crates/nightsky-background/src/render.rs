//! Terminal rendering of a [`PixelCanvas`].

use nightsky_core::{RenderMode, Rgb};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::canvas::PixelCanvas;
use crate::chars::{LOWER_HALF, STAR_CHARS, UPPER_HALF};
use crate::color::luminance;

/// Cells dimmer than this render as blanks in glyph mode.
const GLYPH_THRESHOLD: f64 = 0.05;

/// Render the part of `canvas` starting `scroll_rows` cells down into `area`.
pub fn render(
    frame: &mut Frame,
    area: Rect,
    canvas: &PixelCanvas,
    scroll_rows: u16,
    mode: RenderMode,
) {
    let lines = window_lines(canvas, scroll_rows, area.width, area.height, mode);
    frame.render_widget(Paragraph::new(lines), area);
}

/// Build one line per terminal row for a `width × height` cell window.
///
/// Every cell covers two canvas rows.
pub fn window_lines(
    canvas: &PixelCanvas,
    scroll_rows: u16,
    width: u16,
    height: u16,
    mode: RenderMode,
) -> Vec<Line<'static>> {
    let background = canvas.background();
    (0..height)
        .map(|y| {
            let top_row = (scroll_rows as usize + y as usize) * 2;
            let spans: Vec<Span> = (0..width)
                .map(|x| {
                    let top = canvas.pixel(x as usize, top_row);
                    let bottom = canvas.pixel(x as usize, top_row + 1);
                    match mode {
                        RenderMode::Blocks => block_span(top, bottom, background),
                        RenderMode::Glyphs => glyph_span(top, bottom),
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect()
}

fn block_span(top: Rgb, bottom: Rgb, background: Rgb) -> Span<'static> {
    match (top == background, bottom == background) {
        (true, true) => Span::raw(" "),
        (false, true) => Span::styled(UPPER_HALF, Style::new().fg(Color::from(top))),
        (true, false) => Span::styled(LOWER_HALF, Style::new().fg(Color::from(bottom))),
        (false, false) => {
            Span::styled(UPPER_HALF, Style::new().fg(Color::from(top)).bg(Color::from(bottom)))
        }
    }
}

fn glyph_span(top: Rgb, bottom: Rgb) -> Span<'static> {
    let brighter = if luminance(top) >= luminance(bottom) {
        top
    } else {
        bottom
    };
    let lum = luminance(brighter);
    if lum < GLYPH_THRESHOLD {
        return Span::raw(" ");
    }

    let scaled = (lum - GLYPH_THRESHOLD) / (1.0 - GLYPH_THRESHOLD);
    let idx = ((scaled * STAR_CHARS.len() as f64) as usize).min(STAR_CHARS.len() - 1);
    Span::styled(
        STAR_CHARS[idx].to_string(),
        Style::new().fg(Color::from(brighter)),
    )
}
