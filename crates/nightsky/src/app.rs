//! The terminal application: frame loop, input and scrolling.

use std::io::stdout;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use nightsky_background::{FieldAnimator, Palette, PixelCanvas};
use nightsky_config::Config;
use nightsky_core::{FastRandom, RenderMode, SURFACE_HEIGHT_FACTOR, SystemClock, Viewport};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout},
    style::Stylize,
    text::Line,
};
use tracing::{debug, info, warn};

use crate::ticker::FrameTicker;

/// Rows moved per mouse wheel notch.
const WHEEL_STEP: u16 = 3;

/// Input capture held while the field is on screen.
///
/// Mouse capture is released when this is dropped, including when the
/// frame loop bails out with an error.
struct Mount;

impl Mount {
    fn acquire() -> std::io::Result<Self> {
        execute!(stdout(), EnableMouseCapture)?;
        debug!("mouse capture enabled");
        Ok(Mount)
    }
}

impl Drop for Mount {
    fn drop(&mut self) {
        if let Err(e) = execute!(stdout(), DisableMouseCapture) {
            warn!(error = %e, "failed to release mouse capture");
        }
    }
}

/// The main application which holds the state and logic of the application.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    running: bool,
    /// Is the animation paused?
    paused: bool,
    render_mode: RenderMode,
    cell_width_px: f64,
    cell_height_px: f64,
    animator: FieldAnimator<SystemClock, FastRandom>,
    canvas: PixelCanvas,
    ticker: FrameTicker,
    /// First visible cell row of the surface.
    scroll: u16,
    /// Terminal size in cells.
    cols: u16,
    rows: u16,
}

impl App {
    /// Construct a new instance of [`App`] from a validated configuration.
    pub fn new(config: &Config, seed: Option<u64>) -> color_eyre::Result<Self> {
        let palette = Palette {
            star: config.star_color()?,
            streaks: config.streak_colors()?,
        };
        let rng = match seed {
            Some(seed) => FastRandom::with_seed(seed),
            None => FastRandom::new(),
        };
        let display = &config.display;
        let animator = FieldAnimator::new(config.field, palette, SystemClock::new(), rng);
        // Two sub-pixels per cell vertically.
        let canvas = PixelCanvas::new(
            display.cell_width_px,
            display.cell_height_px / 2.0,
            config.background_color()?,
        );

        Ok(Self {
            running: false,
            paused: false,
            render_mode: display.render_mode,
            cell_width_px: display.cell_width_px,
            cell_height_px: display.cell_height_px,
            animator,
            canvas,
            ticker: FrameTicker::new(display.fps),
            scroll: 0,
            cols: 0,
            rows: 0,
        })
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        let _mount = Mount::acquire()?;
        let size = terminal.size()?;
        self.resize(size.width, size.height);

        self.running = true;
        self.animator.start();
        self.ticker.start(Instant::now());
        info!(
            cols = self.cols,
            rows = self.rows,
            interval_ms = self.ticker.interval().as_millis() as u64,
            "animation started"
        );

        while self.running {
            if self.ticker.tick(Instant::now()) {
                terminal.draw(|frame| self.render(frame))?;
            }
            self.handle_crossterm_events(self.ticker.timeout(Instant::now()))?;
        }

        self.animator.stop();
        self.ticker.stop();
        info!("animation stopped");
        Ok(())
    }

    /// Resize the surface for a terminal of `cols × rows` cells.
    fn resize(&mut self, cols: u16, rows: u16) {
        let viewport = Viewport::new(
            cols as f64 * self.cell_width_px,
            rows as f64 * self.cell_height_px,
        );
        if !self.animator.resize(viewport) {
            return;
        }
        self.canvas.resize(viewport.surface());
        if self.paused {
            self.animator.redraw(&mut self.canvas);
        }
        self.cols = cols;
        self.rows = rows;
        self.scroll = self.scroll.min(self.max_scroll());
    }

    /// Largest scroll offset that keeps a full screen of surface visible.
    fn max_scroll(&self) -> u16 {
        let surface_rows = (self.rows as f64 * SURFACE_HEIGHT_FACTOR) as u16;
        surface_rows.saturating_sub(self.rows)
    }

    fn scroll_by(&mut self, delta: i32) {
        let target = (self.scroll as i32 + delta).clamp(0, self.max_scroll() as i32);
        self.scroll = target as u16;
    }

    /// Renders the user interface.
    fn render(&mut self, frame: &mut Frame) {
        self.animator.frame(&mut self.canvas);

        let area = frame.area();
        nightsky_background::render(frame, area, &self.canvas, self.scroll, self.render_mode);

        let chunks = Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).split(area);
        let mut help = vec![
            "q".bold().cyan(),
            " quit  ".dark_gray(),
            "space".bold().cyan(),
            if self.paused {
                " resume  ".dark_gray()
            } else {
                " pause  ".dark_gray()
            },
            "m".bold().cyan(),
            " mode  ".dark_gray(),
            "↑↓".bold().cyan(),
            " scroll".dark_gray(),
        ];
        if self.paused {
            help.push("  [paused]".yellow());
        }
        frame.render_widget(Line::from(help).centered(), chunks[1]);
    }

    /// Reads the crossterm events and updates the state of [`App`].
    /// Waits at most `timeout` so the next frame is not delayed.
    fn handle_crossterm_events(&mut self, timeout: Duration) -> color_eyre::Result<()> {
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
                Event::Mouse(mouse) => self.on_mouse_event(mouse),
                Event::Resize(cols, rows) => {
                    debug!(cols, rows, "terminal resized");
                    self.resize(cols, rows);
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        let page = self.rows.max(1) as i32;
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Char(' ')) => self.toggle_pause(),
            (_, KeyCode::Char('m')) => self.render_mode = self.render_mode.toggle(),
            (_, KeyCode::Up | KeyCode::Char('k')) => self.scroll_by(-1),
            (_, KeyCode::Down | KeyCode::Char('j')) => self.scroll_by(1),
            (_, KeyCode::PageUp) => self.scroll_by(-page),
            (_, KeyCode::PageDown) => self.scroll_by(page),
            (_, KeyCode::Home) => self.scroll = 0,
            (_, KeyCode::End) => self.scroll = self.max_scroll(),
            _ => {}
        }
    }

    fn on_mouse_event(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::ScrollUp => self.scroll_by(-(WHEEL_STEP as i32)),
            MouseEventKind::ScrollDown => self.scroll_by(WHEEL_STEP as i32),
            _ => {}
        }
    }

    /// Pause by stopping the animator; resuming starts it with a fresh delta.
    fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        if self.paused {
            self.animator.stop();
        } else {
            self.animator.start();
        }
        debug!(paused = self.paused, "pause toggled");
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}
