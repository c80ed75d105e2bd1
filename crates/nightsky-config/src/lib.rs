//! Configuration file handling for nightsky.
//!
//! The configuration lives in `config.toml` inside the platform config
//! directory. Every field has a default, so missing files and partial
//! files are both fine.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use nightsky_core::{FieldTuning, RenderMode, Rgb};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// File name inside the config directory.
pub const CONFIG_FILE: &str = "config.toml";

const MAX_FPS: u32 = 240;
/// Logical pixels per terminal cell.
const CELL_PX_RANGE: std::ops::RangeInclusive<f64> = 1.0..=256.0;
/// Smallest area per star; denser fields are no longer a night sky.
const MIN_DENSITY_AREA: f64 = 1.0;
const BATCH_SIZE_LIMIT: u32 = 10;

/// Errors while reading, writing or checking the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine a configuration directory")]
    NoConfigDir,
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Terminal display settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Target frames per second.
    pub fps: u32,
    pub render_mode: RenderMode,
    /// Logical pixels per terminal cell, horizontally.
    pub cell_width_px: f64,
    /// Logical pixels per terminal cell, vertically.
    pub cell_height_px: f64,
    /// Sky colour as `#rrggbb`.
    pub background: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            fps: 30,
            render_mode: RenderMode::default(),
            cell_width_px: 8.0,
            cell_height_px: 16.0,
            background: "#000000".to_string(),
        }
    }
}

/// Star and streak colours as `#rrggbb` strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    pub star: String,
    pub streaks: Vec<String>,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            star: "#ffffff".to_string(),
            streaks: vec!["#ffffff".to_string()],
        }
    }
}

/// The whole configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub display: DisplayConfig,
    pub field: FieldTuning,
    pub palette: PaletteConfig,
}

impl Config {
    /// `config.toml` in the platform config directory.
    pub fn default_path() -> Result<PathBuf> {
        ProjectDirs::from("", "", "nightsky")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Load from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path()?)
    }

    /// Load from `path`; a missing file gives the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let config: Config = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Write to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let text = toml::to_string_pretty(self)?;
        fs::write(path, text).map_err(io_err)?;
        info!(path = %path.display(), "saved config");
        Ok(())
    }

    /// Reject values the animator cannot work with.
    pub fn validate(&self) -> Result<()> {
        let display = &self.display;
        if display.fps == 0 || display.fps > MAX_FPS {
            return Err(ConfigError::Invalid(format!(
                "display.fps must be between 1 and {MAX_FPS}"
            )));
        }
        if !CELL_PX_RANGE.contains(&display.cell_width_px)
            || !CELL_PX_RANGE.contains(&display.cell_height_px)
        {
            return Err(ConfigError::Invalid(format!(
                "display cell sizes must be between {} and {} px",
                CELL_PX_RANGE.start(),
                CELL_PX_RANGE.end()
            )));
        }

        let field = &self.field;
        if !(field.star_density_area.is_finite() && field.star_density_area >= MIN_DENSITY_AREA) {
            return Err(ConfigError::Invalid(format!(
                "field.star_density_area must be at least {MIN_DENSITY_AREA}"
            )));
        }
        if !(0.0..=1.0).contains(&field.spawn_probability) {
            return Err(ConfigError::Invalid(
                "field.spawn_probability must be between 0 and 1".into(),
            ));
        }
        let timing_ok = |ms: f64| ms.is_finite() && ms >= 0.0;
        if !timing_ok(field.spawn_interval_ms) || !timing_ok(field.stagger_ms) {
            return Err(ConfigError::Invalid(
                "field timings must be finite and not negative".into(),
            ));
        }
        if field.max_batch_size == 0 || field.max_batch_size > BATCH_SIZE_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "field.max_batch_size must be between 1 and {BATCH_SIZE_LIMIT}"
            )));
        }

        self.background_color()?;
        self.star_color()?;
        self.streak_colors()?;
        Ok(())
    }

    pub fn background_color(&self) -> Result<Rgb> {
        parse_color("display.background", &self.display.background)
    }

    pub fn star_color(&self) -> Result<Rgb> {
        parse_color("palette.star", &self.palette.star)
    }

    /// Streak colours; at least one.
    pub fn streak_colors(&self) -> Result<Vec<Rgb>> {
        if self.palette.streaks.is_empty() {
            return Err(ConfigError::Invalid(
                "palette.streaks must list at least one colour".into(),
            ));
        }
        self.palette
            .streaks
            .iter()
            .map(|hex| parse_color("palette.streaks", hex))
            .collect()
    }
}

fn parse_color(field: &str, hex: &str) -> Result<Rgb> {
    Rgb::from_hex(hex)
        .ok_or_else(|| ConfigError::Invalid(format!("{field}: '{hex}' is not an RRGGBB colour")))
}
