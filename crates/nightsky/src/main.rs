//! nightsky - an animated night sky with shooting stars for your terminal.

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::Parser;
use nightsky_config::{Config, ConfigError};
use nightsky_core::RenderMode;
use tracing::{info, warn};

mod app;
mod logging;
mod ticker;

use app::App;

/// An animated night sky with shooting stars.
#[derive(Debug, Parser)]
#[command(name = "nightsky")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file (defaults to the platform config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Frames per second
    #[arg(long)]
    fps: Option<u32>,

    /// Seed for a reproducible sky
    #[arg(long)]
    seed: Option<u64>,

    /// Render mode: blocks or glyphs
    #[arg(short, long)]
    mode: Option<RenderMode>,

    /// Log file (defaults to nightsky.log in the local data directory)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Write the effective configuration to the config file and exit
    #[arg(long)]
    write_config: bool,
}

impl Cli {
    /// Load the configuration and apply command-line overrides.
    fn config(&self) -> color_eyre::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => match Config::load() {
                Ok(config) => config,
                Err(ConfigError::NoConfigDir) => {
                    warn!("no configuration directory, using defaults");
                    Config::default()
                }
                Err(e) => return Err(e.into()),
            },
        };

        if let Some(fps) = self.fps {
            config.display.fps = fps;
        }
        if let Some(mode) = self.mode {
            config.display.render_mode = mode;
        }
        config.validate()?;
        Ok(config)
    }

    fn config_path(&self) -> color_eyre::Result<PathBuf> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => Ok(Config::default_path()?),
        }
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    if let Some(path) = logging::init(cli.log_file.as_deref(), cli.verbose) {
        info!(path = %path.display(), "logging initialized");
    }

    let config = cli.config()?;

    if cli.write_config {
        let path = cli.config_path()?;
        config.save_to(&path)?;
        println!("wrote {}", path.display());
        return Ok(());
    }

    match mount(&config, cli.seed, std::io::stdout().is_terminal())? {
        Mounted::Placeholder => {
            println!();
            Ok(())
        }
        Mounted::Field(app) => {
            let terminal = ratatui::init();
            let result = app.run(terminal);
            ratatui::restore();
            info!("terminal restored");
            result
        }
    }
}

/// What gets shown on stdout.
enum Mounted {
    /// Nothing to draw on: an empty line and a quiet exit.
    Placeholder,
    Field(App),
}

fn mount(config: &Config, seed: Option<u64>, is_terminal: bool) -> color_eyre::Result<Mounted> {
    if !is_terminal {
        info!("stdout is not a terminal, animation disabled");
        return Ok(Mounted::Placeholder);
    }
    Ok(Mounted::Field(App::new(config, seed)?))
}
