//! File logging.
//!
//! The terminal belongs to the UI, so log output goes to a file.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use directories::ProjectDirs;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Default log file: `nightsky.log` in the local data directory.
pub fn default_log_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "nightsky").map(|dirs| dirs.data_local_dir().join("nightsky.log"))
}

/// Install a global subscriber writing to `path` (or the default log file).
///
/// Returns the file in use, or `None` when logging could not be set up.
pub fn init(path: Option<&Path>, verbose: bool) -> Option<PathBuf> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => default_log_path()?,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok()?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .ok()?;

    let log_level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .finish();

    tracing::subscriber::set_global_default(subscriber).ok()?;
    Some(path)
}
