//! File logging.
//!
//! The terminal belongs to the animation, so logs only ever go to a file.

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use color_eyre::eyre::{WrapErr, eyre};
use nebula_config::Config;
use tracing_subscriber::EnvFilter;

/// Log file name inside the data directory.
const LOG_FILE: &str = "nebula.log";

/// Install the tracing subscriber if file logging is enabled.
///
/// Returns the log file path when logging was set up.
pub fn init(config: &Config) -> color_eyre::Result<Option<PathBuf>> {
    if !config.log_to_file {
        return Ok(None);
    }
    let Some(dirs) = Config::project_dirs() else {
        return Ok(None);
    };

    let dir = dirs.data_dir();
    fs::create_dir_all(dir)
        .wrap_err_with(|| format!("failed to create log directory {}", dir.display()))?;
    let path = dir.join(LOG_FILE);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .wrap_err_with(|| format!("failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter(&config.log_level))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| eyre!(err))?;

    Ok(Some(path))
}

/// `RUST_LOG` if set, otherwise the configured directive.
fn filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}
