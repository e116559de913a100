//! Configuration management for nebula.
//!
//! Settings live in `config.toml` under the platform config directory. Every
//! field has a default, so a partial file is fine and a missing file means
//! "use defaults".

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use nebula_core::AnimationSpeed;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lowest and highest accepted redraw rate.
const MIN_FPS: u16 = 1;
const MAX_FPS: u16 = 120;

/// Errors raised while reading or writing the config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine a config directory for this platform")]
    NoConfigDir,
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// User configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Animation speed.
    pub speed: AnimationSpeed,
    /// Redraw rate in frames per second.
    pub fps: u16,
    /// Fixed seed for the random generators. `None` seeds from the clock.
    pub seed: Option<u64>,
    /// Draw the node graph and starfield.
    pub show_graph: bool,
    /// Draw the rising particle overlay.
    pub show_particles: bool,
    /// Logical pixels per terminal cell, horizontally.
    pub cell_width: f32,
    /// Logical pixels per terminal cell, vertically.
    pub cell_height: f32,
    /// Tracing filter directive. `RUST_LOG` takes precedence.
    pub log_level: String,
    /// Write logs to `nebula.log` in the data directory.
    pub log_to_file: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            speed: AnimationSpeed::default(),
            fps: 30,
            seed: None,
            show_graph: true,
            show_particles: true,
            cell_width: 8.0,
            cell_height: 16.0,
            log_level: "info".to_string(),
            log_to_file: false,
        }
    }
}

impl Config {
    /// Platform directories for nebula.
    pub fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "nebula")
    }

    /// Path of the config file.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Self::project_dirs()
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Load from the default location. A missing file yields defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(config.sanitized())
    }

    /// Save to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Save to an explicit path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Time between redraws.
    pub fn frame_interval(&self) -> Duration {
        let fps = self.fps.clamp(MIN_FPS, MAX_FPS);
        Duration::from_micros(1_000_000 / fps as u64)
    }

    /// Replace out-of-range values with usable ones.
    fn sanitized(mut self) -> Self {
        self.fps = self.fps.clamp(MIN_FPS, MAX_FPS);
        let defaults = Self::default();
        if !(self.cell_width.is_finite() && self.cell_width > 0.0) {
            self.cell_width = defaults.cell_width;
        }
        if !(self.cell_height.is_finite() && self.cell_height > 0.0) {
            self.cell_height = defaults.cell_height;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.speed, AnimationSpeed::Medium);
        assert_eq!(config.fps, 30);
        assert!(config.seed.is_none());
        assert!(config.show_graph && config.show_particles);
        assert_eq!(config.frame_interval(), Duration::from_micros(33_333));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "speed = \"fast\"\nseed = 42\nfps = 500\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.speed, AnimationSpeed::Fast);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.fps, 120);
        assert_eq!(config.cell_width, 8.0);
    }

    #[test]
    fn test_invalid_cell_size_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "cell_width = 0.0\ncell_height = -3.0\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.cell_width, 8.0);
        assert_eq!(config.cell_height, 16.0);
    }

    #[test]
    fn test_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "speed = \"warp\"\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config {
            speed: AnimationSpeed::Slow,
            seed: Some(7),
            show_particles: false,
            ..Default::default()
        };

        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }
}
