//! Application configuration
//!
//! Read from `{config-dir}/wordwise/config.toml`. Every field has a default,
//! so a missing file or a missing section is not an error:
//!
//! ```toml
//! data_dir = "/home/me/.local/share/wordwise"
//!
//! [review]
//! daily_limit = 20
//!
//! [governor]
//! cooldown_secs = 900
//! max_retries = 2
//! initial_delay_ms = 5000
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Could not determine the user config directory")]
    NoConfigDir,

    #[error("Could not determine the user data directory")]
    NoDataDir,
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where items and learning records are stored
    pub data_dir: Option<PathBuf>,
    pub review: ReviewConfig,
    pub governor: GovernorConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    /// Size of the daily review slice
    pub daily_limit: usize,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self { daily_limit: 20 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GovernorConfig {
    /// Length of the shared cooldown after a quota exhaustion signal
    pub cooldown_secs: u64,
    pub max_retries: u32,
    /// First backoff delay; doubles after every failed attempt
    pub initial_delay_ms: u64,
}

impl Default for GovernorConfig {
    fn default() -> Self {
        Self {
            cooldown_secs: 15 * 60,
            max_retries: 2,
            initial_delay_ms: 5000,
        }
    }
}

impl GovernorConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }

    pub fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }
}

impl AppConfig {
    /// Default location of the config file
    pub fn default_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("wordwise").join("config.toml"))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Load from `path`, falling back to defaults if the file does not exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Configured data directory or the platform default
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => dirs::data_dir()
                .map(|dir| dir.join("wordwise"))
                .ok_or(ConfigError::NoDataDir),
        }
    }
}
