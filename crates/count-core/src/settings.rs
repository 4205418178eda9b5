//! Persistent user settings for count
//!
//! Settings are stored in a TOML configuration file at:
//! - Linux/macOS: `~/.config/count/count_config.toml`
//! - Windows: `%APPDATA%\count\count_config.toml`
//!
//! Command-line flags override anything set here.
//!
//! # Example Configuration
//!
//! ```toml
//! [io]
//! input_block = "64K"
//! output_block = "0"
//!
//! [display]
//! current = true
//! final_status = "success"
//! quiet = false
//! interval_ms = 1000
//! ```

use crate::config::{FinalStatus, MAX_BLOCK_SIZE};
use crate::error::Result;
use crate::size::parse_bounded_size;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration file name
const CONFIG_FILE_NAME: &str = "count_config.toml";

/// Application name for config directory
const APP_NAME: &str = "count";

/// User settings loaded from configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Read and write sizes
    pub io: IoSettings,

    /// Status line settings
    pub display: DisplaySettings,
}

/// Settings for input and output sizes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IoSettings {
    /// Default input block size (e.g., "64K"); "0" derives it from the mode
    pub input_block: String,

    /// Default output block size; "0" derives it from the mode
    pub output_block: String,
}

/// Settings for the status line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplaySettings {
    /// Show current rates by default
    pub current: bool,

    /// Final status policy (never, success, always)
    pub final_status: String,

    /// Suppress the status line by default
    pub quiet: bool,

    /// Milliseconds between status updates
    pub interval_ms: u64,
}

impl Default for IoSettings {
    fn default() -> Self {
        Self {
            input_block: "0".to_string(),
            output_block: "0".to_string(),
        }
    }
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            current: false,
            final_status: FinalStatus::Never.to_string(),
            quiet: false,
            interval_ms: 1000,
        }
    }
}

impl IoSettings {
    /// Parsed input block size
    pub fn input_block_size(&self) -> Result<usize> {
        parse_block(&self.input_block)
    }

    /// Parsed output block size
    pub fn output_block_size(&self) -> Result<usize> {
        parse_block(&self.output_block)
    }
}

impl DisplaySettings {
    /// Parsed final status policy
    pub fn final_status(&self) -> Result<FinalStatus> {
        self.final_status.parse()
    }

    /// Status update interval
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

fn parse_block(s: &str) -> Result<usize> {
    // Bounded by MAX_BLOCK_SIZE, which fits in usize
    parse_bounded_size(s, MAX_BLOCK_SIZE as u64).map(|n| n as usize)
}

impl Settings {
    /// Load settings from a specific path
    ///
    /// Returns default settings if the file doesn't exist or can't be parsed
    pub fn load_from_path(path: Option<PathBuf>) -> Self {
        match Self::read_from_path(path) {
            Ok(settings) => settings.unwrap_or_default(),
            Err(e) => {
                tracing::warn!("{}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Read settings from a specific path without falling back
    ///
    /// `Ok(None)` means there is no path or no file at it.
    pub fn read_from_path(
        path: Option<PathBuf>,
    ) -> std::result::Result<Option<Self>, SettingsError> {
        let Some(path) = path else {
            tracing::debug!("No config path available, using defaults");
            return Ok(None);
        };

        if !path.exists() {
            tracing::debug!("Config file not found at {:?}, using defaults", path);
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path).map_err(|e| SettingsError::Io {
            path: path.clone(),
            source: e,
        })?;
        let settings = toml::from_str(&contents).map_err(|e| SettingsError::Parse {
            path: path.clone(),
            source: e,
        })?;
        tracing::debug!("Loaded settings from {:?}", path);
        Ok(Some(settings))
    }

    /// Save settings to a specific path
    pub fn save_to_path(&self, path: Option<PathBuf>) -> std::result::Result<PathBuf, SettingsError> {
        let path = path.ok_or(SettingsError::NoConfigDir)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| SettingsError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let contents = self.to_toml()?;

        std::fs::write(&path, contents).map_err(|e| SettingsError::Io {
            path: path.clone(),
            source: e,
        })?;

        tracing::info!("Saved settings to {:?}", path);
        Ok(path)
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Option<PathBuf> {
        dirs_next::config_dir().map(|p| p.join(APP_NAME).join(CONFIG_FILE_NAME))
    }

    /// Serialize these settings as TOML
    pub fn to_toml(&self) -> std::result::Result<String, SettingsError> {
        toml::to_string_pretty(self).map_err(SettingsError::Serialize)
    }
}

/// Errors that can occur when working with settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// No configuration directory available
    #[error("Could not determine configuration directory")]
    NoConfigDir,

    /// Failed to read or write config file
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path that caused the error
        path: PathBuf,
        /// The underlying error
        source: std::io::Error,
    },

    /// Config file is not valid TOML for these settings
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        /// Path of the config file
        path: PathBuf,
        /// The underlying error
        source: toml::de::Error,
    },

    /// Failed to serialize settings
    #[error("Failed to serialize settings: {0}")]
    Serialize(toml::ser::Error),
}
