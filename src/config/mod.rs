//! Configuration module for picolog
//!
//! This module handles the host tool's persistent configuration:
//! - Serial port parameters for the line transport
//! - Dump file location and dump/parse behaviour
//! - Averaging factor and axis ticks for the plot
//!
//! # Config Location
//!
//! The configuration file is stored in the platform-appropriate location:
//! - **Linux**: `~/.config/picolog/picolog.toml`
//! - **macOS**: `~/Library/Application Support/picolog/picolog.toml`
//! - **Windows**: `%APPDATA%\picolog\picolog.toml`
//!
//! # Example
//!
//! ```ignore
//! use picolog::config::AppConfig;
//!
//! let mut config = AppConfig::load_or_default(None);
//! config.plot.averaging_factor = 20;
//! config.save(&picolog::config::default_config_path().unwrap())?;
//! ```

pub mod settings;

pub use settings::*;

use crate::error::{PicoLogError, Result};
use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application identifier for config directories
pub const APP_ID: &str = "picolog";

/// Config filename
pub const CONFIG_FILE: &str = "picolog.toml";

/// Default serial port of the logger
#[cfg(windows)]
pub const DEFAULT_PORT: &str = "COM9";
#[cfg(not(windows))]
pub const DEFAULT_PORT: &str = "/dev/ttyACM0";

/// Default baud rate of the logger's USB serial
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Default per-line read timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 1000;

/// Default dump file name
pub const DEFAULT_DUMP_FILE: &str = "dumpfile.dat";

/// Default number of raw samples averaged into one plot point
pub const DEFAULT_AVERAGING_FACTOR: usize = 10;

/// Default spacing of x-axis ticks in hours
pub const DEFAULT_XTICK_HOURS: f64 = 2.0;

/// Default x-axis tick label format
pub const DEFAULT_XTICK_FORMAT: &str = "%H:%M:%S";

// ==================== Config Directory ====================

/// Get the configuration directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs_next::config_dir().map(|p| p.join(APP_ID))
}

/// Get the path to the default config file
pub fn default_config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join(CONFIG_FILE))
}

// ==================== Sections ====================

/// Serial port configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    /// Port name (e.g. `COM9`, `/dev/ttyACM0`)
    pub port: String,
    /// Baud rate
    pub baud_rate: u32,
    /// Bound on waiting for one line, in milliseconds
    pub timeout_ms: u64,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT.to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl SerialConfig {
    /// The read timeout as a Duration
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_ms)
    }
}

/// Dump file configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DumpConfig {
    /// Where dumps are written and read back from
    pub path: PathBuf,
    /// Treat an idle line after data as the end of the data block
    ///
    /// Needed for firmware that does not send the blank terminator line.
    pub idle_ends_block: bool,
    /// Reject dump files whose trailer word count disagrees with their data
    pub strict_word_count: bool,
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_DUMP_FILE),
            idle_ends_block: false,
            strict_word_count: false,
        }
    }
}

/// Plot configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Raw samples per averaged point
    pub averaging_factor: usize,
    /// Distance between x-axis ticks in hours
    pub xtick_hours: f64,
    /// strftime format of x-axis tick labels
    pub xtick_format: String,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            averaging_factor: DEFAULT_AVERAGING_FACTOR,
            xtick_hours: DEFAULT_XTICK_HOURS,
            xtick_format: DEFAULT_XTICK_FORMAT.to_string(),
        }
    }
}

// ==================== App Config ====================

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Serial port settings
    pub serial: SerialConfig,
    /// Dump file settings
    pub dump: DumpConfig,
    /// Plot settings
    pub plot: PlotConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            PicoLogError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let config: AppConfig = toml::from_str(&content).map_err(|e| {
            PicoLogError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration, returning defaults on any error
    ///
    /// With no explicit path the platform default location is used. A missing
    /// file is not worth a warning; an unreadable one is.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match default_config_path() {
                Some(p) => p,
                None => return Self::default(),
            },
        };

        if !path.exists() {
            tracing::debug!("No config at {:?}, using defaults", path);
            return Self::default();
        }

        Self::load(&path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Save configuration as TOML, creating parent directories
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                std::fs::create_dir_all(dir).map_err(|e| {
                    PicoLogError::Config(format!("Failed to create config directory: {}", e))
                })?;
            }
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| PicoLogError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| PicoLogError::Config(format!("Failed to write config: {}", e)))
    }

    /// Check values that would make later operations meaningless
    pub fn validate(&self) -> Result<()> {
        if self.plot.averaging_factor == 0 {
            return Err(PicoLogError::Config(
                "plot.averaging_factor must be at least 1".to_string(),
            ));
        }
        if self.serial.timeout_ms == 0 {
            return Err(PicoLogError::Config(
                "serial.timeout_ms must be greater than 0".to_string(),
            ));
        }
        if self.serial.baud_rate == 0 {
            return Err(PicoLogError::Config(
                "serial.baud_rate must be greater than 0".to_string(),
            ));
        }
        if self.plot.xtick_hours <= 0.0 || !self.plot.xtick_hours.is_finite() {
            return Err(PicoLogError::Config(
                "plot.xtick_hours must be a positive number".to_string(),
            ));
        }
        if StrftimeItems::new(&self.plot.xtick_format).any(|item| matches!(item, Item::Error)) {
            return Err(PicoLogError::Config(format!(
                "plot.xtick_format {:?} is not a valid strftime pattern",
                self.plot.xtick_format
            )));
        }
        Ok(())
    }
}
