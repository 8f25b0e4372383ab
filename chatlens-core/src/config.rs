//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/chatlens/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/chatlens/` (~/.config/chatlens/)
//! - State/Logs: `$XDG_STATE_HOME/chatlens/` (~/.local/state/chatlens/)

use crate::analytics::cyclic::{WeekdayMode, DEFAULT_ORIGIN_HOUR};
use crate::analytics::gaps::DEFAULT_MIN_DISPLAY_PERCENT;
use crate::analytics::period::DEFAULT_PERIOD_DAYS;
use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Longest activity period accepted from config or the command line.
pub const MAX_PERIOD_DAYS: u32 = 365;

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Report defaults
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Defaults for report options; command-line flags override these.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Hour at which the activity day starts (0-23)
    #[serde(default = "default_origin_hour")]
    pub origin_hour: u32,

    /// Length of an activity period in days
    #[serde(default = "default_period_days")]
    pub period_days: u32,

    /// Minimum chat-wide silence worth reporting, in hours
    #[serde(default = "default_silence_threshold_hours")]
    pub silence_threshold_hours: u32,

    /// How messages are assigned to days of the week
    #[serde(default)]
    pub weekday_mode: WeekdayMode,

    /// Pause shares below this percentage display as zero
    #[serde(default = "default_min_display_percent")]
    pub min_display_percent: f64,

    /// Reports that are never run
    #[serde(default)]
    pub disabled_reports: Vec<String>,

    /// Thinnest reply edge
    #[serde(default = "default_edge_width_min")]
    pub edge_width_min: f64,

    /// Thickest reply edge
    #[serde(default = "default_edge_width_max")]
    pub edge_width_max: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            origin_hour: default_origin_hour(),
            period_days: default_period_days(),
            silence_threshold_hours: default_silence_threshold_hours(),
            weekday_mode: WeekdayMode::default(),
            min_display_percent: default_min_display_percent(),
            disabled_reports: vec![],
            edge_width_min: default_edge_width_min(),
            edge_width_max: default_edge_width_max(),
        }
    }
}

impl AnalysisConfig {
    /// Validate ranges, returning an error naming the offending key
    pub fn validate(&self) -> Result<()> {
        if self.origin_hour >= 24 {
            return Err(Error::Config(
                "analysis.origin_hour must be between 0 and 23".to_string(),
            ));
        }
        if self.period_days == 0 || self.period_days > MAX_PERIOD_DAYS {
            return Err(Error::Config(format!(
                "analysis.period_days must be between 1 and {}",
                MAX_PERIOD_DAYS
            )));
        }
        if self.silence_threshold_hours == 0 {
            return Err(Error::Config(
                "analysis.silence_threshold_hours must be at least 1".to_string(),
            ));
        }
        if !(0.0..=100.0).contains(&self.min_display_percent) {
            return Err(Error::Config(
                "analysis.min_display_percent must be between 0 and 100".to_string(),
            ));
        }
        if self.edge_width_min <= 0.0 || self.edge_width_min > self.edge_width_max {
            return Err(Error::Config(
                "analysis.edge_width_min must be positive and not above edge_width_max"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

fn default_origin_hour() -> u32 {
    DEFAULT_ORIGIN_HOUR
}

fn default_period_days() -> u32 {
    DEFAULT_PERIOD_DAYS
}

fn default_silence_threshold_hours() -> u32 {
    30
}

fn default_min_display_percent() -> f64 {
    DEFAULT_MIN_DISPLAY_PERCENT
}

fn default_edge_width_min() -> f64 {
    1.0
}

fn default_edge_width_max() -> f64 {
    5.0
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load and validate configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        config.analysis.validate()?;
        tracing::debug!(path = %path.display(), "Loaded config");

        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/chatlens/config.toml` (~/.config/chatlens/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("chatlens").join("config.toml")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/chatlens/` (~/.local/state/chatlens/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("chatlens")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/chatlens/chatlens.log` (~/.local/state/chatlens/chatlens.log)
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("chatlens.log")
    }
}
