//! Tempo Configuration Management
//!
//! This module provides configuration management using the confy crate.
//! The config file is located at the platform configuration directory, e.g.:
//! - `~/.config/tempo/tempo.toml`
//!
//! The task and focus-session snapshot defaults to `tempo.json` next to it.

use miette::{Context, IntoDiagnostic, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const APP_NAME: &str = "tempo";
const CONFIG_NAME: &str = "tempo";
const DATA_FILE: &str = "tempo.json";

/// Main configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Snapshot file for tasks and sessions (defaults beside the config file)
    #[serde(default)]
    data_file: Option<PathBuf>,
    /// Default tracing filter directive
    #[serde(default = "default_log_level")]
    log_level: String,
    #[serde(default)]
    pub focus: FocusDefaults,
}

/// Focus session defaults used when `/focus start` omits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusDefaults {
    /// Session length in minutes
    pub duration: u32,
    /// Break length in minutes
    pub break_time: u32,
}

impl Default for FocusDefaults {
    fn default() -> Self {
        Self {
            duration: 25,
            break_time: 5,
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Default configuration.
impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: None,
            log_level: default_log_level(),
            focus: FocusDefaults::default(),
        }
    }
}

/// Configuration implementation.
impl Config {
    /// Loads the Tempo configuration from disk
    ///
    /// If the config file doesn't exist, it will be created with default values.
    pub fn load() -> Result<Config> {
        confy::load(APP_NAME, CONFIG_NAME)
            .into_diagnostic()
            .context("Failed to load Tempo configuration")
    }

    /// Saves the Tempo configuration to disk
    pub fn save(&self) -> Result<()> {
        confy::store(APP_NAME, CONFIG_NAME, self)
            .into_diagnostic()
            .context("Failed to save Tempo configuration")
    }

    /// Location of the configuration file.
    pub fn path() -> Result<PathBuf> {
        confy::get_configuration_file_path(APP_NAME, CONFIG_NAME)
            .into_diagnostic()
            .context("Failed to resolve Tempo configuration path")
    }

    /// Gets the snapshot file path.
    ///
    /// # Returns
    ///
    /// - `Result<PathBuf>` - The configured data file, or `tempo.json` in the
    ///   configuration directory when none is set
    pub fn data_file(&self) -> Result<PathBuf> {
        if let Some(path) = &self.data_file {
            return Ok(path.clone());
        }

        let config_path = Self::path()?;
        Ok(config_path
            .parent()
            .map(|dir| dir.join(DATA_FILE))
            .unwrap_or_else(|| PathBuf::from(DATA_FILE)))
    }

    /// Sets the snapshot file path and saves the configuration.
    pub fn set_data_file(&mut self, path: Option<PathBuf>) -> Result<()> {
        self.data_file = path;
        self.save()
    }

    /// Gets the default log filter
    pub fn log_level(&self) -> &str {
        &self.log_level
    }

    /// Sets the default log filter and saves the configuration.
    pub fn set_log_level(&mut self, level: impl Into<String>) -> Result<()> {
        self.log_level = level.into();
        self.save()
    }
}
