//! Configuration for the podplayer audio player
//!
//! Loaded from TOML. Every field has a built-in default, so a missing file
//! or a partial file is fine. See `podplayer_common::config` for how the file
//! is located.

use crate::error::{Error, Result};
use podplayer_common::config::{load_toml_or_default, resolve_config_path, CONFIG_ENV_VAR};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;

/// Top-level player configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PlayerConfig {
    /// Tab names known to the tab visibility reducer
    #[serde(default = "default_tabs")]
    pub tabs: Vec<String>,

    /// Per-observer capacity of the notification bus
    #[serde(default = "default_bus_capacity")]
    pub bus_capacity: usize,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Simulated engine settings (optional)
    #[serde(default)]
    pub engine: SimulatedEngineConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Simulated engine configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SimulatedEngineConfig {
    /// Length of the simulated media in seconds
    #[serde(default = "default_duration_secs")]
    pub duration_secs: f64,

    /// Interval between playtime updates while playing
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

fn default_tabs() -> Vec<String> {
    ["chapters", "audio", "share"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_bus_capacity() -> usize {
    1000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_duration_secs() -> f64 {
    60.0
}

fn default_tick_ms() -> u64 {
    250
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            tabs: default_tabs(),
            bus_capacity: default_bus_capacity(),
            logging: LoggingConfig::default(),
            engine: SimulatedEngineConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for SimulatedEngineConfig {
    fn default() -> Self {
        Self {
            duration_secs: default_duration_secs(),
            tick_ms: default_tick_ms(),
        }
    }
}

impl PlayerConfig {
    /// Locate and load the configuration
    ///
    /// Priority: `cli_path`, then `PODPLAYER_CONFIG`, then the platform config
    /// directory, then built-in defaults.
    pub fn load(cli_path: Option<&Path>) -> Result<Self> {
        let source = resolve_config_path(cli_path, CONFIG_ENV_VAR, "podplayer");
        let config: PlayerConfig = load_toml_or_default(source.as_ref())?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the player cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.tabs.is_empty() {
            return Err(Error::Config("at least one tab name is required".to_string()));
        }

        let mut seen = BTreeSet::new();
        for name in &self.tabs {
            if name.trim().is_empty() {
                return Err(Error::Config("tab names must not be empty".to_string()));
            }
            if !seen.insert(name.as_str()) {
                return Err(Error::Config(format!("duplicate tab name: {}", name)));
            }
        }

        if self.bus_capacity == 0 {
            return Err(Error::Config("bus_capacity must be positive".to_string()));
        }

        if !self.engine.duration_secs.is_finite() || self.engine.duration_secs < 0.0 {
            return Err(Error::Config(format!(
                "engine.duration_secs must be a non-negative number, got {}",
                self.engine.duration_secs
            )));
        }

        Ok(())
    }
}
