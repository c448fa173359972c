//! TOML-based application configuration.
//!
//! Stores:
//! - Cutoff thresholds (name and time of day)
//! - Countdown behaviour (cascade through the list, tick resolution)
//! - Wall-clock refresh period
//!
//! Configuration is stored at `~/.config/timecalc/config.toml`, or wherever
//! `TIMECALC_CONFIG` points. Interval lists themselves are never persisted.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::data_dir;
use crate::cutoff::{CutoffEvaluator, CutoffThreshold};
use crate::error::ConfigError;

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV: &str = "TIMECALC_CONFIG";

/// Countdown configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownConfig {
    /// Move on to the next interval when one expires.
    #[serde(default = "default_true")]
    pub auto_cascade: bool,
    #[serde(default = "default_tick_secs")]
    pub tick_secs: u64,
}

/// Wall-clock display configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockConfig {
    #[serde(default = "default_refresh_secs")]
    pub refresh_secs: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/timecalc/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub countdown: CountdownConfig,
    #[serde(default)]
    pub clock: ClockConfig,
    #[serde(default = "CutoffThreshold::defaults")]
    pub cutoffs: Vec<CutoffThreshold>,
}

// Default functions
fn default_true() -> bool {
    true
}
fn default_tick_secs() -> u64 {
    1
}
fn default_refresh_secs() -> u64 {
    60
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            auto_cascade: true,
            tick_secs: default_tick_secs(),
        }
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            refresh_secs: default_refresh_secs(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            countdown: CountdownConfig::default(),
            clock: ClockConfig::default(),
            cutoffs: CutoffThreshold::defaults(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = match current {
                serde_json::Value::Array(items) => items.get(part.parse::<usize>().ok()?)?,
                other => other.get(part)?,
            };
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() || key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let slot = match current {
                serde_json::Value::Array(items) => part
                    .parse::<usize>()
                    .ok()
                    .and_then(|i| items.get_mut(i))
                    .ok_or_else(unknown)?,
                serde_json::Value::Object(obj) => obj.get_mut(part).ok_or_else(unknown)?,
                _ => return Err(unknown()),
            };

            if parts.peek().is_none() {
                let new_value = match &*slot {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => serde_json::Value::Number(
                        value
                            .parse::<u64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?
                            .into(),
                    ),
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };
                *slot = new_value;
                return Ok(());
            }
            current = slot;
        }

        Err(unknown())
    }

    /// Config file location: `TIMECALC_CONFIG` if set, else the data dir.
    pub fn path() -> Result<PathBuf, ConfigError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Ok(PathBuf::from(path)),
            None => Ok(data_dir()?.join("config.toml")),
        }
    }

    /// Read a config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let cfg: Config = toml::from_str(&content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Write a config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Load from disk, writing the defaults if no file exists yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if !path.exists() {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            return Ok(cfg);
        }
        Self::load_from(&path)
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            warn!(error = %e, "using default configuration");
            Self::default()
        })
    }

    /// Get a config value as string by dot-separated key.
    ///
    /// List entries are addressed by index, e.g. `cutoffs.0.time_of_day`.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key in memory.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed
    /// into the key's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.countdown.tick_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "countdown.tick_secs".into(),
                message: "must be at least 1".into(),
            });
        }
        if self.clock.refresh_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "clock.refresh_secs".into(),
                message: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    pub fn cutoff_evaluator(&self) -> CutoffEvaluator {
        CutoffEvaluator::new(self.cutoffs.clone())
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_secs(self.countdown.tick_secs)
    }

    pub fn clock_period(&self) -> Duration {
        Duration::from_secs(self.clock.refresh_secs)
    }
}
