//! Core error types for timecalc-core.
//!
//! Every failure the engine can hit is recoverable: a bad interval halts a
//! recompute, a missing countdown target leaves the controller idle. None of
//! these errors leave partial state behind.

use std::path::PathBuf;
use thiserror::Error;

/// Reasons a piece of interval text is rejected.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalParseError {
    /// Text contains something other than ASCII digits
    #[error("interval must contain digits only")]
    NotNumeric,

    /// More than three digits
    #[error("interval has {digits} digits; use MM or HMM")]
    TooManyDigits { digits: usize },

    /// HMM form with hours or minutes out of range
    #[error("{hours} hr {minutes} min is out of range for HMM")]
    OutOfRange { hours: u32, minutes: u32 },
}

/// Errors raised by the schedule engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// Interval text at `position` could not be parsed
    #[error("Invalid input in Interval {position}: {source}")]
    InvalidInterval {
        position: usize,
        #[source]
        source: IntervalParseError,
    },

    /// Edit addressed to a slot that does not exist
    #[error("Interval {position} does not exist (have {len})")]
    NoSuchInterval { position: usize, len: usize },
}

impl ScheduleError {
    /// 1-based position of the offending interval.
    pub fn position(&self) -> usize {
        match self {
            ScheduleError::InvalidInterval { position, .. } => *position,
            ScheduleError::NoSuchInterval { position, .. } => *position,
        }
    }
}

/// Errors raised by the countdown controller.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownError {
    /// Interval #1 is empty or invalid
    #[error("Nothing to count down")]
    NoActiveInterval,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration tree
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// Could not locate or create the data directory
    #[error("Failed to access data directory: {0}")]
    DataDir(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}
