//! Domain error types

use thiserror::Error;

/// Error when parsing a duration string
#[derive(Debug, Clone, Error)]
#[error("Invalid duration format: \"{input}\". Expected format: <number>s, <number>m, or <number>m<number>s (e.g., 11s, 1m, 1m30s)")]
pub struct DurationParseError {
    pub input: String,
}

/// Error when an unknown audio format is requested
#[derive(Debug, Clone, Error)]
#[error("Invalid audio format: \"{input}\". Valid formats are: wav, flac")]
pub struct InvalidFormatError {
    pub input: String,
}

/// Error when duration limits contradict each other
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    #[error("Minimum duration ({min}s) must be less than maximum duration ({max}s)")]
    MinNotBelowMax { min: u32, max: u32 },

    #[error("Maximum duration must be at least 1s")]
    ZeroMax,

    #[error("Countdown window ({window}s) must not exceed maximum duration ({max}s)")]
    WindowTooLarge { window: u32, max: u32 },
}

/// Error when configuration fails
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Invalid config value for '{key}': {message}")]
    ValidationError { key: String, message: String },

    #[error("Config file already exists at: {0}")]
    AlreadyExists(String),

    #[error(transparent)]
    Policy(#[from] PolicyError),
}
