//! Error types for configuration loading and validation.
//!
//! This module defines all errors that can occur while reading
//! `.extendipede/config.toml` and while checking simulator settings before a
//! run is allowed to start.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read a configuration file from disk.
    #[error("Failed to read config file at {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to parse TOML configuration.
    #[error("Failed to parse TOML file at {path}: {source}")]
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A simulator setting would make the pipeline degenerate.
    #[error("Invalid simulator setting `{field}`: {reason}")]
    InvalidSimulator { field: &'static str, reason: String },

    /// An environment override could not be parsed.
    #[error("Invalid value {value:?} for environment override {key}")]
    InvalidOverride { key: String, value: String },
}

/// Type alias for Result with ConfigError.
pub type ConfigResult<T> = Result<T, ConfigError>;
