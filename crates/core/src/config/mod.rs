//! Configuration loading and validation.
//!
//! This module provides functionality to load `.extendipede/config.toml`
//! and to turn the simulator section into a validated [`RunConfig`].

pub mod error;
pub mod loader;
pub mod models;
pub mod run_config;

pub use error::{ConfigError, ConfigResult};
pub use models::{AppConfig, AuthSettings, ExecutorSettings, LoggingSettings};
pub use run_config::RunConfig;
