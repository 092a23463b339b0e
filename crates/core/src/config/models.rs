//! Configuration models that aggregate all settings.
//!
//! This module provides the unified `AppConfig` structure that combines the
//! simulator, executor, authentication and logging sections of
//! `.extendipede/config.toml` into a single configuration object.

use ep_protocol::config_models::SimulatorConfig;
use serde::Deserialize;
use std::time::Duration;

/// Commands the local executor runs when no allow-list is configured.
pub const DEFAULT_ALLOWED_COMMANDS: &[&str] = &[
    "ls", "pwd", "date", "whoami", "echo", "cat", "head", "tail", "grep", "find", "ps", "df",
    "free", "uname", "uptime", "env", "which", "whereis", "file", "wc", "sort", "uniq", "cut",
    "awk", "sed", "tr", "git", "python3", "node", "ping", "curl",
];

/// Unified application configuration loaded from `.extendipede/config.toml`.
///
/// # Example
///
/// ```rust,no_run
/// use ep_core::config::loader::load_config;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new(".")).await?;
/// println!("{} stages at {} Hz",
///          config.simulator.stage_count,
///          config.simulator.frequency);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// `[simulator]`: pipeline and oscillator settings.
    #[serde(default)]
    pub simulator: SimulatorConfig,

    /// `[executor]`: how the local command executor runs commands.
    #[serde(default)]
    pub executor: ExecutorSettings,

    /// `[auth]`: credentials for the session authenticator. Absent means
    /// every run is allowed.
    #[serde(default)]
    pub auth: Option<AuthSettings>,

    /// `[logging]`: log verbosity.
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Settings for the local command executor.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExecutorSettings {
    /// Seconds a command may run before it is killed.
    pub timeout_secs: u64,

    /// Longest accepted command line, in characters.
    pub max_command_length: usize,

    /// Program names that may be executed.
    pub allowed_commands: Vec<String>,
}

impl ExecutorSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ExecutorSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_command_length: 1000,
            allowed_commands: DEFAULT_ALLOWED_COMMANDS
                .iter()
                .map(|name| (*name).to_string())
                .collect(),
        }
    }
}

/// Credentials accepted by the session authenticator.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct AuthSettings {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSettings")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default `tracing` filter directive, e.g. `info` or `ep_core=debug`.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
