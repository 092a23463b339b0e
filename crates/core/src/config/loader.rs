//! Configuration file loader for the `.extendipede/` directory.
//!
//! The project configuration lives in `.extendipede/config.toml`. A handful
//! of executor and logging settings can also be overridden from the
//! environment, which is how deployments tune them without editing files.

use crate::config::error::ConfigError;
use crate::config::error::ConfigResult;
use crate::config::models::AppConfig;
use crate::config::run_config::RunConfig;
use std::path::{Path, PathBuf};

/// Name of the per-project configuration directory.
pub const CONFIG_DIR: &str = ".extendipede";

/// Overrides `[executor] timeout_secs`.
pub const ENV_COMMAND_TIMEOUT: &str = "EXTENDIPEDE_COMMAND_TIMEOUT";
/// Overrides `[executor] max_command_length`.
pub const ENV_MAX_COMMAND_LENGTH: &str = "EXTENDIPEDE_MAX_COMMAND_LENGTH";
/// Overrides `[logging] level`.
pub const ENV_LOG_LEVEL: &str = "EXTENDIPEDE_LOG_LEVEL";

/// Path of the configuration file under `root`.
pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_DIR).join("config.toml")
}

/// Loads configuration from `<root>/.extendipede/config.toml`.
///
/// Missing directories or files yield the default configuration rather than
/// an error. Environment overrides are applied on top, then the simulator
/// section is validated.
///
/// # Errors
///
/// Returns `ConfigError` if:
/// - The file exists but cannot be read
/// - The file is not valid TOML or has mistyped fields
/// - An environment override is not a number where one is expected
/// - The simulator section describes a degenerate pipeline
///
/// # Example
///
/// ```rust,no_run
/// use ep_core::config::loader::load_config;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new(".")).await?;
/// println!("Tick every {} ms", config.simulator.tick_interval_ms);
/// # Ok(())
/// # }
/// ```
pub async fn load_config(root: &Path) -> ConfigResult<AppConfig> {
    load_config_with_env(root, |key| std::env::var(key).ok())
}

/// Like [`load_config`], reading overrides through `lookup` instead of the
/// process environment.
pub fn load_config_with_env<F>(root: &Path, lookup: F) -> ConfigResult<AppConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = read_config_file(&config_path(root))?;
    apply_env_overrides(&mut config, lookup)?;
    RunConfig::try_from(&config.simulator)?;
    Ok(config)
}

fn read_config_file(path: &Path) -> ConfigResult<AppConfig> {
    // If config.toml doesn't exist, return default
    if !path.exists() {
        return Ok(AppConfig::default());
    }

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
        path: path.to_path_buf(),
        source,
    })
}

fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F) -> ConfigResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup(ENV_COMMAND_TIMEOUT) {
        config.executor.timeout_secs = parse_override(ENV_COMMAND_TIMEOUT, &value)?;
    }
    if let Some(value) = lookup(ENV_MAX_COMMAND_LENGTH) {
        config.executor.max_command_length = parse_override(ENV_MAX_COMMAND_LENGTH, &value)?;
    }
    if let Some(value) = lookup(ENV_LOG_LEVEL) {
        config.logging.level = value;
    }
    Ok(())
}

fn parse_override<T: std::str::FromStr>(key: &str, value: &str) -> ConfigResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidOverride {
            key: key.to_string(),
            value: value.to_string(),
        })
}
