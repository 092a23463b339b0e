//! File generation for `.extendipede` initialization.

use super::error::{InitError, InitResult};
use super::templates::get_template;
use crate::config::loader::CONFIG_DIR;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Options for initializing a `.extendipede` directory.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Project root where `.extendipede` will be created.
    pub target_dir: PathBuf,

    /// Overwrite an existing `.extendipede` directory.
    pub force: bool,
}

impl Default for InitOptions {
    fn default() -> Self {
        Self {
            target_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            force: false,
        }
    }
}

/// Write `.extendipede/config.toml` from the embedded template.
///
/// Returns the path of the written file.
///
/// # Errors
///
/// Returns `InitError` if:
/// - The `.extendipede` directory already exists and `force` is not set
/// - The template is missing from the embedded assets
/// - File system operations fail
///
/// # Example
/// ```no_run
/// use ep_core::init::{generate_project_config, InitOptions};
/// use std::path::PathBuf;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let options = InitOptions {
///     target_dir: PathBuf::from("."),
///     force: false,
/// };
///
/// let path = generate_project_config(options).await?;
/// println!("Wrote {}", path.display());
/// # Ok(())
/// # }
/// ```
pub async fn generate_project_config(options: InitOptions) -> InitResult<PathBuf> {
    let config_dir = options.target_dir.join(CONFIG_DIR);

    if config_dir.exists() && !options.force {
        return Err(InitError::DirectoryExists(config_dir));
    }

    fs::create_dir_all(&config_dir).map_err(|source| InitError::DirectoryCreate {
        path: config_dir.clone(),
        source,
    })?;

    let path = write_template_file(&config_dir, "config.toml")?;
    info!(path = %path.display(), "project configuration written");
    Ok(path)
}

fn write_template_file(config_dir: &Path, template_path: &str) -> InitResult<PathBuf> {
    let content = get_template(template_path)
        .ok_or_else(|| InitError::TemplateNotFound(template_path.to_string()))?;

    let target_path = config_dir.join(template_path);
    fs::write(&target_path, content).map_err(|source| InitError::FileWrite {
        path: target_path.clone(),
        source,
    })?;

    Ok(target_path)
}
