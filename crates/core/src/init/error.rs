//! Error types for initialization operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for initialization operations.
pub type InitResult<T> = Result<T, InitError>;

/// Errors that can occur during initialization.
#[derive(Debug, Error)]
pub enum InitError {
    /// The `.extendipede` directory already exists and force flag was not set.
    #[error(".extendipede directory already exists at {0:?}. Use --force to overwrite.")]
    DirectoryExists(PathBuf),

    /// A required template file was not found in embedded assets.
    #[error("Template file not found: {0}")]
    TemplateNotFound(String),

    #[error("Failed to create directory {path:?}: {source}")]
    DirectoryCreate {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write file {path:?}: {source}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },
}
