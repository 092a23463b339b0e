//! Errors returned by the simulator facade.

use crate::config::ConfigError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchedulerError {
    /// Start request without a command.
    #[error("No command provided")]
    EmptyCommand,

    /// The configuration would make the pipeline degenerate.
    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),
}
