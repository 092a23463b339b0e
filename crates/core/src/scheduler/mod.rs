//! The stage scheduler.
//!
//! - [`state`]: the pure per-tick state machine
//! - [`command`]: resolving the command a run animates
//! - [`run`]: the cancellable tick task
//! - [`simulator`]: the facade hosts talk to

pub mod command;
pub mod error;
pub mod run;
pub mod simulator;
pub mod state;

pub use command::{resolve_command, CommandResult, AUTH_REQUIRED_MESSAGE};
pub use error::SchedulerError;
pub use run::RunHandle;
pub use simulator::{Simulator, StartOutcome};
pub use state::{SchedulerState, TickOutcome};
