//! Inter-process communication protocol.
//!
//! This module defines the message types for asynchronous communication
//! between a host (the terminal shell, a web front-end) and the Core
//! simulator.
//!
//! The protocol follows an Operation/Event pattern:
//! - `Op`: Commands sent from the host to Core
//! - `Event`: Status updates sent from Core to the host
//!
//! Communication is asynchronous and channel-based, so a host keeps
//! rendering while a run animates in the background.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::config_models::{SimulatorConfig, SimulatorConfigPatch};
use crate::run_models::{RunView, TickSnapshot};

/// Operations sent from the host to the Core logic.
///
/// Uses tagged enum serialization for TypeScript compatibility:
/// ```json
/// {
///   "type": "startRun",
///   "payload": { "command": "ls -la" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Op {
    /// Start animating a command through the pipeline.
    ///
    /// Ignored while a run is already in flight.
    StartRun { command: String },

    /// Cancel the active run without emitting a result.
    StopRun,

    /// Change one or more simulator options for the next run.
    UpdateConfig { patch: SimulatorConfigPatch },

    /// Log in to the authentication service.
    Login { username: String, password: String },

    /// End the current session.
    Logout,

    /// Request the current run view.
    GetStatus,

    /// Stop any active run and shut down.
    Shutdown,
}

/// Events sent from the Core logic to the host.
///
/// Uses tagged enum serialization for TypeScript compatibility:
/// ```json
/// {
///   "type": "tick",
///   "payload": {
///     "run_id": "uuid-here",
///     "snapshot": {
///       "tick": 3,
///       "elapsed_time": 0.375,
///       "signal": 0.92,
///       "cycle_count": 1,
///       "stages": [true, true, false]
///     }
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Event {
    /// A new run has started.
    RunStarted {
        #[ts(type = "string")]
        run_id: Uuid,
        command: String,
        stage_count: usize,
        started_at: DateTime<Utc>,
    },

    /// The pipeline advanced or reset.
    Tick {
        #[ts(type = "string")]
        run_id: Uuid,
        snapshot: TickSnapshot,
    },

    /// The command result arrived and is buffered until the run completes.
    CommandResolved {
        #[ts(type = "string")]
        run_id: Uuid,
        success: bool,
    },

    /// The token left the pipeline before the command result arrived.
    AwaitingResult {
        #[ts(type = "string")]
        run_id: Uuid,
    },

    /// The token left the exit stage; `result` is the final output.
    RunCompleted {
        #[ts(type = "string")]
        run_id: Uuid,
        result: String,
        success: bool,
    },

    /// The run was stopped by request.
    RunCancelled {
        #[ts(type = "string")]
        run_id: Uuid,
    },

    /// The run used up its tick budget without the token exiting.
    RunExhausted {
        #[ts(type = "string")]
        run_id: Uuid,
        ticks: u64,
    },

    /// A start request was refused.
    RunRejected { reason: String },

    /// The simulator configuration changed.
    ConfigUpdated { config: SimulatorConfig },

    /// A configuration change was refused; the previous configuration stays.
    ConfigRejected { reason: String },

    /// Outcome of a login attempt.
    LoginResult { success: bool },

    /// The session was closed; commands need a new login.
    LoggedOut,

    /// Answer to `Op::GetStatus`.
    StatusReport { view: RunView },
}
