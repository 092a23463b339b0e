//! Runtime run-state models.
//!
//! This module defines the read-only data the simulator exposes to
//! presentation layers: the lifecycle status of the current run and a
//! snapshot of the pipeline after every tick.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Lifecycle status of the simulator.
///
/// Normal progression: Idle -> Running -> Completed. A stop request returns a
/// running simulator to Idle, as does a run that exhausts its tick budget.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    /// No run is active.
    #[default]
    Idle,

    /// A run is animating the pipeline.
    Running,

    /// The token left the exit stage and the command result was emitted.
    Completed,
}

/// The pipeline as it stands after one tick.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
pub struct TickSnapshot {
    /// Number of ticks evaluated so far in this run (1 after the first tick).
    pub tick: u64,

    /// Simulated time of the next tick. The tick that lights the exit stage
    /// leaves it at the time that tick was evaluated at.
    pub elapsed_time: f64,

    /// Oscillator value this tick was decided on.
    pub signal: f64,

    /// Number of non-positive ticks (pipeline resets) so far.
    pub cycle_count: u64,

    /// Stage activation flags, entry stage first.
    pub stages: Vec<bool>,
}

impl TickSnapshot {
    /// Whether the exit stage is lit.
    pub fn exit_active(&self) -> bool {
        self.stages.last().copied().unwrap_or(false)
    }
}

/// Everything a host can observe about the simulator at a point in time.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default, TS)]
pub struct RunView {
    /// Identifier of the current or most recent run.
    #[ts(type = "string | null")]
    pub run_id: Option<Uuid>,

    pub status: RunStatus,

    /// Command text of the current or most recent run.
    pub command: Option<String>,

    /// Latest tick snapshot, if the run has ticked at least once.
    pub snapshot: Option<TickSnapshot>,

    /// Emitted command result. Only set once the run has completed.
    pub result: Option<String>,
}

impl RunView {
    /// The view of a simulator with no run.
    pub fn idle() -> Self {
        Self::default()
    }

    /// The view of a freshly started run.
    pub fn running(run_id: Uuid, command: String, snapshot: Option<TickSnapshot>) -> Self {
        Self {
            run_id: Some(run_id),
            status: RunStatus::Running,
            command: Some(command),
            snapshot,
            result: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.status == RunStatus::Running
    }
}
