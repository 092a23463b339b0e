//! Simulator configuration models.
//!
//! These are the options a host can change at runtime. Each is independently
//! mutable and takes effect on the next run start; a run in flight keeps the
//! configuration it was started with.

use serde::Deserialize;
use serde::Serialize;
use ts_rs::TS;

/// Default number of pipeline stages.
pub const DEFAULT_STAGE_COUNT: usize = 100;
/// Largest pipeline a run may be built with.
pub const MAX_STAGE_COUNT: usize = 10_000;
/// Default oscillator frequency in cycles per time unit.
pub const DEFAULT_FREQUENCY: f64 = 60.0;
/// Default number of ticks per oscillator period.
pub const DEFAULT_STEPS_PER_CYCLE: u32 = 40;
/// Default wall-clock delay between ticks.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 50;

/// Settings for the stage-advance simulator.
///
/// Serialized with camelCase keys (`stageCount`, `tickIntervalMs`, ...) for
/// web clients. The snake_case spelling is accepted as well so the same type
/// can be read from `config.toml`.
///
/// # Example
///
/// ```toml
/// # .extendipede/config.toml
/// [simulator]
/// stage_count = 12
/// frequency = 2.0
/// steps_per_cycle = 40
/// tick_interval_ms = 50
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
pub struct SimulatorConfig {
    /// Number of pipeline stages. Index 0 is the entry stage, the last index
    /// is the exit stage.
    #[serde(default = "default_stage_count", alias = "stage_count")]
    pub stage_count: usize,

    /// Oscillator frequency in cycles per time unit.
    #[serde(default = "default_frequency")]
    pub frequency: f64,

    /// Ticks per oscillator period. Together with `frequency` this fixes the
    /// simulated time step `dt = 1 / (frequency * steps_per_cycle)`.
    #[serde(default = "default_steps_per_cycle", alias = "steps_per_cycle")]
    pub steps_per_cycle: u32,

    /// Wall-clock delay between two ticks, in milliseconds.
    #[serde(default = "default_tick_interval_ms", alias = "tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Upper bound on evaluated ticks before a run gives up.
    ///
    /// `None` lets a run animate until the token exits or the run is stopped.
    #[serde(default, alias = "max_ticks", skip_serializing_if = "Option::is_none")]
    pub max_ticks: Option<u64>,
}

fn default_stage_count() -> usize {
    DEFAULT_STAGE_COUNT
}

fn default_frequency() -> f64 {
    DEFAULT_FREQUENCY
}

fn default_steps_per_cycle() -> u32 {
    DEFAULT_STEPS_PER_CYCLE
}

fn default_tick_interval_ms() -> u64 {
    DEFAULT_TICK_INTERVAL_MS
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            stage_count: DEFAULT_STAGE_COUNT,
            frequency: DEFAULT_FREQUENCY,
            steps_per_cycle: DEFAULT_STEPS_PER_CYCLE,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            max_ticks: None,
        }
    }
}

impl SimulatorConfig {
    /// Simulated time advanced by one tick.
    pub fn dt(&self) -> f64 {
        1.0 / (self.frequency * f64::from(self.steps_per_cycle))
    }

    /// Return a copy of this configuration with `patch` applied on top.
    pub fn patched(&self, patch: &SimulatorConfigPatch) -> Self {
        Self {
            stage_count: patch.stage_count.unwrap_or(self.stage_count),
            frequency: patch.frequency.unwrap_or(self.frequency),
            steps_per_cycle: patch.steps_per_cycle.unwrap_or(self.steps_per_cycle),
            tick_interval_ms: patch.tick_interval_ms.unwrap_or(self.tick_interval_ms),
            max_ticks: match patch.max_ticks {
                Some(0) => None,
                Some(limit) => Some(limit),
                None => self.max_ticks,
            },
        }
    }
}

/// A partial update to [`SimulatorConfig`].
///
/// Fields left as `None` keep their current value. A `max_ticks` of zero
/// clears the tick limit.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, TS)]
#[serde(rename_all = "camelCase")]
pub struct SimulatorConfigPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps_per_cycle: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tick_interval_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_ticks: Option<u64>,
}
