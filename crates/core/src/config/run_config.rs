//! Validated simulator settings.

use crate::config::error::{ConfigError, ConfigResult};
use ep_protocol::config_models::{SimulatorConfig, MAX_STAGE_COUNT};
use std::num::{NonZeroU32, NonZeroUsize};
use std::time::Duration;

/// A [`SimulatorConfig`] that has passed validation.
///
/// Runs are only ever built from a `RunConfig`, so a stage count outside
/// `1..=MAX_STAGE_COUNT`, a non-positive frequency or a zero time step can
/// never reach the scheduler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunConfig {
    pub stage_count: NonZeroUsize,
    pub frequency: f64,
    pub steps_per_cycle: NonZeroU32,
    pub tick_interval: Duration,
    pub max_ticks: Option<u64>,
    dt: f64,
}

impl RunConfig {
    /// Simulated time advanced by one tick.
    pub fn dt(&self) -> f64 {
        self.dt
    }
}

impl TryFrom<&SimulatorConfig> for RunConfig {
    type Error = ConfigError;

    fn try_from(config: &SimulatorConfig) -> ConfigResult<Self> {
        let stage_count =
            NonZeroUsize::new(config.stage_count).ok_or_else(|| ConfigError::InvalidSimulator {
                field: "stageCount",
                reason: "a pipeline needs at least one stage".to_string(),
            })?;
        if stage_count.get() > MAX_STAGE_COUNT {
            return Err(ConfigError::InvalidSimulator {
                field: "stageCount",
                reason: format!(
                    "at most {MAX_STAGE_COUNT} stages are supported, got {}",
                    config.stage_count
                ),
            });
        }

        if !config.frequency.is_finite() || config.frequency <= 0.0 {
            return Err(ConfigError::InvalidSimulator {
                field: "frequency",
                reason: format!("must be a positive number, got {}", config.frequency),
            });
        }

        let steps_per_cycle = NonZeroU32::new(config.steps_per_cycle).ok_or_else(|| {
            ConfigError::InvalidSimulator {
                field: "stepsPerCycle",
                reason: "must be at least 1".to_string(),
            }
        })?;

        if config.tick_interval_ms == 0 {
            return Err(ConfigError::InvalidSimulator {
                field: "tickIntervalMs",
                reason: "must be at least 1".to_string(),
            });
        }

        if config.max_ticks == Some(0) {
            return Err(ConfigError::InvalidSimulator {
                field: "maxTicks",
                reason: "a tick limit must allow at least one tick".to_string(),
            });
        }

        let dt = config.dt();
        // Guards against frequencies so small the product overflows to inf
        if !dt.is_finite() || dt <= 0.0 {
            return Err(ConfigError::InvalidSimulator {
                field: "frequency",
                reason: format!("time step {dt} is not usable"),
            });
        }

        Ok(Self {
            stage_count,
            frequency: config.frequency,
            steps_per_cycle,
            tick_interval: Duration::from_millis(config.tick_interval_ms),
            max_ticks: config.max_ticks,
            dt,
        })
    }
}
