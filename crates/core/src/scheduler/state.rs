//! The tick state machine of one run.
//!
//! `SchedulerState` is a plain value: it knows nothing about timers, tasks
//! or channels. The run task owns one and calls [`SchedulerState::tick`]
//! once per tick interval.

use crate::config::RunConfig;
use crate::oscillator::signal;
use crate::pipeline::PipelineState;
use ep_protocol::run_models::TickSnapshot;

/// What the run loop should do after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Re-arm the timer for the next tick.
    Continue,
    /// The token reached the exit stage; the run is complete.
    Exited,
}

/// Pipeline, clock and counters of a single run.
#[derive(Debug, Clone, PartialEq)]
pub struct SchedulerState {
    config: RunConfig,
    stages: PipelineState,
    /// Elapsed time is `step * dt`, never an accumulated float sum.
    step: u64,
    ticks: u64,
    cycle_count: u64,
    last_signal: f64,
}

impl SchedulerState {
    /// Fresh state: dark pipeline, zero elapsed time, zero cycles.
    pub fn new(config: RunConfig) -> Self {
        Self {
            stages: PipelineState::reset(config.stage_count),
            config,
            step: 0,
            ticks: 0,
            cycle_count: 0,
            last_signal: 0.0,
        }
    }

    /// Evaluate one tick.
    ///
    /// A strictly positive signal advances the token; zero or negative
    /// resets the pipeline and counts a cycle. If the exit stage is lit
    /// afterwards the clock stays where it is and `Exited` is returned.
    pub fn tick(&mut self) -> TickOutcome {
        let v = signal(self.elapsed_time(), self.config.frequency);
        self.last_signal = v;
        self.ticks += 1;

        if v > 0.0 {
            self.stages = self.stages.advance();
        } else {
            self.stages = PipelineState::reset(self.config.stage_count);
            self.cycle_count += 1;
        }

        if self.stages.exit_active() {
            return TickOutcome::Exited;
        }

        self.step += 1;
        TickOutcome::Continue
    }

    pub fn elapsed_time(&self) -> f64 {
        self.step as f64 * self.config.dt()
    }

    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }

    /// Number of ticks evaluated so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn stages(&self) -> &PipelineState {
        &self.stages
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Whether the tick budget, if any, is used up.
    pub fn budget_exhausted(&self) -> bool {
        self.config
            .max_ticks
            .is_some_and(|limit| self.ticks >= limit)
    }

    pub fn snapshot(&self) -> TickSnapshot {
        TickSnapshot {
            tick: self.ticks,
            elapsed_time: self.elapsed_time(),
            signal: self.last_signal,
            cycle_count: self.cycle_count,
            stages: self.stages.flags().to_vec(),
        }
    }
}
