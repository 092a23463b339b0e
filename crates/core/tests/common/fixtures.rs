//! Fixtures for building simulators against mock services.

use ep_core::scheduler::Simulator;
use ep_core::services::{AuthService, CommandExecutor, MockAuth, MockExecutor};
use ep_protocol::config_models::SimulatorConfig;
use ep_protocol::ipc::Event;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Tick interval used by the timing tests.
#[allow(dead_code)]
pub const TICK_MS: u64 = 20;

/// A configuration with the given pipeline shape and `TICK_MS` ticks.
#[allow(dead_code)]
pub fn sim_config(stage_count: usize, frequency: f64, steps_per_cycle: u32) -> SimulatorConfig {
    SimulatorConfig {
        stage_count,
        frequency,
        steps_per_cycle,
        tick_interval_ms: TICK_MS,
        max_ticks: None,
    }
}

/// Wire a simulator to the given services.
///
/// The event channel is large enough that no test run ever blocks on it.
#[allow(dead_code)]
pub fn build_simulator(
    config: SimulatorConfig,
    executor: Arc<dyn CommandExecutor>,
    auth: Arc<dyn AuthService>,
) -> (Simulator, mpsc::Receiver<Event>) {
    let (events_tx, events_rx) = mpsc::channel(1024);
    let simulator =
        Simulator::new(config, executor, auth, events_tx).expect("Failed to build simulator");
    (simulator, events_rx)
}

/// A simulator whose command succeeds with `output` for an open session.
#[allow(dead_code)]
pub fn succeeding_simulator(
    config: SimulatorConfig,
    output: &str,
) -> (Simulator, mpsc::Receiver<Event>, MockExecutor) {
    let executor = MockExecutor::success(output);
    let (simulator, events_rx) = build_simulator(
        config,
        Arc::new(executor.clone()),
        Arc::new(MockAuth::authenticated()),
    );
    (simulator, events_rx, executor)
}
