//! The simulator facade.
//!
//! `Simulator` owns the current configuration, the service seams and at most
//! one run. Hosts either call its methods directly or feed it [`Op`]s through
//! [`Simulator::handle_op`] and watch the [`Event`] channel.

use crate::config::RunConfig;
use crate::scheduler::command::resolve_command;
use crate::scheduler::error::SchedulerError;
use crate::scheduler::run::{spawn_run, CommandFuture, RunHandle};
use crate::scheduler::state::SchedulerState;
use crate::services::{AuthService, CommandExecutor, ServiceError};
use chrono::Utc;
use ep_protocol::config_models::{SimulatorConfig, SimulatorConfigPatch};
use ep_protocol::ipc::{Event, Op};
use ep_protocol::run_models::{RunStatus, RunView};
use ep_protocol::service_models::LoginRequest;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};
use uuid::Uuid;

/// What a start request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// A new run was spawned.
    Started(Uuid),
    /// A run is already in flight; nothing changed.
    AlreadyRunning,
}

/// Owns the simulator configuration and the run in flight.
///
/// Configuration changes take effect at the next start. The observable state
/// lives in a `watch` channel; events go out on the `events_tx` channel.
pub struct Simulator {
    config: SimulatorConfig,
    executor: Arc<dyn CommandExecutor>,
    auth: Arc<dyn AuthService>,
    events_tx: mpsc::Sender<Event>,
    view_tx: Arc<watch::Sender<RunView>>,
    current: Option<RunHandle>,
}

impl Simulator {
    /// Create an idle simulator.
    ///
    /// # Arguments
    ///
    /// * `config` - Initial simulator configuration, validated here
    /// * `executor` - Service that runs commands
    /// * `auth` - Service that gates command execution
    /// * `events_tx` - Channel for sending events to the host
    pub fn new(
        config: SimulatorConfig,
        executor: Arc<dyn CommandExecutor>,
        auth: Arc<dyn AuthService>,
        events_tx: mpsc::Sender<Event>,
    ) -> Result<Self, SchedulerError> {
        RunConfig::try_from(&config)?;
        let (view_tx, _) = watch::channel(RunView::idle());

        Ok(Self {
            config,
            executor,
            auth,
            events_tx,
            view_tx: Arc::new(view_tx),
            current: None,
        })
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Replace the configuration. A run in flight keeps the one it started
    /// with.
    pub fn update_config(&mut self, config: SimulatorConfig) -> Result<(), SchedulerError> {
        RunConfig::try_from(&config)?;
        info!(?config, "simulator configuration updated");
        self.config = config;
        Ok(())
    }

    /// Merge `patch` into the current configuration and return the result.
    /// On error the configuration is left untouched.
    pub fn apply_patch(
        &mut self,
        patch: &SimulatorConfigPatch,
    ) -> Result<SimulatorConfig, SchedulerError> {
        let patched = self.config.patched(patch);
        self.update_config(patched.clone())?;
        Ok(patched)
    }

    /// A snapshot of the current view.
    pub fn view(&self) -> RunView {
        self.view_tx.borrow().clone()
    }

    pub fn status(&self) -> RunStatus {
        self.view_tx.borrow().status
    }

    /// Subscribe to view changes. Receivers only ever read.
    pub fn subscribe(&self) -> watch::Receiver<RunView> {
        self.view_tx.subscribe()
    }

    /// Start a run for `command`.
    ///
    /// The command is resolved concurrently with the tick loop; the first
    /// tick is evaluated without waiting for it. Starting while a run is in
    /// flight is a no-op. If the previous run is still sending its final
    /// event, this waits until that event is delivered.
    ///
    /// # Errors
    ///
    /// `EmptyCommand` for a blank command, `InvalidConfig` if the current
    /// configuration cannot drive a run.
    pub async fn start(&mut self, command: &str) -> Result<StartOutcome, SchedulerError> {
        if self.view_tx.borrow().is_running() {
            return Ok(StartOutcome::AlreadyRunning);
        }

        let command = command.trim();
        if command.is_empty() {
            return Err(SchedulerError::EmptyCommand);
        }

        let run_config = RunConfig::try_from(&self.config)?;
        let stage_count = run_config.stage_count.get();

        // A finished run may still be delivering its last event; let it.
        if let Some(previous) = self.current.take() {
            previous.join().await;
        }

        let run_id = Uuid::new_v4();
        self.view_tx
            .send_replace(RunView::running(run_id, command.to_string(), None));

        info!(%run_id, command, stage_count, "run started");
        let _ = self
            .events_tx
            .send(Event::RunStarted {
                run_id,
                command: command.to_string(),
                stage_count,
                started_at: Utc::now(),
            })
            .await;

        let resolution: CommandFuture = Box::pin(resolve_command(
            Arc::clone(&self.executor),
            Arc::clone(&self.auth),
            command.to_string(),
        ));

        self.current = Some(spawn_run(
            run_id,
            SchedulerState::new(run_config),
            resolution,
            self.events_tx.clone(),
            Arc::clone(&self.view_tx),
        ));

        Ok(StartOutcome::Started(run_id))
    }

    /// Stop the run in flight.
    ///
    /// Returns `true` if a running run was cancelled. Once this returns no
    /// further tick or result of that run can be observed.
    pub async fn stop(&mut self) -> bool {
        let Some(handle) = self.current.take() else {
            return false;
        };

        let run_id = handle.run_id();
        if !handle.cancel(&self.view_tx).await {
            return false;
        }

        info!(%run_id, "run cancelled");
        let _ = self.events_tx.send(Event::RunCancelled { run_id }).await;
        true
    }

    /// Wait for the current run to end on its own and return the final view.
    ///
    /// Without a tick limit a run whose token never exits does not end;
    /// callers must `stop` it instead.
    pub async fn wait(&mut self) -> RunView {
        if let Some(handle) = self.current.take() {
            handle.join().await;
        }
        self.view()
    }

    /// Log in through the auth service.
    pub async fn login(&self, username: &str, password: &str) -> Result<bool, ServiceError> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response = self.auth.login(&request).await?;
        Ok(response.success)
    }

    /// End the auth session. Runs started afterwards need a new login.
    pub async fn logout(&self) -> Result<(), ServiceError> {
        self.auth.logout().await
    }

    /// Dispatch one operation and report its outcome as events.
    ///
    /// Returns `false` once the host asked to shut down.
    pub async fn handle_op(&mut self, op: Op) -> bool {
        match op {
            Op::StartRun { command } => {
                if let Err(e) = self.start(&command).await {
                    self.reject_run(e.to_string()).await;
                }
            }
            Op::StopRun => {
                self.stop().await;
            }
            Op::UpdateConfig { patch } => {
                let event = match self.apply_patch(&patch) {
                    Ok(config) => Event::ConfigUpdated { config },
                    Err(e) => Event::ConfigRejected {
                        reason: e.to_string(),
                    },
                };
                let _ = self.events_tx.send(event).await;
            }
            Op::Login { username, password } => {
                let success = match self.login(&username, &password).await {
                    Ok(success) => success,
                    Err(e) => {
                        warn!(error = %e, "login failed");
                        false
                    }
                };
                let _ = self.events_tx.send(Event::LoginResult { success }).await;
            }
            Op::Logout => match self.logout().await {
                Ok(()) => {
                    let _ = self.events_tx.send(Event::LoggedOut).await;
                }
                Err(e) => warn!(error = %e, "logout failed"),
            },
            Op::GetStatus => {
                let view = self.view();
                let _ = self.events_tx.send(Event::StatusReport { view }).await;
            }
            Op::Shutdown => {
                self.stop().await;
                return false;
            }
        }
        true
    }

    async fn reject_run(&self, reason: String) {
        warn!(%reason, "run rejected");
        let _ = self.events_tx.send(Event::RunRejected { reason }).await;
    }
}

impl Drop for Simulator {
    fn drop(&mut self) {
        if let Some(handle) = self.current.take() {
            handle.abort();
        }
    }
}
