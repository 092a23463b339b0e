//! The cancellable periodic task animating one run.
//!
//! Each run is a single spawned task that owns its [`SchedulerState`], the
//! pending command future and the buffered result. Nothing else mutates
//! them. The task publishes into a shared `watch` view and emits `Event`s;
//! both stop the moment the run's liveness flag is cleared.

use crate::scheduler::command::CommandResult;
use crate::scheduler::state::{SchedulerState, TickOutcome};
use ep_protocol::ipc::Event;
use ep_protocol::run_models::{RunStatus, RunView};
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, Instrument};
use uuid::Uuid;

/// The in-flight command resolution of a run.
pub type CommandFuture = Pin<Box<dyn Future<Output = CommandResult> + Send>>;

enum CommandSlot {
    Pending(CommandFuture),
    Ready(CommandResult),
}

/// Handle to a spawned run.
///
/// Exactly one tick timer is outstanding per handle: the task sleeps between
/// ticks and nothing else schedules work for it.
pub struct RunHandle {
    run_id: Uuid,
    alive: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl RunHandle {
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Cancel the run if it is still in flight.
    ///
    /// The liveness flag is cleared and the view reset to idle under the
    /// watch lock, so the task cannot publish anything afterwards. The task
    /// is then aborted and joined; once this returns no further tick can be
    /// observed. Returns `false` if the run had already finished.
    pub async fn cancel(self, view_tx: &watch::Sender<RunView>) -> bool {
        let run_id = self.run_id;
        let alive = &self.alive;
        let cancelled = view_tx.send_if_modified(|view| {
            if !view.is_running() || view.run_id != Some(run_id) {
                return false;
            }
            alive.store(false, Ordering::SeqCst);
            *view = RunView::idle();
            true
        });

        if cancelled {
            self.task.abort();
            let _ = self.task.await;
        }
        cancelled
    }

    /// Wait for the run to end on its own.
    pub async fn join(self) {
        let _ = self.task.await;
    }

    /// Stop the task without waiting for it.
    pub fn abort(&self) {
        self.alive.store(false, Ordering::SeqCst);
        self.task.abort();
    }
}

/// Spawn the tick loop for a freshly reset run.
///
/// The first tick is evaluated immediately; `command` is polled alongside
/// the tick timer and its result buffered until the token exits.
pub fn spawn_run(
    run_id: Uuid,
    state: SchedulerState,
    command: CommandFuture,
    events_tx: mpsc::Sender<Event>,
    view_tx: Arc<watch::Sender<RunView>>,
) -> RunHandle {
    let alive = Arc::new(AtomicBool::new(true));
    let run = ActiveRun {
        run_id,
        state,
        command: CommandSlot::Pending(command),
        events_tx,
        view_tx,
        alive: Arc::clone(&alive),
    };

    let span = tracing::info_span!("run", %run_id);
    let task = tokio::spawn(run.drive().instrument(span));

    RunHandle {
        run_id,
        alive,
        task,
    }
}

struct ActiveRun {
    run_id: Uuid,
    state: SchedulerState,
    command: CommandSlot,
    events_tx: mpsc::Sender<Event>,
    view_tx: Arc<watch::Sender<RunView>>,
    alive: Arc<AtomicBool>,
}

impl ActiveRun {
    async fn drive(mut self) {
        loop {
            if !self.alive.load(Ordering::SeqCst) {
                return;
            }

            let outcome = self.state.tick();
            let snapshot = self.state.snapshot();
            debug!(
                tick = snapshot.tick,
                signal = snapshot.signal,
                cycle_count = snapshot.cycle_count,
                lit = self.state.stages().active_count(),
                "tick"
            );

            if !self.publish(|view| view.snapshot = Some(snapshot.clone())) {
                return;
            }
            let tick = Event::Tick {
                run_id: self.run_id,
                snapshot,
            };
            emit(&self.events_tx, tick).await;

            if outcome == TickOutcome::Exited {
                self.complete().await;
                return;
            }
            if self.state.budget_exhausted() {
                self.exhaust().await;
                return;
            }

            self.wait_next_tick().await;
        }
    }

    /// Sleep one tick interval, buffering the command result if it lands
    /// in the meantime.
    async fn wait_next_tick(&mut self) {
        let deadline = Instant::now() + self.state.config().tick_interval;
        loop {
            let resolved = match &mut self.command {
                CommandSlot::Pending(fut) => tokio::select! {
                    _ = sleep_until(deadline) => None,
                    result = fut => Some(result),
                },
                CommandSlot::Ready(_) => {
                    sleep_until(deadline).await;
                    None
                }
            };

            match resolved {
                Some(result) => self.buffer(result).await,
                None => return,
            }
        }
    }

    async fn buffer(&mut self, result: CommandResult) {
        let success = result.success;
        debug!(success, "command resolved");
        self.command = CommandSlot::Ready(result);
        let resolved = Event::CommandResolved {
            run_id: self.run_id,
            success,
        };
        emit(&self.events_tx, resolved).await;
    }

    async fn complete(mut self) {
        if matches!(self.command, CommandSlot::Pending(_)) {
            info!("token exited before the command resolved, waiting for result");
            let awaiting = Event::AwaitingResult {
                run_id: self.run_id,
            };
            emit(&self.events_tx, awaiting).await;
        }

        let CommandResult { success, text } = match &mut self.command {
            CommandSlot::Ready(result) => result.clone(),
            CommandSlot::Pending(fut) => fut.await,
        };

        let published = self.publish(|view| {
            view.status = RunStatus::Completed;
            view.result = Some(text.clone());
        });
        if !published {
            return;
        }

        info!(
            success,
            ticks = self.state.ticks(),
            cycle_count = self.state.cycle_count(),
            "run completed"
        );
        let completed = Event::RunCompleted {
            run_id: self.run_id,
            result: text,
            success,
        };
        emit(&self.events_tx, completed).await;
    }

    async fn exhaust(self) {
        let ticks = self.state.ticks();
        if !self.publish(|view| view.status = RunStatus::Idle) {
            return;
        }

        info!(ticks, "tick budget exhausted before the token exited");
        let exhausted = Event::RunExhausted {
            run_id: self.run_id,
            ticks,
        };
        emit(&self.events_tx, exhausted).await;
    }

    /// Apply `update` to the shared view unless the run was cancelled.
    fn publish(&self, update: impl FnOnce(&mut RunView)) -> bool {
        let alive = &self.alive;
        let run_id = self.run_id;
        self.view_tx.send_if_modified(|view| {
            if !alive.load(Ordering::SeqCst) || view.run_id != Some(run_id) {
                return false;
            }
            update(view);
            true
        })
    }
}

// `ActiveRun` is not `Sync`; only the sender may be borrowed across the await.
async fn emit(events_tx: &mpsc::Sender<Event>, event: Event) {
    let _ = events_tx.send(event).await;
}
