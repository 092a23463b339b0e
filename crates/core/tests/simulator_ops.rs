//! Integration tests for driving the simulator through `Op`s.

mod common;

use common::*;
use ep_core::config::AuthSettings;
use ep_core::scheduler::AUTH_REQUIRED_MESSAGE;
use ep_core::services::{MockAuth, MockExecutor, SessionAuth};
use ep_protocol::config_models::SimulatorConfigPatch;
use ep_protocol::ipc::{Event, Op};
use ep_protocol::run_models::RunStatus;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

#[tokio::test(start_paused = true)]
async fn test_update_config_op_validates_patch() {
    let (mut simulator, mut events_rx, _executor) =
        succeeding_simulator(sim_config(3, 1.0, 8), "ok");

    let rejected = SimulatorConfigPatch {
        stage_count: Some(0),
        ..Default::default()
    };
    assert!(simulator.handle_op(Op::UpdateConfig { patch: rejected }).await);
    match events_rx.recv().await {
        Some(Event::ConfigRejected { reason }) => {
            assert!(reason.contains("stageCount"), "Unexpected reason: {reason}")
        }
        other => panic!("Expected ConfigRejected, got {other:?}"),
    }
    assert_eq!(simulator.config().stage_count, 3);

    let oversized = SimulatorConfigPatch {
        stage_count: Some(usize::MAX),
        ..Default::default()
    };
    assert!(simulator.handle_op(Op::UpdateConfig { patch: oversized }).await);
    assert!(matches!(
        events_rx.recv().await,
        Some(Event::ConfigRejected { .. })
    ));
    assert_eq!(simulator.config().stage_count, 3);

    let accepted = SimulatorConfigPatch {
        stage_count: Some(5),
        tick_interval_ms: Some(10),
        ..Default::default()
    };
    assert!(simulator.handle_op(Op::UpdateConfig { patch: accepted }).await);
    match events_rx.recv().await {
        Some(Event::ConfigUpdated { config }) => {
            assert_eq!(config.stage_count, 5);
            assert_eq!(config.tick_interval_ms, 10);
            assert_eq!(config.frequency, 1.0);
        }
        other => panic!("Expected ConfigUpdated, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_start_stop_and_status_ops() {
    let (mut simulator, mut events_rx, _executor) =
        succeeding_simulator(sim_config(100, 1.0, 8), "ok");

    assert!(
        simulator
            .handle_op(Op::StartRun {
                command: "ls".to_string(),
            })
            .await
    );
    sleep(Duration::from_millis(2 * TICK_MS)).await;

    assert!(simulator.handle_op(Op::GetStatus).await);
    let events = drain(&mut events_rx);
    match events.last() {
        Some(Event::StatusReport { view }) => {
            assert_eq!(view.status, RunStatus::Running);
            assert_eq!(view.command.as_deref(), Some("ls"));
            assert!(view.snapshot.is_some());
        }
        other => panic!("Expected StatusReport, got {other:?}"),
    }

    assert!(simulator.handle_op(Op::StopRun).await);
    let events = drain(&mut events_rx);
    assert!(matches!(events.as_slice(), [Event::RunCancelled { .. }]));

    // Stopping again reports nothing
    assert!(simulator.handle_op(Op::StopRun).await);
    assert!(drain(&mut events_rx).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_start_op_with_blank_command_is_rejected() {
    let (mut simulator, mut events_rx, executor) =
        succeeding_simulator(sim_config(3, 1.0, 8), "ok");

    assert!(
        simulator
            .handle_op(Op::StartRun {
                command: "  ".to_string(),
            })
            .await
    );

    let events = drain(&mut events_rx);
    match events.as_slice() {
        [Event::RunRejected { reason }] => assert_eq!(reason, "No command provided"),
        other => panic!("Expected a single RunRejected, got {other:?}"),
    }
    assert_eq!(simulator.status(), RunStatus::Idle);
    assert_eq!(executor.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_login_op_reports_result() {
    let (mut simulator, mut events_rx) = build_simulator(
        sim_config(3, 1.0, 8),
        Arc::new(MockExecutor::success("ok")),
        Arc::new(MockAuth::unauthenticated().accepting("operator", "hunter2")),
    );

    simulator
        .handle_op(Op::Login {
            username: "operator".to_string(),
            password: "wrong".to_string(),
        })
        .await;
    assert!(matches!(
        events_rx.recv().await,
        Some(Event::LoginResult { success: false })
    ));

    simulator
        .handle_op(Op::Login {
            username: "operator".to_string(),
            password: "hunter2".to_string(),
        })
        .await;
    assert!(matches!(
        events_rx.recv().await,
        Some(Event::LoginResult { success: true })
    ));
}

#[tokio::test(start_paused = true)]
async fn test_logout_op_locks_the_next_run() {
    let executor = MockExecutor::success("ok");
    let auth = SessionAuth::new(AuthSettings {
        username: "operator".to_string(),
        password: "hunter2".to_string(),
    });
    let (mut simulator, mut events_rx) = build_simulator(
        sim_config(3, 1.0, 8),
        Arc::new(executor.clone()),
        Arc::new(auth),
    );

    simulator
        .handle_op(Op::Login {
            username: "operator".to_string(),
            password: "hunter2".to_string(),
        })
        .await;
    assert_eq!(events_rx.recv().await, Some(Event::LoginResult { success: true }));

    assert!(simulator.handle_op(Op::Logout).await);
    assert_eq!(events_rx.recv().await, Some(Event::LoggedOut));

    simulator
        .handle_op(Op::StartRun {
            command: "ls".to_string(),
        })
        .await;
    let events = collect_run(&mut events_rx).await;
    match events.last() {
        Some(Event::RunCompleted {
            result, success, ..
        }) => {
            assert_eq!(result, AUTH_REQUIRED_MESSAGE);
            assert!(!success);
        }
        other => panic!("Expected RunCompleted, got {other:?}"),
    }
    assert_eq!(executor.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_logout_op_with_unreachable_auth_emits_nothing() {
    let (mut simulator, mut events_rx) = build_simulator(
        sim_config(3, 1.0, 8),
        Arc::new(MockExecutor::success("ok")),
        Arc::new(MockAuth::unreachable("connection refused")),
    );

    assert!(simulator.handle_op(Op::Logout).await);
    assert!(drain(&mut events_rx).is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_op_stops_the_run() {
    let (mut simulator, mut events_rx, _executor) =
        succeeding_simulator(sim_config(100, 1.0, 8), "ok");

    simulator
        .handle_op(Op::StartRun {
            command: "ls".to_string(),
        })
        .await;
    sleep(Duration::from_millis(TICK_MS)).await;

    assert!(!simulator.handle_op(Op::Shutdown).await);
    let events = drain(&mut events_rx);
    assert!(matches!(events.last(), Some(Event::RunCancelled { .. })));
    assert_eq!(simulator.status(), RunStatus::Idle);
}
