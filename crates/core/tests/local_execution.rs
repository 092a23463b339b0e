//! End-to-end runs against the local executor and session authenticator.
//!
//! These spawn real processes, so they use the real clock with a short tick
//! interval and an overall timeout.
#![cfg(unix)]

mod common;

use common::*;
use ep_core::config::{AuthSettings, ExecutorSettings};
use ep_core::scheduler::{Simulator, AUTH_REQUIRED_MESSAGE};
use ep_core::services::{LocalExecutor, SessionAuth};
use ep_protocol::ipc::Event;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::mpsc;
use tokio::time::timeout;

fn local_simulator(
    workdir: &TempDir,
    auth: Arc<SessionAuth>,
) -> (Simulator, mpsc::Receiver<Event>) {
    let mut config = sim_config(3, 1.0, 8);
    config.tick_interval_ms = 1;
    let executor = LocalExecutor::new(ExecutorSettings::default(), workdir.path().to_path_buf());
    build_simulator(config, Arc::new(executor), auth)
}

async fn run_to_completion(
    simulator: &mut Simulator,
    events_rx: &mut mpsc::Receiver<Event>,
    command: &str,
) -> (String, bool) {
    simulator.start(command).await.expect("Failed to start run");
    let events = timeout(Duration::from_secs(10), collect_run(events_rx))
        .await
        .expect("Run did not finish in time");
    match events.last() {
        Some(Event::RunCompleted {
            result, success, ..
        }) => (result.clone(), *success),
        other => panic!("Expected RunCompleted, got {other:?}"),
    }
}

#[tokio::test]
async fn test_echo_output_becomes_result() {
    let workdir = tempfile::tempdir().unwrap();
    let (mut simulator, mut events_rx) = local_simulator(&workdir, Arc::new(SessionAuth::open()));

    let (result, success) =
        run_to_completion(&mut simulator, &mut events_rx, "echo 'hello world'").await;

    assert!(success);
    assert_eq!(result, "hello world");
}

#[tokio::test]
async fn test_disallowed_command_is_an_error_result() {
    let workdir = tempfile::tempdir().unwrap();
    let (mut simulator, mut events_rx) = local_simulator(&workdir, Arc::new(SessionAuth::open()));

    let (result, success) =
        run_to_completion(&mut simulator, &mut events_rx, "rm -rf important").await;

    assert!(!success);
    assert_eq!(
        result,
        "Error: Command 'rm' is not allowed for security reasons."
    );
    assert!(workdir.path().exists());
}

#[tokio::test]
async fn test_commands_run_in_working_directory() {
    let workdir = tempfile::tempdir().unwrap();
    std::fs::write(workdir.path().join("marker.txt"), "").unwrap();
    let (mut simulator, mut events_rx) = local_simulator(&workdir, Arc::new(SessionAuth::open()));

    let (result, success) = run_to_completion(&mut simulator, &mut events_rx, "ls").await;

    assert!(success);
    assert!(result.contains("marker.txt"), "Unexpected listing: {result}");
}

#[tokio::test]
async fn test_session_login_unlocks_execution() {
    let workdir = tempfile::tempdir().unwrap();
    let auth = Arc::new(SessionAuth::new(AuthSettings {
        username: "operator".to_string(),
        password: "hunter2".to_string(),
    }));
    let (mut simulator, mut events_rx) = local_simulator(&workdir, auth);

    let (result, success) = run_to_completion(&mut simulator, &mut events_rx, "pwd").await;
    assert!(!success);
    assert_eq!(result, AUTH_REQUIRED_MESSAGE);

    assert!(!simulator.login("operator", "nope").await.unwrap());
    assert!(simulator.login("operator", "hunter2").await.unwrap());

    let (_, success) = run_to_completion(&mut simulator, &mut events_rx, "pwd").await;
    assert!(success);

    simulator.logout().await.unwrap();
    let (result, _) = run_to_completion(&mut simulator, &mut events_rx, "pwd").await;
    assert_eq!(result, AUTH_REQUIRED_MESSAGE);
}
