//! Helpers for reading the event stream.

use ep_protocol::ipc::Event;
use ep_protocol::run_models::TickSnapshot;
use tokio::sync::mpsc;

/// Whether `event` ends a run.
#[allow(dead_code)]
pub fn is_terminal(event: &Event) -> bool {
    matches!(
        event,
        Event::RunCompleted { .. } | Event::RunExhausted { .. } | Event::RunCancelled { .. }
    )
}

/// Receive events until one ends the run, and return all of them.
#[allow(dead_code)]
pub async fn collect_run(events_rx: &mut mpsc::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Some(event) = events_rx.recv().await {
        let done = is_terminal(&event);
        events.push(event);
        if done {
            break;
        }
    }
    events
}

/// Everything already sitting in the channel.
#[allow(dead_code)]
pub fn drain(events_rx: &mut mpsc::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = events_rx.try_recv() {
        events.push(event);
    }
    events
}

/// Snapshots of every `Tick` event, in order.
#[allow(dead_code)]
pub fn tick_snapshots(events: &[Event]) -> Vec<TickSnapshot> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::Tick { snapshot, .. } => Some(snapshot.clone()),
            _ => None,
        })
        .collect()
}

/// Position of the first event matching `predicate`.
#[allow(dead_code)]
pub fn position_of(events: &[Event], predicate: impl Fn(&Event) -> bool) -> Option<usize> {
    events.iter().position(predicate)
}
