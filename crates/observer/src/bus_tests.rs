// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use orgloop_core::{EventId, SourceInstanceId};
use std::sync::{Arc, Mutex};

struct RecordingLogger {
    observed: Arc<Mutex<Vec<ObserverEvent>>>,
}

#[async_trait::async_trait]
impl Logger for RecordingLogger {
    async fn init(&mut self, _config: &serde_json::Map<String, serde_json::Value>) -> Result<(), orgloop_core::LoggerError> {
        Ok(())
    }

    fn observe(&self, event: &ObserverEvent) {
        self.observed.lock().unwrap().push(event.clone());
    }

    async fn shutdown(&mut self) {}
}

struct BlockedLogger;

#[async_trait::async_trait]
impl Logger for BlockedLogger {
    async fn init(&mut self, _config: &serde_json::Map<String, serde_json::Value>) -> Result<(), orgloop_core::LoggerError> {
        Ok(())
    }

    fn observe(&self, _event: &ObserverEvent) {}

    async fn shutdown(&mut self) {}
}

fn polled_event() -> ObserverEvent {
    ObserverEvent::SourcePolled { source: SourceInstanceId::new(), events_emitted: 3 }
}

#[tokio::test]
async fn emits_to_every_registered_logger() {
    let cancel = CancellationToken::new();
    let mut bus = ObserverBus::new(cancel.clone());

    let observed_a = Arc::new(Mutex::new(Vec::new()));
    let observed_b = Arc::new(Mutex::new(Vec::new()));
    bus.register("a", Box::new(RecordingLogger { observed: Arc::clone(&observed_a) }));
    bus.register("b", Box::new(RecordingLogger { observed: Arc::clone(&observed_b) }));

    bus.emit(polled_event());

    // give the per-logger tasks a chance to drain their channel
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    cancel.cancel();
    bus.shutdown().await;

    assert_eq!(observed_a.lock().unwrap().len(), 1);
    assert_eq!(observed_b.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn full_buffer_drops_for_that_logger_only_and_never_blocks_the_caller() {
    let cancel = CancellationToken::new();
    let mut bus = ObserverBus::new(cancel.clone());

    let observed = Arc::new(Mutex::new(Vec::new()));
    // buffer of 1, no task ever drains it, so the second emit must drop
    // rather than block this test.
    bus.register_with_buffer("blocked", Box::new(BlockedLogger), 1);
    bus.register("recording", Box::new(RecordingLogger { observed: Arc::clone(&observed) }));

    for _ in 0..5 {
        bus.emit(polled_event());
    }

    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    assert_eq!(observed.lock().unwrap().len(), 5);

    cancel.cancel();
    bus.shutdown().await;
}

#[tokio::test]
async fn delivery_events_round_trip_through_the_bus() {
    let cancel = CancellationToken::new();
    let mut bus = ObserverBus::new(cancel.clone());
    let observed = Arc::new(Mutex::new(Vec::new()));
    bus.register("a", Box::new(RecordingLogger { observed: Arc::clone(&observed) }));

    bus.emit(ObserverEvent::EventAccepted { event_id: EventId::new(), source: SourceInstanceId::new(), offset: 7 });

    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    cancel.cancel();
    bus.shutdown().await;

    let events = observed.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind(), "event.accepted");
}
