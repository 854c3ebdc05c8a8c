// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use orgloop_core::test_support::FakeActor;
use orgloop_core::{DeliverOutcome, EventType, Provenance, SourceInstanceId};
use orgloop_observer::ObserverBus;
use std::time::Duration;

fn event() -> Event {
    Event {
        id: Default::default(),
        source: SourceInstanceId::new(),
        event_type: EventType::ResourceChanged,
        timestamp: chrono::Utc::now(),
        provenance: Provenance::default(),
        payload: Default::default(),
        fingerprint: None,
    }
}

#[tokio::test]
async fn submit_against_an_unregistered_actor_fails() {
    let scheduler = Scheduler::new(Arc::new(ObserverBus::new(CancellationToken::new())), CancellationToken::new());
    let err = scheduler
        .submit(ActorId::new(), RouteName::from("r1"), event(), Default::default())
        .await
        .unwrap_err();
    assert!(matches!(err, SchedulerError::UnknownActor { .. }));
}

#[tokio::test]
async fn submit_routes_to_the_registered_actor() {
    let mut config = ActorSchedulerConfig::default();
    config.workers = 1;
    config.queue_size = 4;
    config.deliver_timeout = Duration::from_millis(200);

    let actor = Arc::new(FakeActor::new());
    actor.push_outcome(DeliverOutcome::delivered());

    let mut scheduler = Scheduler::new(Arc::new(ObserverBus::new(CancellationToken::new())), CancellationToken::new());
    let actor_id = ActorId::new();
    scheduler.register_actor(actor_id, actor.clone(), config);

    scheduler.submit(actor_id, RouteName::from("r1"), event(), Default::default()).await.expect("submit");
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(actor.call_count(), 1);

    scheduler.shutdown().await;
}
