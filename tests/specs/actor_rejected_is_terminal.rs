// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! spec.md §8 scenario 5: an actor that returns `rejected` gets exactly
//! one attempt and no retries.

use crate::support::{actor_spec, engine_config, event, fast_poll_config, observed_logger, route, source_spec, wait_until};
use orgloop_core::test_support::{FakeActor, FakeSource};
use orgloop_core::{DeliverOutcome, DeliveryStatus, ObserverEvent, PollOutcome};
use orgloop_engine::{ActorDecl, Engine, EngineTopology, SourceDecl, SourceMode};
use serde_json::json;
use std::time::Duration;
use tempfile::tempdir;

#[tokio::test]
async fn a_rejected_delivery_is_never_retried() {
    let dir = tempdir().unwrap();

    let source = FakeSource::new();
    source.push_response(Ok(PollOutcome {
        events: vec![event("sin-rej", json!({"x": 1}).as_object().unwrap().clone())],
        checkpoint: Some("c1".to_string()),
    }));

    let actor = FakeActor::new();
    actor.push_outcome(DeliverOutcome::rejected("not allowed"));

    let topology = EngineTopology::new()
        .with_source(SourceDecl {
            spec: source_spec("sin-rej"),
            mode: SourceMode::Poll { source: Box::new(source), config: fast_poll_config() },
        })
        .with_actor(ActorDecl { spec: actor_spec("act-rej"), actor: Box::new(actor), scheduler: Default::default() })
        .with_route(route("r1", "sin-rej", "act-rej", Vec::new()));

    let (logger, extra_logger) = observed_logger("fake");
    let engine = Engine::start(topology, engine_config(dir.path()), vec![extra_logger]).await.expect("engine should start");

    let settled = wait_until(50, Duration::from_millis(20), || {
        logger.events().iter().any(|e| matches!(e, ObserverEvent::DeliveryResult { .. }))
    })
    .await;
    assert!(settled, "expected the rejection's delivery result to be observed");

    // Give a hypothetical (incorrect) retry a window to fire before
    // shutting down, so a regression that retries rejections would show up
    // as more than one attempt below rather than being masked by the drain.
    tokio::time::sleep(Duration::from_millis(100)).await;

    let report = engine.shutdown().await;
    assert_eq!(report.in_flight_at_drain_start, 0);

    let attempts: Vec<_> = logger
        .events()
        .into_iter()
        .filter_map(|e| match e {
            ObserverEvent::DeliveryAttempt { attempt } => Some(attempt),
            _ => None,
        })
        .collect();
    assert_eq!(attempts.len(), 1, "a rejected delivery must never be retried");
    assert_eq!(attempts[0].attempt_n, 1);

    let results: Vec<_> = logger
        .events()
        .into_iter()
        .filter_map(|e| match e {
            ObserverEvent::DeliveryResult { attempt } => Some(attempt),
            _ => None,
        })
        .collect();
    assert_eq!(results.len(), 1);
    assert!(matches!(results[0].status, DeliveryStatus::Rejected));
}
