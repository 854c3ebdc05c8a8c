// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! spec.md §8 scenario 3: the same event ingested twice within the dedup
//! window produces two bus records but exactly one delivery attempt.

use crate::support::{actor_spec, engine_config, event, fast_poll_config, observed_logger, route, source_spec, wait_until};
use orgloop_core::test_support::{FakeActor, FakeSource};
use orgloop_core::{DeliverOutcome, ObserverEvent, PollOutcome, TransformSpec};
use orgloop_engine::{ActorDecl, Engine, EngineTopology, SourceDecl, SourceMode};
use serde_json::{json, Map};
use std::time::Duration;
use tempfile::tempdir;

#[tokio::test]
async fn only_one_of_two_identical_polls_reaches_the_actor() {
    let dir = tempdir().unwrap();

    let payload: Map<String, serde_json::Value> = json!({"x": 1}).as_object().unwrap().clone();

    let source = FakeSource::new();
    // Two separate poll cycles carrying the same payload, mirroring the
    // upstream redelivering the same event rather than one poll batch
    // containing a literal duplicate.
    source.push_response(Ok(PollOutcome { events: vec![event("sin-dup", payload.clone())], checkpoint: Some("c1".to_string()) }));
    source.push_response(Ok(PollOutcome { events: vec![event("sin-dup", payload)], checkpoint: Some("c2".to_string()) }));

    let actor = FakeActor::new();
    actor.push_outcome(DeliverOutcome::delivered());
    actor.push_outcome(DeliverOutcome::delivered());

    let mut dedup_config = Map::new();
    dedup_config.insert("fields".to_string(), json!(["payload.x"]));
    dedup_config.insert("ttl_secs".to_string(), json!(60));
    let dedup = TransformSpec { kind: "dedup".to_string(), config: dedup_config };

    let topology = EngineTopology::new()
        .with_source(SourceDecl {
            spec: source_spec("sin-dup"),
            mode: SourceMode::Poll { source: Box::new(source), config: fast_poll_config() },
        })
        .with_actor(ActorDecl { spec: actor_spec("act-dup"), actor: Box::new(actor), scheduler: Default::default() })
        .with_route(route("r1", "sin-dup", "act-dup", vec![dedup]));

    let (logger, extra_logger) = observed_logger("fake");
    let engine = Engine::start(topology, engine_config(dir.path()), vec![extra_logger]).await.expect("engine should start");

    let settled = wait_until(50, Duration::from_millis(20), || {
        logger.events().iter().any(|e| matches!(e, ObserverEvent::DeliveryResult { .. }))
    })
    .await;
    assert!(settled, "expected the first poll's delivery result to be observed");

    // Give the second, duplicate poll cycle a chance to run and be
    // swallowed by dedup before asserting nothing further was delivered.
    tokio::time::sleep(Duration::from_millis(100)).await;

    let report = engine.shutdown().await;
    assert_eq!(report.in_flight_at_drain_start, 0);

    let delivery_results: Vec<_> = logger
        .events()
        .into_iter()
        .filter(|e| matches!(e, ObserverEvent::DeliveryResult { .. }))
        .collect();
    assert_eq!(delivery_results.len(), 1, "the duplicate poll's event must never reach the actor");

    let dropped = logger.events().into_iter().filter(|e| matches!(e, ObserverEvent::TransformDropped { .. })).count();
    assert_eq!(dropped, 1, "dedup should report exactly one drop for the repeated event");
}
