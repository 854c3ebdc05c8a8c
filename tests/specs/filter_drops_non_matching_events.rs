// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! spec.md §8 scenario 2: two events differing only in
//! `provenance.platform_event`; the route's filter keeps only the one
//! matching `pull_request.merged`.

use crate::support::{
    actor_spec, engine_config, event_with_provenance, fast_poll_config, observed_logger,
    route_with_filter, source_spec, wait_until,
};
use orgloop_core::test_support::{FakeActor, FakeSource};
use orgloop_core::{DeliverOutcome, Filter, FilterNode, ObserverEvent, PollOutcome, Provenance};
use orgloop_engine::{ActorDecl, Engine, EngineTopology, SourceDecl, SourceMode};
use serde_json::json;
use std::time::Duration;
use tempfile::tempdir;

fn provenance(platform_event: &str) -> Provenance {
    Provenance { platform: Some("github".to_string()), platform_event: Some(platform_event.to_string()), ..Default::default() }
}

#[tokio::test]
async fn only_the_matching_event_reaches_the_actor() {
    let dir = tempdir().unwrap();

    let push_event = event_with_provenance("sin-gh", json!({"action": "push"}).as_object().unwrap().clone(), provenance("push"));
    let merged_event =
        event_with_provenance("sin-gh", json!({"action": "merged"}).as_object().unwrap().clone(), provenance("pull_request.merged"));
    let expected_id = merged_event.id;

    let source = FakeSource::new();
    source.push_response(Ok(PollOutcome { events: vec![push_event, merged_event], checkpoint: Some("cursor-1".to_string()) }));

    let actor = FakeActor::new();
    actor.push_outcome(DeliverOutcome::delivered());

    let filter = Filter(Some(FilterNode::Equals {
        path: "provenance.platform_event".to_string(),
        value: json!("pull_request.merged"),
    }));

    let topology = EngineTopology::new()
        .with_source(SourceDecl {
            spec: source_spec("sin-gh"),
            mode: SourceMode::Poll { source: Box::new(source), config: fast_poll_config() },
        })
        .with_actor(ActorDecl { spec: actor_spec("act-gh"), actor: Box::new(actor), scheduler: Default::default() })
        .with_route(route_with_filter("r1", "sin-gh", "act-gh", Vec::new(), filter));

    let (logger, extra_logger) = observed_logger("fake");
    let engine = Engine::start(topology, engine_config(dir.path()), vec![extra_logger]).await.expect("engine should start");

    let settled = wait_until(50, Duration::from_millis(20), || {
        logger.events().iter().any(|e| matches!(e, ObserverEvent::DeliveryResult { .. }))
    })
    .await;
    assert!(settled, "expected the matching event's delivery result to be observed");

    let report = engine.shutdown().await;
    assert_eq!(report.in_flight_at_drain_start, 0);

    let delivery_results: Vec<_> = logger
        .events()
        .into_iter()
        .filter_map(|e| match e {
            ObserverEvent::DeliveryResult { attempt } => Some(attempt),
            _ => None,
        })
        .collect();
    assert_eq!(delivery_results.len(), 1, "the dropped push event must never reach the scheduler");
    assert_eq!(delivery_results[0].event_id, expected_id);
}
