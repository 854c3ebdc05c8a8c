// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! spec.md §8 scenario 4: the actor returns `error` on the first two
//! attempts and `delivered` on the third; delivery ultimately succeeds
//! and the observer records three attempts with growing backoffs.

use crate::support::{actor_spec, engine_config, event, fast_poll_config, observed_logger, route, source_spec, wait_until};
use orgloop_core::test_support::{FakeActor, FakeSource};
use orgloop_core::{DeliverOutcome, ObserverEvent, PollOutcome};
use orgloop_engine::{ActorDecl, Engine, EngineTopology, SourceDecl, SourceMode};
use orgloop_scheduler::{ActorSchedulerConfig, BackoffPolicy};
use serde_json::json;
use std::time::Duration;
use tempfile::tempdir;

#[tokio::test]
async fn an_actor_that_errors_twice_then_delivers_eventually_succeeds() {
    let dir = tempdir().unwrap();

    let source = FakeSource::new();
    source.push_response(Ok(PollOutcome {
        events: vec![event("sin-retry", json!({"x": 1}).as_object().unwrap().clone())],
        checkpoint: Some("c1".to_string()),
    }));

    let actor = FakeActor::new();
    actor.push_outcome(DeliverOutcome::error("transient failure"));
    actor.push_outcome(DeliverOutcome::error("transient failure"));
    actor.push_outcome(DeliverOutcome::delivered());

    // Keep the backoff's shape (exponential, jittered) but scale its base
    // down so the test doesn't spend real wall-clock seconds sleeping.
    let scheduler_config = ActorSchedulerConfig {
        backoff: BackoffPolicy { base: Duration::from_millis(20), ..BackoffPolicy::default() },
        ..ActorSchedulerConfig::default()
    };

    let topology = EngineTopology::new()
        .with_source(SourceDecl {
            spec: source_spec("sin-retry"),
            mode: SourceMode::Poll { source: Box::new(source), config: fast_poll_config() },
        })
        .with_actor(ActorDecl { spec: actor_spec("act-retry"), actor: Box::new(actor), scheduler: scheduler_config })
        .with_route(route("r1", "sin-retry", "act-retry", Vec::new()));

    let (logger, extra_logger) = observed_logger("fake");
    let engine = Engine::start(topology, engine_config(dir.path()), vec![extra_logger]).await.expect("engine should start");

    let settled = wait_until(100, Duration::from_millis(20), || {
        logger
            .events()
            .iter()
            .filter(|e| matches!(e, ObserverEvent::DeliveryResult { attempt } if attempt.attempt_n == 3))
            .count()
            > 0
    })
    .await;
    assert!(settled, "expected the third attempt's delivery result to be observed");

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
    assert_eq!(attempts.len(), 3, "expected exactly three delivery attempts");
    assert_eq!(attempts.iter().map(|a| a.attempt_n).collect::<Vec<_>>(), vec![1, 2, 3]);

    let results: Vec<_> = logger
        .events()
        .into_iter()
        .filter_map(|e| match e {
            ObserverEvent::DeliveryResult { attempt } => Some(attempt),
            _ => None,
        })
        .collect();
    let final_result = results.last().expect("at least one result observed");
    assert_eq!(final_result.attempt_n, 3);
    assert!(matches!(final_result.status, orgloop_core::DeliveryStatus::Delivered));
}
