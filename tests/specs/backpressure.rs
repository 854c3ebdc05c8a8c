// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! spec.md §8 scenario 6: a small, slow actor queue applies backpressure
//! all the way back to the poll source, but every event is still
//! eventually delivered — none are dropped.

use crate::support::{actor_spec, engine_config, event, fast_poll_config, observed_logger, route, source_spec, wait_until};
use async_trait::async_trait;
use orgloop_core::test_support::FakeSource;
use orgloop_core::{
    Actor, ActorError, DeliverOutcome, Event, ObserverEvent, PollOutcome,
};
use orgloop_engine::{ActorDecl, Engine, EngineTopology, SourceDecl, SourceMode};
use orgloop_scheduler::ActorSchedulerConfig;
use serde_json::{json, Map, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;
use tokio_util::sync::CancellationToken;

/// An actor whose every `deliver` call blocks for a fixed delay before
/// succeeding, used to force the scheduler's bounded queue to fill up.
struct SlowActor {
    delay: Duration,
    calls: AtomicUsize,
}

impl SlowActor {
    fn new(delay: Duration) -> Self {
        Self { delay, calls: AtomicUsize::new(0) }
    }
}

#[async_trait]
impl Actor for SlowActor {
    async fn init(&mut self, _config: &Map<String, Value>) -> Result<(), ActorError> {
        Ok(())
    }

    async fn deliver(&self, _event: &Event, _route_delivery_config: &Map<String, Value>, _cancel: &CancellationToken) -> DeliverOutcome {
        tokio::time::sleep(self.delay).await;
        self.calls.fetch_add(1, Ordering::Relaxed);
        DeliverOutcome::delivered()
    }

    async fn shutdown(&mut self) {}
}

#[tokio::test]
async fn a_full_actor_queue_backs_up_without_losing_any_events() {
    let dir = tempdir().unwrap();

    const TOTAL: usize = 10;

    let source = FakeSource::new();
    for i in 0..TOTAL {
        let payload: Map<String, Value> = json!({"i": i}).as_object().unwrap().clone();
        source.push_response(Ok(PollOutcome { events: vec![event("sin-bp", payload)], checkpoint: Some(format!("c{i}")) }));
    }

    let scheduler_config = ActorSchedulerConfig {
        workers: 1,
        queue_size: 2,
        deliver_timeout: Duration::from_secs(5),
        ..ActorSchedulerConfig::default()
    };

    let topology = EngineTopology::new()
        .with_source(SourceDecl {
            spec: source_spec("sin-bp"),
            mode: SourceMode::Poll { source: Box::new(source), config: fast_poll_config() },
        })
        .with_actor(ActorDecl {
            spec: actor_spec("act-bp"),
            actor: Box::new(SlowActor::new(Duration::from_millis(50))),
            scheduler: scheduler_config,
        })
        .with_route(route("r1", "sin-bp", "act-bp", Vec::new()));

    let (logger, extra_logger) = observed_logger("fake");
    let engine = Engine::start(topology, engine_config(dir.path()), vec![extra_logger]).await.expect("engine should start");

    let all_delivered = wait_until(200, Duration::from_millis(25), || {
        logger
            .events()
            .iter()
            .filter(|e| matches!(e, ObserverEvent::DeliveryResult { attempt } if matches!(attempt.status, orgloop_core::DeliveryStatus::Delivered)))
            .count()
            >= TOTAL
    })
    .await;
    assert!(all_delivered, "every event should eventually be delivered despite the small queue");

    let report = engine.shutdown().await;
    assert_eq!(report.in_flight_at_drain_start, 0);

    let delivered = logger
        .events()
        .into_iter()
        .filter(|e| matches!(e, ObserverEvent::DeliveryResult { attempt } if matches!(attempt.status, orgloop_core::DeliveryStatus::Delivered)))
        .count();
    assert_eq!(delivered, TOTAL, "no event should be dropped by backpressure, only delayed");
}
