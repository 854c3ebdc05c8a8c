// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::event::{EventId, EventType, Provenance};
use crate::spec::SourceInstanceId;
use chrono::Utc;
use serde_json::Map;
use tokio_util::sync::CancellationToken;

fn sample_event() -> Event {
    Event {
        id: EventId::new(),
        source: SourceInstanceId::new(),
        event_type: EventType::ResourceChanged,
        timestamp: Utc::now(),
        provenance: Provenance::default(),
        payload: Map::new(),
        fingerprint: None,
    }
}

#[tokio::test]
async fn fake_source_replays_scripted_responses_in_order() {
    let mut source = FakeSource::new();
    source.push_response(Ok(PollOutcome { events: vec![sample_event()], checkpoint: Some("c1".into()) }));
    source.push_response(Err(SourceError::Transient("boom".into())));

    let cancel = CancellationToken::new();
    let first = source.poll(None, &cancel).await.unwrap();
    assert_eq!(first.events.len(), 1);
    assert_eq!(first.checkpoint.as_deref(), Some("c1"));

    let second = source.poll(Some("c1"), &cancel).await;
    assert!(second.is_err());

    let third = source.poll(Some("c1"), &cancel).await.unwrap();
    assert!(third.events.is_empty());
    assert_eq!(third.checkpoint.as_deref(), Some("c1"));
}

#[tokio::test]
async fn fake_actor_records_delivered_event_ids_and_replays_outcomes() {
    let actor = FakeActor::new();
    actor.push_outcome(DeliverOutcome::error("timeout"));
    actor.push_outcome(DeliverOutcome::delivered());

    let cancel = CancellationToken::new();
    let event = sample_event();
    let first = actor.deliver(&event, &Map::new(), &cancel).await;
    assert_eq!(first.result, DeliverResult::Error);

    let second = actor.deliver(&event, &Map::new(), &cancel).await;
    assert_eq!(second.result, DeliverResult::Delivered);

    assert_eq!(actor.call_count(), 2);
    assert_eq!(actor.delivered_event_ids(), vec![event.id.to_string(), event.id.to_string()]);
}

#[tokio::test]
async fn fake_transform_delegates_to_closure() {
    let transform = FakeTransform::new(|event, _ctx| Some(event));
    let context = TransformContext { route_name: "r".into(), source: SourceInstanceId::new() };
    let event = sample_event();
    let result = transform.execute(event.clone(), &context).await.unwrap();
    assert_eq!(result.unwrap().id, event.id);
}

#[tokio::test]
async fn fake_transform_can_drop_events() {
    let transform = FakeTransform::new(|_event, _ctx| None);
    let context = TransformContext { route_name: "r".into(), source: SourceInstanceId::new() };
    let result = transform.execute(sample_event(), &context).await.unwrap();
    assert!(result.is_none());
}

#[test]
fn fake_logger_records_observed_events_in_order() {
    let logger = FakeLogger::new();
    logger.observe(&ObserverEvent::EngineLifecycle { phase: "startup".into(), message: "ok".into() });
    logger.observe(&ObserverEvent::EngineLifecycle { phase: "drain".into(), message: "done".into() });
    assert_eq!(logger.kinds(), vec!["engine.lifecycle", "engine.lifecycle"]);
    assert_eq!(logger.events().len(), 2);
}
