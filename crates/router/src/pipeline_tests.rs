// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::transforms::TransformDeps;
use chrono::Utc;
use orgloop_checkpoint::CheckpointStore;
use orgloop_core::{EventType, Filter, SourceInstanceId, ThenSpec, TransformSpec, WhenSpec};
use serde_json::{json, Map};
use std::collections::HashMap;
use std::sync::Arc;

fn deps() -> TransformDeps {
    let dir = tempfile::tempdir().expect("tempdir");
    TransformDeps {
        checkpoints: Arc::new(CheckpointStore::open(dir.path()).expect("open")),
        gate_capabilities: Arc::new(HashMap::new()),
    }
}

fn base_event(source: SourceInstanceId) -> Event {
    Event {
        id: Default::default(),
        source,
        event_type: EventType::ResourceChanged,
        timestamp: Utc::now(),
        provenance: Default::default(),
        payload: Map::new(),
        fingerprint: None,
    }
}

#[tokio::test]
async fn an_empty_pipeline_delivers_the_event_unchanged() {
    let source = SourceInstanceId::new();
    let route = RouteSpec {
        name: "r1".into(),
        when: WhenSpec { source: source.as_str().to_string(), event_types: vec![EventType::ResourceChanged], filter: Filter::default() },
        transforms: Vec::new(),
        then: ThenSpec { actor: "act-1".to_string(), config: Map::new() },
        with: Map::new(),
    };
    let pipeline = RoutePipeline::build(&route, source, &deps()).expect("build");
    match pipeline.run(base_event(source)).await.expect("run") {
        PipelineOutcome::Delivered(_) => {}
        PipelineOutcome::Dropped { .. } => panic!("expected delivery"),
    }
}

#[tokio::test]
async fn a_filter_stage_drops_non_matching_events_and_reports_its_kind() {
    let source = SourceInstanceId::new();
    let mut filter_config = Map::new();
    filter_config.insert("op".to_string(), json!("equals"));
    filter_config.insert("path".to_string(), json!("payload.action"));
    filter_config.insert("value".to_string(), json!("merged"));

    let route = RouteSpec {
        name: "r1".into(),
        when: WhenSpec { source: source.as_str().to_string(), event_types: vec![EventType::ResourceChanged], filter: Filter::default() },
        transforms: vec![TransformSpec { kind: "filter".to_string(), config: filter_config }],
        then: ThenSpec { actor: "act-1".to_string(), config: Map::new() },
        with: Map::new(),
    };
    let pipeline = RoutePipeline::build(&route, source, &deps()).expect("build");

    let mut event = base_event(source);
    event.payload.insert("action".to_string(), json!("opened"));
    match pipeline.run(event).await.expect("run") {
        PipelineOutcome::Dropped { transform_kind } => assert_eq!(transform_kind, "filter"),
        PipelineOutcome::Delivered(_) => panic!("expected a drop"),
    }
}

#[tokio::test]
async fn stages_run_in_declared_order() {
    let source = SourceInstanceId::new();
    let mut add_config = Map::new();
    let mut add = Map::new();
    add.insert("payload.stage1".to_string(), json!(true));
    add_config.insert("add".to_string(), serde_json::Value::Object(add));

    let mut template_config = Map::new();
    let mut template = Map::new();
    template.insert("payload.summary".to_string(), json!("stage1={{payload.stage1}}"));
    template_config.insert("template".to_string(), serde_json::Value::Object(template));

    let route = RouteSpec {
        name: "r1".into(),
        when: WhenSpec { source: source.as_str().to_string(), event_types: vec![EventType::ResourceChanged], filter: Filter::default() },
        transforms: vec![
            TransformSpec { kind: "enrich".to_string(), config: add_config },
            TransformSpec { kind: "enrich".to_string(), config: template_config },
        ],
        then: ThenSpec { actor: "act-1".to_string(), config: Map::new() },
        with: Map::new(),
    };
    let pipeline = RoutePipeline::build(&route, source, &deps()).expect("build");

    match pipeline.run(base_event(source)).await.expect("run") {
        PipelineOutcome::Delivered(event) => {
            assert_eq!(event.payload.get("stage1"), Some(&json!(true)));
            assert_eq!(event.payload.get("summary"), Some(&json!("stage1=true")));
        }
        PipelineOutcome::Dropped { .. } => panic!("expected delivery"),
    }
}
