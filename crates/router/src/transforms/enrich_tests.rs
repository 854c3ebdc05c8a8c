// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::Utc;
use orgloop_core::{EventType, RouteName, SourceInstanceId};
use serde_json::json;

fn event() -> Event {
    let mut e = Event {
        id: Default::default(),
        source: SourceInstanceId::new(),
        event_type: EventType::ResourceChanged,
        timestamp: Utc::now(),
        provenance: Default::default(),
        payload: Map::new(),
        fingerprint: None,
    };
    e.payload.insert("pr_number".to_string(), json!(42));
    e
}

fn ctx() -> TransformContext {
    TransformContext { route_name: RouteName::from("r1"), source: SourceInstanceId::new() }
}

#[tokio::test]
async fn add_inserts_a_static_value() {
    let mut add = Map::new();
    add.insert("payload.team".to_string(), json!("platform"));
    let mut config = Map::new();
    config.insert("add".to_string(), Value::Object(add));
    let t = EnrichTransform::from_config(&config).expect("build");

    let result = t.execute(event(), &ctx()).await.expect("execute").expect("passes");
    assert_eq!(result.payload.get("team"), Some(&json!("platform")));
}

#[tokio::test]
async fn copy_moves_a_value_between_dot_paths() {
    let mut copy = Map::new();
    copy.insert("payload.pr_number".to_string(), json!("provenance.pr_number"));
    let mut config = Map::new();
    config.insert("copy".to_string(), Value::Object(copy));
    let t = EnrichTransform::from_config(&config).expect("build");

    let result = t.execute(event(), &ctx()).await.expect("execute").expect("passes");
    assert_eq!(result.provenance.extra.get("pr_number"), Some(&json!(42)));
}

#[tokio::test]
async fn template_substitutes_dot_paths() {
    let mut template = Map::new();
    template.insert("payload.note".to_string(), json!("PR #{{payload.pr_number}}"));
    let mut config = Map::new();
    config.insert("template".to_string(), Value::Object(template));
    let t = EnrichTransform::from_config(&config).expect("build");

    let result = t.execute(event(), &ctx()).await.expect("execute").expect("passes");
    assert_eq!(result.payload.get("note"), Some(&json!("PR #42")));
}

#[test]
fn rejects_a_config_with_no_operations() {
    assert!(EnrichTransform::from_config(&Map::new()).is_err());
}
