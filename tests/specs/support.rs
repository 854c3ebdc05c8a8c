// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use async_trait::async_trait;
use chrono::Utc;
use orgloop_core::test_support::FakeLogger;
use orgloop_core::{
    ActorSpec, Event, EventType, Filter, Logger, LoggerError, ObserverEvent, Provenance,
    RouteName, RouteSpec, SourceInstanceId, SourceSpec, ThenSpec, TransformSpec, WhenSpec,
};
use orgloop_engine::EngineConfig;
use orgloop_sources::PollConfig;
use serde_json::{Map, Value};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

pub fn loopback_any_port() -> SocketAddr {
    SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0)
}

pub fn engine_config(data_dir: impl Into<PathBuf>) -> EngineConfig {
    let mut config = EngineConfig::new(data_dir);
    config.listener.addr = loopback_any_port();
    config
}

/// A fast poll interval: real integration tests still run on the real
/// clock (only the unit-level sweep tests pause it), so every scenario
/// that drives a poll source uses an interval in the low milliseconds.
pub fn fast_poll_config() -> PollConfig {
    PollConfig::new(Duration::from_millis(5))
}

pub fn event(source: impl Into<SourceInstanceId>, payload: Map<String, Value>) -> Event {
    event_with_provenance(source, payload, Provenance::default())
}

pub fn event_with_provenance(
    source: impl Into<SourceInstanceId>,
    payload: Map<String, Value>,
    provenance: Provenance,
) -> Event {
    Event {
        id: orgloop_core::EventId::new(),
        source: source.into(),
        event_type: EventType::ResourceChanged,
        timestamp: Utc::now(),
        provenance,
        payload,
        fingerprint: None,
    }
}

pub fn route(name: &str, source: &str, actor: &str, transforms: Vec<TransformSpec>) -> RouteSpec {
    route_with_filter(name, source, actor, transforms, Filter::default())
}

pub fn route_with_filter(name: &str, source: &str, actor: &str, transforms: Vec<TransformSpec>, filter: Filter) -> RouteSpec {
    RouteSpec {
        name: RouteName(name.to_string()),
        when: WhenSpec { source: source.to_string(), event_types: vec![EventType::ResourceChanged], filter },
        transforms,
        then: ThenSpec { actor: actor.to_string(), config: Map::new() },
        with: Map::new(),
    }
}

pub fn source_spec(id: &str) -> SourceSpec {
    SourceSpec { id: id.into(), connector: "fake".to_string(), config: Map::new() }
}

pub fn actor_spec(id: &str) -> ActorSpec {
    ActorSpec { id: id.into(), connector: "fake".to_string(), config: Map::new() }
}

/// `Engine::start` takes ownership of every logger it's handed, so a test
/// that needs to assert on observed events afterward registers this
/// wrapper instead of a bare `FakeLogger` and keeps its own `Arc` clone.
struct ForwardingLogger(Arc<FakeLogger>);

#[async_trait]
impl Logger for ForwardingLogger {
    async fn init(&mut self, _config: &Map<String, Value>) -> Result<(), LoggerError> {
        Ok(())
    }

    fn observe(&self, event: &ObserverEvent) {
        self.0.observe(event);
    }

    async fn shutdown(&mut self) {}
}

/// An observable logger handle plus the boxed `Logger` to hand to
/// `Engine::start`'s `extra_loggers`.
pub fn observed_logger(name: &str) -> (Arc<FakeLogger>, (String, Box<dyn Logger>)) {
    let logger = Arc::new(FakeLogger::new());
    let boxed: Box<dyn Logger> = Box::new(ForwardingLogger(Arc::clone(&logger)));
    (logger, (name.to_string(), boxed))
}

/// Poll the predicate up to `attempts` times, sleeping `step` between
/// checks, instead of sleeping a single fixed guess — the scenarios here
/// race a background poll/router/scheduler chain whose exact timing isn't
/// worth pinning down.
pub async fn wait_until(mut attempts: u32, step: Duration, mut predicate: impl FnMut() -> bool) -> bool {
    loop {
        if predicate() {
            return true;
        }
        if attempts == 0 {
            return false;
        }
        attempts -= 1;
        tokio::time::sleep(step).await;
    }
}
