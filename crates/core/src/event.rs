// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `Event` wire type: the one thing that crosses the WAL boundary.
//!
//! Events are immutable once appended (§3). Everything downstream — the
//! router, the transform pipeline, the scheduler — operates on owned clones
//! of an `Event`; mutation always produces a new value.

use crate::spec::SourceInstanceId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

crate::define_id! {
    /// Globally-unique, time-ordered event identifier.
    pub struct EventId("evt-");
}

/// The fixed set of event types the engine understands. Connectors emit one
/// of these; the route matcher indexes on it directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    #[serde(rename = "resource.changed")]
    ResourceChanged,
    #[serde(rename = "actor.stopped")]
    ActorStopped,
    #[serde(rename = "message.received")]
    MessageReceived,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ResourceChanged => "resource.changed",
            Self::ActorStopped => "actor.stopped",
            Self::MessageReceived => "message.received",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "resource.changed" => Ok(Self::ResourceChanged),
            "actor.stopped" => Ok(Self::ActorStopped),
            "message.received" => Ok(Self::MessageReceived),
            other => Err(format!("unknown event type: {other}")),
        }
    }
}

/// `{platform, platform_event, author, author_type, ...arbitrary}` per §3.
/// The four named keys are the ones the router and built-in transforms
/// dot-path into most often; anything else a connector attaches rides along
/// in `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Provenance {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform_event: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_type: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An event accepted into the bus. Immutable once appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub source: SourceInstanceId,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub provenance: Provenance,
    #[serde(default)]
    pub payload: Map<String, Value>,
    /// Set by the `dedup` transform once it has computed a content hash;
    /// absent on events that have not passed through a dedup stage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
}

impl Event {
    /// Resolve a dot-path (e.g. `provenance.platform_event`, `payload.pr_number`)
    /// against the full serialized event. Used by the route matcher's filter
    /// grammar and by the `enrich`/`filter` transforms.
    pub fn resolve_path(&self, path: &str) -> Option<Value> {
        let root = serde_json::to_value(self).ok()?;
        path.split('.').try_fold(root, |value, segment| match value {
            Value::Object(mut map) => map.remove(segment),
            _ => None,
        })
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
