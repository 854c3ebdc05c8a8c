// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The observer taxonomy and `Logger` connector contract (§4.8, §6).
//!
//! `ObserverEvent` is the fixed, closed set of events the observer bus fans
//! out; `Logger` is the sink contract. The bus itself (buffering,
//! drop-on-full, fan-out to multiple loggers) lives in `orgloop-observer` —
//! this crate only defines the shape both sides agree on.

use crate::delivery::DeliveryAttempt;
use crate::event::EventId;
use crate::route::RouteName;
use crate::spec::SourceInstanceId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("logger init failed: {0}")]
    InitFailed(String),
}

/// The fixed taxonomy of events tapped at every pipeline stage (§4.8).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ObserverEvent {
    #[serde(rename = "source.polled")]
    SourcePolled { source: SourceInstanceId, events_emitted: usize },

    #[serde(rename = "event.accepted")]
    EventAccepted { event_id: EventId, source: SourceInstanceId, offset: u64 },

    #[serde(rename = "route.matched")]
    RouteMatched { event_id: EventId, route_name: RouteName },

    #[serde(rename = "transform.dropped")]
    TransformDropped { event_id: EventId, route_name: RouteName, transform_kind: String },

    #[serde(rename = "delivery.attempt")]
    DeliveryAttempt { attempt: DeliveryAttempt },

    #[serde(rename = "delivery.result")]
    DeliveryResult { attempt: DeliveryAttempt },

    #[serde(rename = "engine.lifecycle")]
    EngineLifecycle { phase: String, message: String },
}

impl ObserverEvent {
    /// The taxonomy key, e.g. `"delivery.attempt"`. Used for per-kind
    /// metrics and for the `tracing` span name loggers attach to.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SourcePolled { .. } => "source.polled",
            Self::EventAccepted { .. } => "event.accepted",
            Self::RouteMatched { .. } => "route.matched",
            Self::TransformDropped { .. } => "transform.dropped",
            Self::DeliveryAttempt { .. } => "delivery.attempt",
            Self::DeliveryResult { .. } => "delivery.result",
            Self::EngineLifecycle { .. } => "engine.lifecycle",
        }
    }
}

/// A sink for observer events: console, file, OTLP, syslog, ... (§1, out of
/// scope beyond this contract). `observe` is synchronous and MUST NOT
/// block — the observer bus already guarantees non-blocking fan-out by
/// dropping on a full per-logger buffer, but a logger that does its own
/// blocking I/O inside `observe` would defeat that guarantee.
#[async_trait]
pub trait Logger: Send + Sync {
    async fn init(&mut self, config: &Map<String, Value>) -> Result<(), LoggerError>;

    fn observe(&self, event: &ObserverEvent);

    async fn shutdown(&mut self);
}

#[cfg(test)]
#[path = "logger_tests.rs"]
mod tests;
