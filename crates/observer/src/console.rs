// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use async_trait::async_trait;
use orgloop_core::{Logger, LoggerError, ObserverEvent};
use serde_json::{Map, Value};

/// The always-available logger: structured `tracing` lines, one per
/// observer event, using the same `key=value` field style as the rest of
/// the engine. Every deployment gets this logger registered even if no
/// other sink is configured.
#[derive(Debug, Default)]
pub struct ConsoleLogger;

#[async_trait]
impl Logger for ConsoleLogger {
    async fn init(&mut self, _config: &Map<String, Value>) -> Result<(), LoggerError> {
        Ok(())
    }

    fn observe(&self, event: &ObserverEvent) {
        match event {
            ObserverEvent::SourcePolled { source, events_emitted } => {
                tracing::info!(kind = "source.polled", source = %source, events_emitted, "source polled");
            }
            ObserverEvent::EventAccepted { event_id, source, offset } => {
                tracing::info!(kind = "event.accepted", event_id = %event_id, source = %source, offset, "event accepted");
            }
            ObserverEvent::RouteMatched { event_id, route_name } => {
                tracing::info!(kind = "route.matched", event_id = %event_id, route = %route_name, "route matched");
            }
            ObserverEvent::TransformDropped { event_id, route_name, transform_kind } => {
                tracing::info!(kind = "transform.dropped", event_id = %event_id, route = %route_name, transform = transform_kind.as_str(), "event dropped by transform");
            }
            ObserverEvent::DeliveryAttempt { attempt } => {
                tracing::info!(
                    kind = "delivery.attempt",
                    event_id = %attempt.event_id,
                    route = %attempt.route_name,
                    actor = %attempt.actor_id,
                    attempt_n = attempt.attempt_n,
                    status = ?attempt.status,
                    "delivery attempt",
                );
            }
            ObserverEvent::DeliveryResult { attempt } => {
                tracing::info!(
                    kind = "delivery.result",
                    event_id = %attempt.event_id,
                    route = %attempt.route_name,
                    actor = %attempt.actor_id,
                    attempt_n = attempt.attempt_n,
                    status = ?attempt.status,
                    error = attempt.error.as_deref().unwrap_or(""),
                    "delivery result",
                );
            }
            ObserverEvent::EngineLifecycle { phase, message } => {
                tracing::info!(kind = "engine.lifecycle", phase = phase.as_str(), message = message.as_str(), "engine lifecycle");
            }
        }
    }

    async fn shutdown(&mut self) {}
}

#[cfg(test)]
#[path = "console_tests.rs"]
mod tests;
