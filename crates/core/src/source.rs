// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Connector contracts: `Source`, `Actor`, `Transform` (§6).
//!
//! These are the boundary between the engine core and plugins. The core
//! never knows a concrete connector type (§9 "Polymorphism") — it only ever
//! holds a `Box<dyn Source>` / `Arc<dyn Actor>` / `Box<dyn Transform>`.
//! Concrete connector implementations are out of scope (§1); this crate
//! only defines the trait boundary plus the in-process fakes used to test
//! it (see [`crate::test_support`]).

use crate::event::Event;
use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Error)]
pub enum SourceError {
    /// Logged; checkpoint not advanced; retried on the next poll tick (§7).
    #[error("transient source error: {0}")]
    Transient(String),
    /// Source is disabled; other sources continue (§7).
    #[error("fatal source error: {0}")]
    Fatal(String),
}

#[derive(Debug, Error)]
pub enum ActorError {
    #[error("actor init failed: {0}")]
    InitFailed(String),
}

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("transform init failed: {0}")]
    InitFailed(String),
    #[error("transform execute failed: {0}")]
    ExecuteFailed(String),
}

/// What a `poll()` call returns: the batch of newly observed events plus
/// the opaque cursor to persist once they are durably appended (§4.3).
#[derive(Debug, Clone, Default)]
pub struct PollOutcome {
    pub events: Vec<Event>,
    pub checkpoint: Option<String>,
}

/// Emits events into the bus: polling, webhook ingestion, or NDJSON hook
/// forwarding (§4.3).
#[async_trait]
pub trait Source: Send + Sync {
    async fn init(&mut self, config: &Map<String, Value>) -> Result<(), SourceError>;

    /// Only meaningful for poll-mode sources; webhook/hook sources emit
    /// events through their own registered paths instead.
    async fn poll(
        &mut self,
        checkpoint: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<PollOutcome, SourceError>;

    async fn shutdown(&mut self);
}

/// What `deliver()` resolved to, independent of whether this was a
/// terminal or retryable outcome — the scheduler decides that (§4.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliverResult {
    Delivered,
    Rejected,
    Error,
}

#[derive(Debug, Clone)]
pub struct DeliverOutcome {
    pub result: DeliverResult,
    pub error: Option<String>,
}

impl DeliverOutcome {
    pub fn delivered() -> Self {
        Self { result: DeliverResult::Delivered, error: None }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self { result: DeliverResult::Rejected, error: Some(message.into()) }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { result: DeliverResult::Error, error: Some(message.into()) }
    }
}

/// Terminal recipient of delivered events (§6). `deliver` takes `&self`
/// because actor instances are shared across a worker pool and MUST be
/// safe to invoke concurrently (§5).
#[async_trait]
pub trait Actor: Send + Sync {
    async fn init(&mut self, config: &Map<String, Value>) -> Result<(), ActorError>;

    async fn deliver(
        &self,
        event: &Event,
        route_delivery_config: &Map<String, Value>,
        cancel: &CancellationToken,
    ) -> DeliverOutcome;

    async fn shutdown(&mut self);
}

/// Per-route-instance context handed to a transform on every `execute`
/// call. Transform state is per-route-instance (§5); nothing here is
/// shared across routes.
#[derive(Debug, Clone)]
pub struct TransformContext {
    pub route_name: crate::route::RouteName,
    pub source: crate::spec::SourceInstanceId,
}

/// A per-route pipeline stage. Returning `Ok(None)` drops the event from
/// this route only (§4.6). Implementations MUST be re-entrancy-safe across
/// concurrent events on different routes, since route pipelines run
/// independently.
#[async_trait]
pub trait Transform: Send + Sync {
    async fn init(&mut self, config: &Map<String, Value>) -> Result<(), TransformError>;

    async fn execute(
        &self,
        event: Event,
        context: &TransformContext,
    ) -> Result<Option<Event>, TransformError>;

    async fn shutdown(&mut self);
}

#[cfg(test)]
#[path = "source_tests.rs"]
mod tests;
