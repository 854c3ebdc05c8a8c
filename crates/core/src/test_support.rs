// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-process fake connectors for deterministic tests, the analogue of the
//! teacher's `FakeAdapter`/`FakeAgentAdapter`/`FakeNotifyAdapter`.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]` so downstream
//! crates (`orgloop-router`, `orgloop-scheduler`, `orgloop-engine`, ...) can
//! depend on `orgloop-core`'s `test-support` feature instead of rebuilding
//! their own fakes.

use crate::event::Event;
use crate::logger::{Logger, LoggerError, ObserverEvent};
use crate::source::{
    Actor, ActorError, DeliverOutcome, PollOutcome, Source, SourceError, Transform,
    TransformContext, TransformError,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::collections::VecDeque;
use tokio_util::sync::CancellationToken;

/// A source whose `poll` responses are scripted in advance via
/// [`FakeSource::push_response`], consumed in FIFO order. Once the queue is
/// empty, further polls return an empty [`PollOutcome`] with the same
/// checkpoint it was given.
#[derive(Default)]
pub struct FakeSource {
    responses: Mutex<VecDeque<Result<PollOutcome, SourceError>>>,
    init_config: Mutex<Option<Map<String, Value>>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_response(&self, outcome: Result<PollOutcome, SourceError>) {
        self.responses.lock().push_back(outcome);
    }

    pub fn init_config(&self) -> Option<Map<String, Value>> {
        self.init_config.lock().clone()
    }
}

#[async_trait]
impl Source for FakeSource {
    async fn init(&mut self, config: &Map<String, Value>) -> Result<(), SourceError> {
        *self.init_config.lock() = Some(config.clone());
        Ok(())
    }

    async fn poll(
        &mut self,
        checkpoint: Option<&str>,
        _cancel: &CancellationToken,
    ) -> Result<PollOutcome, SourceError> {
        match self.responses.lock().pop_front() {
            Some(outcome) => outcome,
            None => Ok(PollOutcome { events: Vec::new(), checkpoint: checkpoint.map(String::from) }),
        }
    }

    async fn shutdown(&mut self) {}
}

/// An actor whose `deliver` responses are scripted in advance via
/// [`FakeActor::push_outcome`], consumed in FIFO order; every call is
/// recorded for later assertion via [`FakeActor::delivered_event_ids`].
#[derive(Default)]
pub struct FakeActor {
    outcomes: Mutex<VecDeque<DeliverOutcome>>,
    calls: Mutex<Vec<String>>,
}

impl FakeActor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_outcome(&self, outcome: DeliverOutcome) {
        self.outcomes.lock().push_back(outcome);
    }

    pub fn delivered_event_ids(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl Actor for FakeActor {
    async fn init(&mut self, _config: &Map<String, Value>) -> Result<(), ActorError> {
        Ok(())
    }

    async fn deliver(
        &self,
        event: &Event,
        _route_delivery_config: &Map<String, Value>,
        _cancel: &CancellationToken,
    ) -> DeliverOutcome {
        self.calls.lock().push(event.id.to_string());
        self.outcomes.lock().pop_front().unwrap_or_else(DeliverOutcome::delivered)
    }

    async fn shutdown(&mut self) {}
}

/// A transform backed by a plain closure, for tests that only need one
/// pipeline stage's behavior without writing a full connector.
pub struct FakeTransform<F>
where
    F: Fn(Event, &TransformContext) -> Option<Event> + Send + Sync,
{
    apply: F,
}

impl<F> FakeTransform<F>
where
    F: Fn(Event, &TransformContext) -> Option<Event> + Send + Sync,
{
    pub fn new(apply: F) -> Self {
        Self { apply }
    }
}

#[async_trait]
impl<F> Transform for FakeTransform<F>
where
    F: Fn(Event, &TransformContext) -> Option<Event> + Send + Sync,
{
    async fn init(&mut self, _config: &Map<String, Value>) -> Result<(), TransformError> {
        Ok(())
    }

    async fn execute(
        &self,
        event: Event,
        context: &TransformContext,
    ) -> Result<Option<Event>, TransformError> {
        Ok((self.apply)(event, context))
    }

    async fn shutdown(&mut self) {}
}

/// A logger that records every observed event in memory for assertions.
#[derive(Default)]
pub struct FakeLogger {
    observed: Mutex<Vec<ObserverEvent>>,
}

impl FakeLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ObserverEvent> {
        self.observed.lock().clone()
    }

    pub fn kinds(&self) -> Vec<&'static str> {
        self.observed.lock().iter().map(ObserverEvent::kind).collect()
    }
}

#[async_trait]
impl Logger for FakeLogger {
    async fn init(&mut self, _config: &Map<String, Value>) -> Result<(), LoggerError> {
        Ok(())
    }

    fn observe(&self, event: &ObserverEvent) {
        self.observed.lock().push(event.clone());
    }

    async fn shutdown(&mut self) {}
}

#[cfg(test)]
#[path = "test_support_tests.rs"]
mod tests;
