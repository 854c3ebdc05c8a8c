// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `gate` transform (§4.6): consults an external [`GateCapability`]
//! and drops the event if the gate is closed. Fails open on capability
//! error, per spec — a broken capability check must never silently start
//! dropping every event on a route.

use super::GateCapability;
use async_trait::async_trait;
use orgloop_core::{Event, Transform, TransformContext, TransformError};
use serde_json::{Map, Value};
use std::sync::Arc;

pub struct GateTransform {
    capability: Arc<dyn GateCapability>,
    config: Map<String, Value>,
}

impl GateTransform {
    pub fn new(capability: Arc<dyn GateCapability>, config: Map<String, Value>) -> Self {
        Self { capability, config }
    }
}

#[async_trait]
impl Transform for GateTransform {
    async fn init(&mut self, _config: &Map<String, Value>) -> Result<(), TransformError> {
        Ok(())
    }

    async fn execute(
        &self,
        event: Event,
        context: &TransformContext,
    ) -> Result<Option<Event>, TransformError> {
        match self.capability.is_open(&self.config).await {
            Ok(true) => Ok(Some(event)),
            Ok(false) => Ok(None),
            Err(message) => {
                tracing::warn!(
                    route_name = %context.route_name,
                    error = %message,
                    "gate capability error, failing open"
                );
                Ok(Some(event))
            }
        }
    }

    async fn shutdown(&mut self) {}
}

#[cfg(test)]
#[path = "gate_tests.rs"]
mod tests;
