// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Webhook-mode ingestion registry (§4.3, §4.4).
//!
//! Unlike hook mode, a webhook body's shape is connector-specific (a
//! GitHub payload looks nothing like a generic `Event`), so translation is
//! a capability each webhook-mode source supplies. The listener looks a
//! source up here by id and hands it the raw request body.

use crate::error::SourceRunnerError;
use crate::ingest;
use async_trait::async_trait;
use orgloop_core::SourceError;
use orgloop_core::Event;
use orgloop_observer::ObserverBus;
use orgloop_wal::Wal;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Translates a raw webhook request body into zero or more events. Concrete
/// per-connector implementations are out of scope (§1); this crate only
/// defines the contract the listener dispatches through.
#[async_trait]
pub trait WebhookSource: Send + Sync {
    async fn translate(&self, body: &[u8]) -> Result<Vec<Event>, SourceError>;
}

/// `source_id -> WebhookSource`, populated by the engine supervisor for
/// every declared source running in webhook mode (§4.9).
#[derive(Default)]
pub struct WebhookRegistry {
    sources: RwLock<HashMap<String, Arc<dyn WebhookSource>>>,
}

impl WebhookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, source_id: impl Into<String>, source: Arc<dyn WebhookSource>) {
        self.sources.write().insert(source_id.into(), source);
    }

    pub fn contains(&self, source_id: &str) -> bool {
        self.sources.read().contains_key(source_id)
    }

    /// Translate and durably append a webhook body for `source_id`
    /// (§4.3, §4.4). Returns the number of events appended so the
    /// listener can decide between `202` and an error response.
    pub async fn ingest(&self, source_id: &str, body: &[u8], wal: &Wal, observer: &ObserverBus) -> Result<usize, SourceRunnerError> {
        let handler = self
            .sources
            .read()
            .get(source_id)
            .cloned()
            .ok_or_else(|| SourceRunnerError::UnknownWebhookSource { source_id: source_id.to_string() })?;
        let events = handler
            .translate(body)
            .await
            .map_err(|source| SourceRunnerError::Translate { source_id: source_id.to_string(), source })?;
        ingest::append_events(wal, observer, &events)?;
        Ok(events.len())
    }
}

#[cfg(test)]
#[path = "webhook_tests.rs"]
mod tests;
