// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `dedup` transform (§4.6): content-hash fingerprint over configured
//! fields, checked and recorded against the checkpoint store's per-source
//! dedup window (§4.2, invariant 2 §3).

use async_trait::async_trait;
use chrono::{Duration, Utc};
use orgloop_checkpoint::CheckpointStore;
use orgloop_core::{compute_fingerprint, Event, Transform, TransformContext, TransformError};
use serde_json::{Map, Value};
use std::sync::Arc;

pub struct DedupTransform {
    fields: Vec<String>,
    ttl: Duration,
    checkpoints: Arc<CheckpointStore>,
}

impl DedupTransform {
    pub fn from_config(config: &Map<String, Value>, checkpoints: Arc<CheckpointStore>) -> Result<Self, String> {
        let fields: Vec<String> = config
            .get("fields")
            .and_then(Value::as_array)
            .ok_or("dedup transform requires a \"fields\" array")?
            .iter()
            .map(|v| v.as_str().map(str::to_string).ok_or("\"fields\" entries must be strings"))
            .collect::<Result<_, _>>()?;
        if fields.is_empty() {
            return Err("dedup transform requires at least one field".to_string());
        }
        let ttl_secs = config.get("ttl_secs").and_then(Value::as_u64).ok_or("dedup transform requires \"ttl_secs\"")?;
        Ok(Self { fields, ttl: Duration::seconds(ttl_secs as i64), checkpoints })
    }
}

#[async_trait]
impl Transform for DedupTransform {
    async fn init(&mut self, _config: &Map<String, Value>) -> Result<(), TransformError> {
        Ok(())
    }

    async fn execute(
        &self,
        mut event: Event,
        _context: &TransformContext,
    ) -> Result<Option<Event>, TransformError> {
        let fingerprint = compute_fingerprint(&event, &self.fields);
        let now = Utc::now();

        if self.checkpoints.seen(event.source, &fingerprint, now) {
            return Ok(None);
        }

        self.checkpoints
            .observe_fingerprint(event.source, fingerprint.clone(), now + self.ttl, now)
            .map_err(|e| TransformError::ExecuteFailed(e.to_string()))?;

        event.fingerprint = Some(fingerprint);
        Ok(Some(event))
    }

    async fn shutdown(&mut self) {}
}

#[cfg(test)]
#[path = "dedup_tests.rs"]
mod tests;
