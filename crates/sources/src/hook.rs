// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Hook-mode NDJSON ingestion (§4.3, SPEC_FULL §C): one event per line, no
//! connector-specific translation since the line itself already carries
//! the event's shape. Usable over stdin or any other `AsyncRead` (the
//! listener's `POST /hooks/{hook_name}` reuses [`parse_hook_line`] for a
//! single-line body).

use crate::error::SourceRunnerError;
use crate::ingest;
use orgloop_core::{Event, EventId, EventType, Provenance, SourceInstanceId};
use orgloop_observer::ObserverBus;
use orgloop_wal::Wal;
use parking_lot::RwLock;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio_util::sync::CancellationToken;

#[derive(Debug, Deserialize)]
struct HookLine {
    #[serde(rename = "type")]
    event_type: EventType,
    #[serde(default)]
    payload: Map<String, Value>,
    #[serde(default)]
    provenance: Provenance,
}

/// Parse one NDJSON line into an `Event`, minting a fresh id and
/// timestamp (the forwarder only supplies `type`/`payload`/`provenance`).
pub fn parse_hook_line(source_id: SourceInstanceId, line: &str, now: chrono::DateTime<chrono::Utc>) -> Result<Event, SourceRunnerError> {
    let parsed: HookLine = serde_json::from_str(line).map_err(|e| SourceRunnerError::MalformedHookLine(e.to_string()))?;
    Ok(Event {
        id: EventId::new(),
        source: source_id,
        event_type: parsed.event_type,
        timestamp: now,
        provenance: parsed.provenance,
        payload: parsed.payload,
        fingerprint: None,
    })
}

/// Drive one hook-mode source for its entire lifetime: read NDJSON lines
/// from `reader`, appending each successfully parsed event to the bus.
/// A malformed line is logged and skipped; it never kills the reader.
pub async fn run_hook_reader<R>(
    source_id: SourceInstanceId,
    reader: R,
    wal: Arc<Wal>,
    observer: Arc<ObserverBus>,
    cancel: CancellationToken,
) where
    R: AsyncRead + Unpin + Send,
{
    let mut lines = BufReader::new(reader).lines();
    loop {
        let next = tokio::select! {
            _ = cancel.cancelled() => break,
            line = lines.next_line() => line,
        };
        match next {
            Ok(Some(line)) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                match parse_hook_line(source_id, line, chrono::Utc::now()) {
                    Ok(event) => {
                        if let Err(err) = ingest::append_events(&wal, &observer, std::slice::from_ref(&event)) {
                            tracing::warn!(source = %source_id, error = %err, "failed to append hook event");
                        }
                    }
                    Err(err) => tracing::warn!(source = %source_id, error = %err, line, "dropping malformed hook line"),
                }
            }
            Ok(None) => break,
            Err(err) => {
                tracing::warn!(source = %source_id, error = %err, "hook reader io error");
                break;
            }
        }
    }
}

/// `hook_name -> SourceInstanceId`, populated by the engine supervisor for
/// every declared source running in hook mode that also accepts HTTP
/// delivery (§4.4). Hook lines are generic, so unlike `WebhookRegistry`
/// this only needs to resolve a name, not dispatch to per-connector code.
#[derive(Default)]
pub struct HookRegistry {
    names: RwLock<HashMap<String, SourceInstanceId>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, hook_name: impl Into<String>, source_id: SourceInstanceId) {
        self.names.write().insert(hook_name.into(), source_id);
    }

    pub fn contains(&self, hook_name: &str) -> bool {
        self.names.read().contains_key(hook_name)
    }

    /// Parse `body` — NDJSON or a single JSON object (§4.4) — for the
    /// source registered under `hook_name` and durably append every line.
    /// Unlike [`run_hook_reader`]'s tolerant streaming loop, a malformed
    /// line here fails the whole request: HTTP callers get one chance to
    /// retry a well-formed body rather than silently losing a line.
    pub fn ingest(&self, hook_name: &str, body: &str, wal: &Wal, observer: &ObserverBus) -> Result<usize, SourceRunnerError> {
        let source_id = self
            .names
            .read()
            .get(hook_name)
            .copied()
            .ok_or_else(|| SourceRunnerError::UnknownHookName { hook_name: hook_name.to_string() })?;
        let now = chrono::Utc::now();
        let events = body
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| parse_hook_line(source_id, line, now))
            .collect::<Result<Vec<_>, _>>()?;
        if events.is_empty() {
            return Err(SourceRunnerError::MalformedHookLine("empty body".to_string()));
        }
        ingest::append_events(wal, observer, &events)?;
        Ok(events.len())
    }
}

#[cfg(test)]
#[path = "hook_tests.rs"]
mod tests;
