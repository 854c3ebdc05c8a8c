// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared "append a batch of events, then tell the observer bus about
//! each" helper used by every ingestion path (poll, webhook, hook).

use crate::error::SourceRunnerError;
use orgloop_core::{Event, ObserverEvent};
use orgloop_observer::ObserverBus;
use orgloop_wal::Wal;

/// Append every event in `events` to `wal`, in order, emitting
/// `event.accepted` for each. Stops at the first failure; callers that
/// need "only advance the checkpoint if every append succeeded" (§4.3)
/// should check the returned `Result` before calling `put`.
pub fn append_events(wal: &Wal, observer: &ObserverBus, events: &[Event]) -> Result<(), SourceRunnerError> {
    for event in events {
        let offset = wal.append(event).map_err(|source| SourceRunnerError::Wal { source_id: event.source.to_string(), source })?;
        observer.emit(ObserverEvent::EventAccepted { event_id: event.id, source: event.source, offset });
    }
    Ok(())
}

#[cfg(test)]
#[path = "ingest_tests.rs"]
mod tests;
