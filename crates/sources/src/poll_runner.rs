// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Poll-mode source runner (§4.3).

use crate::config::PollConfig;
use crate::ingest;
use orgloop_checkpoint::CheckpointStore;
use orgloop_core::{Checkpoint, ObserverEvent, Source, SourceError, SourceInstanceId};
use orgloop_observer::ObserverBus;
use orgloop_wal::Wal;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn jittered_delay(interval: Duration, jitter: f64) -> Duration {
    let factor = 1.0 + rand::rng().random_range(-jitter..=jitter);
    Duration::from_secs_f64((interval.as_secs_f64() * factor).max(0.0))
}

/// Drive one poll-mode source for its entire lifetime: wait a jittered
/// interval, poll, durably append every returned event, and only then
/// advance the checkpoint (§4.3 invariant: checkpoints are never advanced
/// ahead of what is durably in the bus). Transient errors are logged and
/// retried next tick without moving the checkpoint; a fatal error stops
/// this source (other sources are unaffected, §7).
pub async fn run_poll_source(
    source_id: SourceInstanceId,
    mut source: Box<dyn Source>,
    wal: Arc<Wal>,
    checkpoints: Arc<CheckpointStore>,
    observer: Arc<ObserverBus>,
    config: PollConfig,
    cancel: CancellationToken,
) {
    loop {
        let delay = jittered_delay(config.interval, config.jitter);
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(delay) => {}
        }
        if cancel.is_cancelled() {
            break;
        }

        let cursor = checkpoints.get(source_id).and_then(|cp| cp.cursor.clone());
        let outcome = match source.poll(cursor.as_deref(), &cancel).await {
            Ok(outcome) => outcome,
            Err(SourceError::Transient(message)) => {
                tracing::warn!(source = %source_id, error = %message, "transient source poll error, retrying next tick");
                continue;
            }
            Err(SourceError::Fatal(message)) => {
                tracing::error!(source = %source_id, error = %message, "fatal source error, stopping source runner");
                break;
            }
        };

        observer.emit(ObserverEvent::SourcePolled { source: source_id, events_emitted: outcome.events.len() });

        if let Err(err) = ingest::append_events(&wal, &observer, &outcome.events) {
            tracing::warn!(source = %source_id, error = %err, "failed to append polled events, checkpoint not advanced");
            continue;
        }

        if let Some(new_cursor) = outcome.checkpoint {
            let now = chrono::Utc::now();
            let mut checkpoint =
                checkpoints.get(source_id).map(|cp| (*cp).clone()).unwrap_or_else(|| Checkpoint::empty(source_id, now));
            checkpoint.advance(Some(new_cursor), now);
            if let Err(err) = checkpoints.put(checkpoint) {
                tracing::warn!(source = %source_id, error = %err, "failed to persist checkpoint after successful poll");
            }
        }
    }

    source.shutdown().await;
}

#[cfg(test)]
#[path = "poll_runner_tests.rs"]
mod tests;
