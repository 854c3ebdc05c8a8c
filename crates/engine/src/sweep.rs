// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Two periodic background sweeps the supervisor owns (SPEC_FULL §C):
//! expiring dedup fingerprints in the checkpoint store, and compacting
//! WAL segments per the resolved `CompactionPolicy` (§9 open question).

use orgloop_checkpoint::CheckpointStore;
use orgloop_wal::{CompactionPolicy, Wal};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub async fn run_checkpoint_sweep(
    checkpoints: Arc<CheckpointStore>,
    interval: Duration,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = tokio::time::sleep(interval) => {}
        }
        if let Err(err) = checkpoints.sweep_expired(chrono::Utc::now()) {
            tracing::warn!(error = %err, "checkpoint dedup sweep failed");
        }
    }
}

pub async fn run_compaction_sweep(
    wal: Arc<Wal>,
    policy: CompactionPolicy,
    interval: Duration,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = tokio::time::sleep(interval) => {}
        }
        let metas = match wal.segment_metas() {
            Ok(metas) => metas,
            Err(err) => {
                tracing::warn!(error = %err, "failed to read WAL segment metadata for compaction");
                continue;
            }
        };
        if let Some(before_offset) = policy.compaction_point(&metas, std::time::SystemTime::now()) {
            if let Err(err) = wal.truncate(before_offset) {
                tracing::warn!(error = %err, before_offset, "WAL compaction truncate failed");
            } else {
                tracing::info!(before_offset, "compacted WAL segments");
            }
        }
    }
}

#[cfg(test)]
#[path = "sweep_tests.rs"]
mod tests;
