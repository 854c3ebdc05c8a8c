// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceRunnerError {
    #[error("wal append failed for source {source_id}: {source}")]
    Wal {
        source_id: String,
        #[source]
        source: orgloop_wal::WalError,
    },
    #[error("checkpoint write failed for source {source_id}: {source}")]
    Checkpoint {
        source_id: String,
        #[source]
        source: orgloop_checkpoint::CheckpointError,
    },
    #[error("malformed hook line: {0}")]
    MalformedHookLine(String),
    #[error("source {source_id} not registered for webhook delivery")]
    UnknownWebhookSource { source_id: String },
    #[error("hook {hook_name} not registered to any source")]
    UnknownHookName { hook_name: String },
    #[error("webhook translation failed for source {source_id}: {source}")]
    Translate {
        source_id: String,
        #[source]
        source: orgloop_core::SourceError,
    },
}
