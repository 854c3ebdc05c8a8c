// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors surfaced by the checkpoint store.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("IO error for source {source_id}: {source}")]
    Io { source_id: String, #[source] source: std::io::Error },

    #[error("failed to serialize checkpoint for source {source_id}: {source}")]
    Encode { source_id: String, #[source] source: serde_json::Error },

    #[error("failed to parse checkpoint for source {source_id}: {source}")]
    Decode { source_id: String, #[source] source: serde_json::Error },
}
