// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors surfaced by the durable event bus.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize event: {0}")]
    Encode(#[from] serde_json::Error),

    /// CRC mismatch in a segment that is not the tail segment. Fatal —
    /// the engine refuses to start (§7 `BusCorruption`).
    #[error("WAL corruption in segment starting at offset {segment_start}, byte {byte_offset}")]
    Corruption { segment_start: u64, byte_offset: u64 },

    #[error("requested offset {0} precedes the oldest retained segment")]
    OffsetTruncated(u64),
}
