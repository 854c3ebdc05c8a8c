// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `Checkpoint` data type (§3, §4.2, §6).
//!
//! Field names here mirror the on-disk wire format exactly
//! (`{cursor, updated_at, dedup: [{fp, expires_at}, ...]}`); `source_id` is
//! not part of the wire format (it is encoded in the checkpoint file's
//! path) and is filled in by `orgloop-checkpoint` when a file is loaded.

use crate::spec::SourceInstanceId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry in a checkpoint's dedup window: a fingerprint and the instant
/// it expires from the window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DedupEntry {
    #[serde(rename = "fp")]
    pub fingerprint: String,
    pub expires_at: DateTime<Utc>,
}

impl DedupEntry {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }
}

/// `{source_id, cursor, updated_at, dedup_entries}` — persisted cursor and
/// dedup window for one source instance.
///
/// Invariant (§3.4): `updated_at` is monotonically non-decreasing per
/// `source_id`; callers should use [`Checkpoint::advance`] rather than
/// constructing a new value directly, so the invariant cannot be violated
/// by a stray assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    #[serde(skip)]
    pub source_id: SourceInstanceId,
    pub cursor: Option<String>,
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "dedup", default)]
    pub dedup_entries: Vec<DedupEntry>,
}

impl Checkpoint {
    /// A fresh, never-persisted checkpoint for a source that has not yet
    /// completed a poll cycle.
    pub fn empty(source_id: SourceInstanceId, now: DateTime<Utc>) -> Self {
        Self { source_id, cursor: None, updated_at: now, dedup_entries: Vec::new() }
    }

    /// Replace the cursor and bump `updated_at`, enforcing the
    /// monotonic-non-decreasing invariant. `now` is clamped up to the
    /// previous `updated_at` if a caller races against a clock that went
    /// backwards.
    pub fn advance(&mut self, cursor: Option<String>, now: DateTime<Utc>) {
        self.cursor = cursor;
        self.updated_at = now.max(self.updated_at);
    }

    /// True if `fingerprint` is present and not yet expired relative to `now`.
    pub fn seen(&self, fingerprint: &str, now: DateTime<Utc>) -> bool {
        self.dedup_entries
            .iter()
            .any(|entry| entry.fingerprint == fingerprint && !entry.is_expired(now))
    }

    /// Record a fingerprint with the given expiry, replacing any existing
    /// entry for the same fingerprint.
    pub fn observe_fingerprint(&mut self, fingerprint: String, expires_at: DateTime<Utc>) {
        self.dedup_entries.retain(|e| e.fingerprint != fingerprint);
        self.dedup_entries.push(DedupEntry { fingerprint, expires_at });
    }

    /// Drop dedup entries that have expired as of `now`.
    pub fn prune_expired(&mut self, now: DateTime<Utc>) {
        self.dedup_entries.retain(|e| !e.is_expired(now));
    }
}

#[cfg(test)]
#[path = "checkpoint_tests.rs"]
mod tests;
