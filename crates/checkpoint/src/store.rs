// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The per-source checkpoint store (§4.2).
//!
//! One JSON file per source, written via write-temp-then-rename so a crash
//! mid-write never leaves a half-written checkpoint behind — the rename is
//! the only thing that makes a new version visible. Writes are serialized
//! per `source_id` via a dedicated write lock; reads take a brief read lock
//! over an in-memory snapshot cache rather than touching disk, so they
//! never block on a concurrent writer for long.

use crate::error::CheckpointError;
use chrono::{DateTime, Utc};
use orgloop_core::{Checkpoint, SourceInstanceId};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// File-per-source JSON checkpoint store, rooted at a directory.
pub struct CheckpointStore {
    dir: PathBuf,
    snapshots: RwLock<HashMap<SourceInstanceId, Arc<Checkpoint>>>,
    write_locks: RwLock<HashMap<SourceInstanceId, Arc<Mutex<()>>>>,
}

fn checkpoint_path(dir: &Path, source_id: SourceInstanceId) -> PathBuf {
    dir.join(format!("{}.json", source_id.as_str()))
}

impl CheckpointStore {
    /// Open (or create) a checkpoint store rooted at `dir`, eagerly loading
    /// every `*.json` file already present so `get` never has to touch disk.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, CheckpointError> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir).map_err(|source| CheckpointError::Io {
            source_id: dir.display().to_string(),
            source,
        })?;

        let mut snapshots = HashMap::new();
        let entries = std::fs::read_dir(&dir).map_err(|source| CheckpointError::Io {
            source_id: dir.display().to_string(),
            source,
        })?;
        for entry in entries {
            let entry = entry.map_err(|source| CheckpointError::Io {
                source_id: dir.display().to_string(),
                source,
            })?;
            let path = entry.path();
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else { continue };
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let source_id = SourceInstanceId::from_string(stem);
            let bytes = std::fs::read(&path).map_err(|source| CheckpointError::Io {
                source_id: stem.to_string(),
                source,
            })?;
            let mut checkpoint: Checkpoint = serde_json::from_slice(&bytes)
                .map_err(|source| CheckpointError::Decode { source_id: stem.to_string(), source })?;
            checkpoint.source_id = source_id;
            snapshots.insert(source_id, Arc::new(checkpoint));
        }

        Ok(Self { dir, snapshots: RwLock::new(snapshots), write_locks: RwLock::new(HashMap::new()) })
    }

    fn write_lock_for(&self, source_id: SourceInstanceId) -> Arc<Mutex<()>> {
        if let Some(lock) = self.write_locks.read().get(&source_id) {
            return Arc::clone(lock);
        }
        Arc::clone(self.write_locks.write().entry(source_id).or_insert_with(|| Arc::new(Mutex::new(()))))
    }

    /// A lock-free snapshot read of the current checkpoint for `source_id`,
    /// if one has ever been persisted.
    pub fn get(&self, source_id: SourceInstanceId) -> Option<Arc<Checkpoint>> {
        self.snapshots.read().get(&source_id).cloned()
    }

    /// Persist `checkpoint`, replacing the in-memory snapshot only after the
    /// write-temp-then-rename completes. Serialized per `source_id`.
    pub fn put(&self, checkpoint: Checkpoint) -> Result<(), CheckpointError> {
        let source_id = checkpoint.source_id;
        let lock = self.write_lock_for(source_id);
        let _guard = lock.lock();

        let path = checkpoint_path(&self.dir, source_id);
        let tmp_path = path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(&checkpoint)
            .map_err(|source| CheckpointError::Encode { source_id: source_id.to_string(), source })?;
        std::fs::write(&tmp_path, &bytes)
            .map_err(|source| CheckpointError::Io { source_id: source_id.to_string(), source })?;
        std::fs::rename(&tmp_path, &path)
            .map_err(|source| CheckpointError::Io { source_id: source_id.to_string(), source })?;

        self.snapshots.write().insert(source_id, Arc::new(checkpoint));
        tracing::debug!(source_id = %source_id, "persisted checkpoint");
        Ok(())
    }

    /// True if `fingerprint` is present in `source_id`'s dedup window and
    /// has not yet expired as of `now` (§4.6 `dedup` transform).
    pub fn seen(&self, source_id: SourceInstanceId, fingerprint: &str, now: DateTime<Utc>) -> bool {
        self.get(source_id).map(|cp| cp.seen(fingerprint, now)).unwrap_or(false)
    }

    /// Record a fingerprint with the given TTL, creating an empty
    /// checkpoint for `source_id` if none exists yet.
    pub fn observe_fingerprint(
        &self,
        source_id: SourceInstanceId,
        fingerprint: String,
        expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<(), CheckpointError> {
        let mut checkpoint = self.get(source_id).map(|cp| (*cp).clone()).unwrap_or_else(|| Checkpoint::empty(source_id, now));
        checkpoint.observe_fingerprint(fingerprint, expires_at);
        self.put(checkpoint)
    }

    /// Sweep every known source's dedup window, dropping entries expired as
    /// of `now`. Run periodically by the engine supervisor.
    pub fn sweep_expired(&self, now: DateTime<Utc>) -> Result<(), CheckpointError> {
        let source_ids: Vec<SourceInstanceId> = self.snapshots.read().keys().copied().collect();
        for source_id in source_ids {
            let Some(checkpoint) = self.get(source_id) else { continue };
            if !checkpoint.dedup_entries.iter().any(|e| e.is_expired(now)) {
                continue;
            }
            let mut checkpoint = (*checkpoint).clone();
            checkpoint.prune_expired(now);
            self.put(checkpoint)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
