// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Engine-wide knobs the supervisor assembles its components from.
//!
//! Everything here is engine-assembled configuration, not part of
//! spec.md's declarative surface (`SourceSpec`/`ActorSpec`/`RouteSpec`) —
//! the CLI/YAML layer that would turn a config file into this struct is
//! out of scope (§1).

use orgloop_listener::ListenerConfig;
use orgloop_wal::{CompactionPolicy, FsyncPolicy};
use std::path::PathBuf;
use std::time::Duration;

/// Default drain timeout before the supervisor force-terminates
/// in-flight deliveries (§4.9).
pub const DEFAULT_DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Root directory. The WAL lives at `<data_dir>/wal`, checkpoints at
    /// `<data_dir>/checkpoints`.
    pub data_dir: PathBuf,
    pub fsync_policy: FsyncPolicy,
    pub listener: ListenerConfig,
    pub drain_timeout: Duration,
    pub compaction: CompactionPolicy,
    pub compaction_interval: Duration,
    pub checkpoint_sweep_interval: Duration,
}

impl EngineConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            fsync_policy: FsyncPolicy::PerRecord,
            listener: ListenerConfig::default(),
            drain_timeout: DEFAULT_DRAIN_TIMEOUT,
            compaction: CompactionPolicy::default(),
            compaction_interval: Duration::from_secs(3600),
            checkpoint_sweep_interval: Duration::from_secs(300),
        }
    }

    pub fn wal_dir(&self) -> PathBuf {
        self.data_dir.join("wal")
    }

    pub fn checkpoint_dir(&self) -> PathBuf {
        self.data_dir.join("checkpoints")
    }
}
