// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! WAL compaction policy (§9 open question, resolved in `DESIGN.md`).
//!
//! The source spec defers whether compaction is time-based or size-based;
//! the documented default compacts segments that are BOTH older than
//! `max_age` AND only once the bus as a whole exceeds `max_total_bytes` —
//! a conservative trigger that never drops a young segment just because
//! the bus grew large, and never drops an old segment on age alone while
//! the bus is still small.

use std::time::{Duration, SystemTime};

/// Metadata about one on-disk segment, used to decide what to drop.
#[derive(Debug, Clone, Copy)]
pub struct SegmentMeta {
    pub start_offset: u64,
    pub size_bytes: u64,
    pub modified_at: SystemTime,
}

#[derive(Debug, Clone, Copy)]
pub struct CompactionPolicy {
    pub max_age: Duration,
    pub max_total_bytes: u64,
}

impl Default for CompactionPolicy {
    fn default() -> Self {
        Self { max_age: Duration::from_secs(7 * 24 * 3600), max_total_bytes: 1024 * 1024 * 1024 }
    }
}

impl CompactionPolicy {
    /// Returns the offset below which segments may be truncated (passed to
    /// `Wal::truncate`), or `None` if compaction is not due. `segments`
    /// must be sorted ascending by `start_offset`; the last entry (the
    /// active segment) is never eligible for truncation.
    pub fn compaction_point(&self, segments: &[SegmentMeta], now: SystemTime) -> Option<u64> {
        let total_bytes: u64 = segments.iter().map(|s| s.size_bytes).sum();
        if total_bytes <= self.max_total_bytes || segments.is_empty() {
            return None;
        }
        // Never compact the active (last) segment.
        let retirable = &segments[..segments.len() - 1];
        let qualifying =
            retirable.iter().take_while(|s| {
                now.duration_since(s.modified_at).map(|age| age >= self.max_age).unwrap_or(false)
            });
        let count = qualifying.count();
        if count == 0 {
            return None;
        }
        // Keep everything from the first non-qualifying (or active) segment onward.
        Some(segments[count].start_offset)
    }
}

#[cfg(test)]
#[path = "compaction_tests.rs"]
mod tests;
