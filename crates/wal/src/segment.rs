// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Segment file naming and directory listing (§6: `wal-{offset:016x}.log`).

use std::path::{Path, PathBuf};

/// Segments are rotated once the active one reaches this size.
pub const SEGMENT_ROTATE_BYTES: u64 = 64 * 1024 * 1024;

pub fn segment_path(dir: &Path, start_offset: u64) -> PathBuf {
    dir.join(format!("wal-{start_offset:016x}.log"))
}

/// Parse a segment's starting offset out of its filename, if it matches
/// the `wal-{offset:016x}.log` convention.
pub fn parse_start_offset(path: &Path) -> Option<u64> {
    let stem = path.file_stem()?.to_str()?;
    let hex = stem.strip_prefix("wal-")?;
    u64::from_str_radix(hex, 16).ok()
}

/// All segment start-offsets present in `dir`, ascending.
pub fn list_segments(dir: &Path) -> std::io::Result<Vec<u64>> {
    let mut offsets = Vec::new();
    if !dir.exists() {
        return Ok(offsets);
    }
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if let Some(offset) = parse_start_offset(&entry.path()) {
            offsets.push(offset);
        }
    }
    offsets.sort_unstable();
    Ok(offsets)
}

#[cfg(test)]
#[path = "segment_tests.rs"]
mod tests;
