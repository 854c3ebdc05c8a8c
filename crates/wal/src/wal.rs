// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The durable, append-only event bus (§4.1).

use crate::compaction::SegmentMeta;
use crate::error::WalError;
use crate::record::{self, ReadOutcome};
use crate::segment::{self, SEGMENT_ROTATE_BYTES};
use orgloop_core::Event;
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

/// When the durable append is fsynced to disk.
#[derive(Debug, Clone, Copy)]
pub enum FsyncPolicy {
    PerRecord,
    Batched { interval: Duration },
}

struct WriterState {
    file: File,
    segment_start: u64,
    segment_size: u64,
    next_offset: u64,
    last_sync: Instant,
}

/// Append-only, length-prefixed JSON log over one or more segment files.
pub struct Wal {
    dir: PathBuf,
    writer: Mutex<WriterState>,
    notify: Notify,
    fsync_policy: FsyncPolicy,
}

struct ScanResult {
    valid_count: u64,
    /// Byte offset to truncate the file to; everything after this point is
    /// either clean EOF padding or a record that did not fully land.
    valid_end_byte: u64,
}

fn scan_segment(buf: &[u8]) -> ScanResult {
    let mut pos = 0usize;
    let mut count = 0u64;
    loop {
        match record::read_one(buf, pos) {
            ReadOutcome::Record { end_byte, .. } => {
                count += 1;
                pos = end_byte;
            }
            ReadOutcome::Stop { .. } | ReadOutcome::Invalid { .. } => {
                return ScanResult { valid_count: count, valid_end_byte: pos as u64 };
            }
        }
    }
}

impl Wal {
    /// Open (or create) a WAL rooted at `dir`, recovering the tail segment
    /// per §4.1: scan it, stop at the first invalid/zero-filled record,
    /// truncate any trailing garbage, and resume appends from there.
    /// Corruption found in a non-tail (already-rotated) segment is fatal.
    pub fn open(dir: impl AsRef<Path>, fsync_policy: FsyncPolicy) -> Result<Self, WalError> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        let offsets = segment::list_segments(&dir)?;

        let writer = if offsets.is_empty() {
            let path = segment::segment_path(&dir, 0);
            let file = OpenOptions::new().create(true).read(true).append(true).open(&path)?;
            WriterState { file, segment_start: 0, segment_size: 0, next_offset: 0, last_sync: Instant::now() }
        } else {
            let (&tail_start, earlier) = offsets.split_last().unwrap_or((&0, &[]));
            for &start in earlier {
                let path = segment::segment_path(&dir, start);
                let mut buf = Vec::new();
                File::open(&path)?.read_to_end(&mut buf)?;
                let scan = scan_segment(&buf);
                if scan.valid_end_byte != buf.len() as u64 {
                    return Err(WalError::Corruption { segment_start: start, byte_offset: scan.valid_end_byte });
                }
            }

            let path = segment::segment_path(&dir, tail_start);
            let mut buf = Vec::new();
            File::open(&path)?.read_to_end(&mut buf)?;
            let scan = scan_segment(&buf);
            if scan.valid_end_byte != buf.len() as u64 {
                tracing::warn!(
                    segment_start = tail_start,
                    valid_bytes = scan.valid_end_byte,
                    total_bytes = buf.len(),
                    "truncating corrupt/partial tail of WAL segment"
                );
            }

            let file = OpenOptions::new().read(true).write(true).open(&path)?;
            file.set_len(scan.valid_end_byte)?;
            let mut file = file;
            file.seek(SeekFrom::End(0))?;

            WriterState {
                file,
                segment_start: tail_start,
                segment_size: scan.valid_end_byte,
                next_offset: tail_start + scan.valid_count,
                last_sync: Instant::now(),
            }
        };

        Ok(Self { dir, writer: Mutex::new(writer), notify: Notify::new(), fsync_policy })
    }

    /// Append `event`, returning its assigned offset. Atomically writes
    /// header+body+CRC and fsyncs per the configured policy (§4.1).
    /// Concurrent appenders are serialized by `writer`.
    pub fn append(&self, event: &Event) -> Result<u64, WalError> {
        let framed = record::encode(event)?;
        let mut writer = self.writer.lock();

        if writer.segment_size + framed.len() as u64 > SEGMENT_ROTATE_BYTES && writer.segment_size > 0 {
            writer.file.flush()?;
            writer.file.sync_all()?;
            let new_start = writer.next_offset;
            let path = segment::segment_path(&self.dir, new_start);
            let file = OpenOptions::new().create(true).read(true).append(true).open(&path)?;
            writer.file = file;
            writer.segment_start = new_start;
            writer.segment_size = 0;
            tracing::info!(segment_start = new_start, "rotated WAL segment");
        }

        let offset = writer.next_offset;
        writer.file.write_all(&framed)?;

        let should_sync = match self.fsync_policy {
            FsyncPolicy::PerRecord => true,
            FsyncPolicy::Batched { interval } => writer.last_sync.elapsed() >= interval,
        };
        if should_sync {
            writer.file.flush()?;
            writer.file.sync_all()?;
            writer.last_sync = Instant::now();
        } else {
            writer.file.flush()?;
        }

        writer.segment_size += framed.len() as u64;
        writer.next_offset += 1;
        drop(writer);
        self.notify.notify_waiters();
        Ok(offset)
    }

    /// Replay records from `from_offset` onward, then block for new
    /// appends until `cancel` fires. Multiple concurrent tails are
    /// supported since each only opens its own read handles.
    pub async fn tail<F>(&self, from_offset: u64, cancel: &CancellationToken, mut handler: F) -> Result<(), WalError>
    where
        F: FnMut(u64, Event),
    {
        let mut cursor = from_offset;
        loop {
            let advanced = self.read_from(cursor, &mut handler)?;
            if advanced == cursor {
                tokio::select! {
                    _ = self.notify.notified() => continue,
                    _ = cancel.cancelled() => return Ok(()),
                }
            }
            cursor = advanced;
        }
    }

    /// Read and hand off every record at or after `cursor`, returning the
    /// next offset to resume from (equal to `cursor` if nothing new).
    fn read_from<F>(&self, cursor: u64, handler: &mut F) -> Result<u64, WalError>
    where
        F: FnMut(u64, Event),
    {
        let offsets = segment::list_segments(&self.dir)?;
        let mut next = cursor;
        for (i, &start) in offsets.iter().enumerate() {
            let segment_end = offsets.get(i + 1).copied();
            if let Some(end) = segment_end {
                if end <= cursor {
                    continue;
                }
            }
            let path = segment::segment_path(&self.dir, start);
            let mut buf = Vec::new();
            let Ok(mut f) = File::open(&path) else { continue };
            f.read_to_end(&mut buf)?;

            let mut pos = 0usize;
            let mut offset = start;
            loop {
                match record::read_one(&buf, pos) {
                    ReadOutcome::Record { event, end_byte } => {
                        if offset >= cursor {
                            handler(offset, event);
                            next = offset + 1;
                        }
                        offset += 1;
                        pos = end_byte;
                    }
                    ReadOutcome::Stop { .. } | ReadOutcome::Invalid { .. } => break,
                }
            }
        }
        Ok(next)
    }

    /// Await and return every record at or after `from_offset`, blocking
    /// (on the same `Notify` as [`Wal::tail`]) until at least one exists or
    /// `cancel` fires. Unlike `tail`, the caller drives the loop itself, so
    /// it can `.await` per-record work (route matching, delivery) between
    /// batches instead of handing a synchronous closure to the bus.
    pub async fn next_batch(&self, from_offset: u64, cancel: &CancellationToken) -> Result<(Vec<(u64, Event)>, u64), WalError> {
        let mut cursor = from_offset;
        loop {
            let mut batch = Vec::new();
            let advanced = self.read_from(cursor, &mut |offset, event| batch.push((offset, event)))?;
            if advanced != cursor {
                return Ok((batch, advanced));
            }
            tokio::select! {
                _ = self.notify.notified() => continue,
                _ = cancel.cancelled() => return Ok((Vec::new(), cursor)),
            }
        }
    }

    /// Remove whole segments whose highest offset is below
    /// `before_offset`; the active segment is never removed.
    pub fn truncate(&self, before_offset: u64) -> Result<(), WalError> {
        let offsets = segment::list_segments(&self.dir)?;
        let Some((&active, rest)) = offsets.split_last() else { return Ok(()) };
        for (i, &start) in rest.iter().enumerate() {
            let highest = offsets.get(i + 1).copied().unwrap_or(active).saturating_sub(1);
            if highest < before_offset {
                let path = segment::segment_path(&self.dir, start);
                std::fs::remove_file(&path)?;
                tracing::info!(segment_start = start, "truncated WAL segment");
            }
        }
        Ok(())
    }

    /// Metadata for every on-disk segment, used by a `CompactionPolicy`.
    pub fn segment_metas(&self) -> Result<Vec<SegmentMeta>, WalError> {
        let offsets = segment::list_segments(&self.dir)?;
        let mut metas = Vec::with_capacity(offsets.len());
        for start in offsets {
            let path = segment::segment_path(&self.dir, start);
            let meta = std::fs::metadata(&path)?;
            metas.push(SegmentMeta {
                start_offset: start,
                size_bytes: meta.len(),
                modified_at: meta.modified()?,
            });
        }
        Ok(metas)
    }

    /// The offset that will be assigned to the next appended event.
    pub fn next_offset(&self) -> u64 {
        self.writer.lock().next_offset
    }
}

#[cfg(test)]
#[path = "wal_tests.rs"]
mod tests;
