// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! orgloop-wal: the durable, append-only event bus (§4.1).
//!
//! Every accepted event is framed and appended to disk before a route ever
//! sees it (invariant 1, §3). Readers `tail` the bus from an offset and
//! block for new appends; segments rotate at a fixed size and retire via
//! `CompactionPolicy`.

pub mod compaction;
pub mod error;
pub mod record;
pub mod segment;
pub mod wal;

pub use compaction::{CompactionPolicy, SegmentMeta};
pub use error::WalError;
pub use segment::SEGMENT_ROTATE_BYTES;
pub use wal::{FsyncPolicy, Wal};
