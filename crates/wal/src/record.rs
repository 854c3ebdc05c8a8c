// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! On-disk record framing: `[4-byte length BE][JSON body][4-byte CRC32]` (§6).
//!
//! The CRC is computed over the body bytes only; the length prefix is
//! trusted as part of the framing itself (a corrupt length either produces
//! a body read past EOF, treated as a clean truncation, or a CRC mismatch).

use orgloop_core::Event;

pub const LEN_PREFIX_BYTES: usize = 4;
pub const CRC_SUFFIX_BYTES: usize = 4;

/// Encode an event into its on-disk framed form.
pub fn encode(event: &Event) -> Result<Vec<u8>, serde_json::Error> {
    let body = serde_json::to_vec(event)?;
    let mut framed = Vec::with_capacity(LEN_PREFIX_BYTES + body.len() + CRC_SUFFIX_BYTES);
    framed.extend_from_slice(&(body.len() as u32).to_be_bytes());
    let crc = crc32fast::hash(&body);
    framed.extend_from_slice(&body);
    framed.extend_from_slice(&crc.to_be_bytes());
    Ok(framed)
}

/// Outcome of reading one record from a byte cursor.
pub enum ReadOutcome {
    /// A valid record, plus the byte offset immediately after it.
    Record { event: Event, end_byte: usize },
    /// Clean end of stream, zero-filled padding, or a truncated trailing
    /// write — all tolerated; `end_byte` is where reading stopped.
    Stop { end_byte: usize },
    /// CRC mismatch on an otherwise complete record — corruption, not a
    /// truncated write. Caller decides whether this is fatal based on
    /// whether the containing segment is the tail segment.
    Invalid { end_byte: usize },
}

/// Attempt to decode one record starting at `buf[start..]`.
pub fn read_one(buf: &[u8], start: usize) -> ReadOutcome {
    let remaining = &buf[start..];
    if remaining.len() < LEN_PREFIX_BYTES {
        return ReadOutcome::Stop { end_byte: start };
    }
    let len_bytes = &remaining[..LEN_PREFIX_BYTES];
    if len_bytes.iter().all(|&b| b == 0) {
        return ReadOutcome::Stop { end_byte: start };
    }
    let len = u32::from_be_bytes([len_bytes[0], len_bytes[1], len_bytes[2], len_bytes[3]]) as usize;
    let total = LEN_PREFIX_BYTES + len + CRC_SUFFIX_BYTES;
    if remaining.len() < total {
        return ReadOutcome::Stop { end_byte: start };
    }
    let body = &remaining[LEN_PREFIX_BYTES..LEN_PREFIX_BYTES + len];
    let crc_bytes = &remaining[LEN_PREFIX_BYTES + len..total];
    let stored_crc = u32::from_be_bytes([crc_bytes[0], crc_bytes[1], crc_bytes[2], crc_bytes[3]]);
    let end_byte = start + total;
    if crc32fast::hash(body) != stored_crc {
        return ReadOutcome::Invalid { end_byte };
    }
    match serde_json::from_slice::<Event>(body) {
        Ok(event) => ReadOutcome::Record { event, end_byte },
        Err(_) => ReadOutcome::Invalid { end_byte },
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
