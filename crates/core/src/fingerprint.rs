// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Content-hash fingerprints for dedup (§3, §4.6).
//!
//! The `dedup` transform hashes a configured list of dot-paths resolved
//! against the event; identical values at those paths produce identical
//! fingerprints regardless of anything else in the event (timestamp,
//! unrelated payload fields, ...).

use crate::event::Event;
use sha2::{Digest, Sha256};
use serde_json::Value;

/// Compute a stable fingerprint over `fields` (dot-paths into the event).
/// Missing paths hash as JSON `null`, so a field that is absent on every
/// event in a window still produces a consistent fingerprint.
pub fn compute(event: &Event, fields: &[String]) -> String {
    let mut hasher = Sha256::new();
    for field in fields {
        let value = event.resolve_path(field).unwrap_or(Value::Null);
        hasher.update(field.as_bytes());
        hasher.update([0u8]);
        hasher.update(serde_json::to_vec(&value).unwrap_or_default());
        hasher.update([0u8]);
    }
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
#[path = "fingerprint_tests.rs"]
mod tests;
