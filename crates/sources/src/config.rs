// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

/// Per-source poll-mode knobs (§4.3): the interval between ticks and how
/// much jitter (±) to apply so many sources sharing an interval don't all
/// wake at once.
#[derive(Debug, Clone, Copy)]
pub struct PollConfig {
    pub interval: Duration,
    pub jitter: f64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self { interval: Duration::from_secs(60), jitter: 0.10 }
    }
}

impl PollConfig {
    pub fn new(interval: Duration) -> Self {
        Self { interval, ..Default::default() }
    }
}
