// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Exponential backoff with jitter for retried deliveries (§4.7).

use rand::Rng;
use std::time::Duration;

/// `base=1s, factor=2, jitter=±25%, cap=5min` (spec's own stated default).
#[derive(Debug, Clone, Copy)]
pub struct BackoffPolicy {
    pub base: Duration,
    pub factor: f64,
    pub jitter: f64,
    pub cap: Duration,
    pub max_attempts: u32,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            base: Duration::from_secs(1),
            factor: 2.0,
            jitter: 0.25,
            cap: Duration::from_secs(5 * 60),
            max_attempts: 5,
        }
    }
}

impl BackoffPolicy {
    /// Delay before the next attempt, given the attempt number that just
    /// failed (1-indexed, matching [`orgloop_core::DeliveryAttempt::attempt_n`]).
    /// `attempt_n=1` failing schedules the delay for attempt 2, etc.
    pub fn delay_for(&self, attempt_n: u32) -> Duration {
        let exponent = attempt_n.saturating_sub(1);
        let unjittered = self.base.as_secs_f64() * self.factor.powi(exponent as i32);
        let capped = unjittered.min(self.cap.as_secs_f64());
        let jitter_factor = 1.0 + rand::rng().random_range(-self.jitter..=self.jitter);
        let jittered = (capped * jitter_factor).max(0.0);
        Duration::from_secs_f64(jittered)
    }

    /// `true` once `attempt_n` has exhausted the retry budget and the
    /// delivery should become a terminal `failed`.
    pub fn is_exhausted(&self, attempt_n: u32) -> bool {
        attempt_n >= self.max_attempts
    }
}

#[cfg(test)]
#[path = "backoff_tests.rs"]
mod tests;
