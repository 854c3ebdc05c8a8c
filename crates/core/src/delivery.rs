// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The delivery attempt state machine (§3, §4.7).
//!
//! ```text
//! scheduled --deliver()--> delivered (terminal)
//!      |                -> rejected (terminal)
//!      |                -> error --attempts<max--> scheduled (backoff)
//!      |                            \-attempts=max-> failed (terminal)
//! ```

use crate::event::EventId;
use crate::route::RouteName;
use crate::spec::ActorId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a delivery attempt sits in the state machine above.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Scheduled,
    Delivered,
    Rejected,
    Error,
    /// Reached after `attempts == max_attempts` on an `Error` result.
    Failed,
}

impl DeliveryStatus {
    /// `delivered`, `rejected` and `failed` are terminal; `scheduled` and
    /// `error` (mid-retry) are not.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Rejected | Self::Failed)
    }
}

/// `{event_id, route_name, actor_id, attempt_n, status, next_attempt_at?, error?}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryAttempt {
    pub event_id: EventId,
    pub route_name: RouteName,
    pub actor_id: ActorId,
    pub attempt_n: u32,
    pub status: DeliveryStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_attempt_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DeliveryAttempt {
    pub fn scheduled(event_id: EventId, route_name: RouteName, actor_id: ActorId) -> Self {
        Self {
            event_id,
            route_name,
            actor_id,
            attempt_n: 1,
            status: DeliveryStatus::Scheduled,
            next_attempt_at: None,
            error: None,
        }
    }
}

#[cfg(test)]
#[path = "delivery_tests.rs"]
mod tests;
