// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use orgloop_core::{DeliveryAttempt, Event};
use serde_json::{Map, Value};

/// One `{event, route}` pair queued against an actor's worker pool (§4.7).
#[derive(Debug, Clone)]
pub struct DeliveryJob {
    pub event: Event,
    pub config: Map<String, Value>,
    pub attempt: DeliveryAttempt,
}
