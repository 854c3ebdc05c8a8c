// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::backoff::BackoffPolicy;
use std::time::Duration;

/// Per-actor scheduling knobs (§4.7). Nothing in spec.md's declarative
/// surface names where `workers`/`queue_size` are configured, so these
/// live on the engine-assembled config the supervisor hands to
/// [`crate::Scheduler::register_actor`] rather than on [`orgloop_core::ActorSpec`]
/// itself (see DESIGN.md).
#[derive(Debug, Clone)]
pub struct ActorSchedulerConfig {
    pub workers: usize,
    pub queue_size: usize,
    pub deliver_timeout: Duration,
    pub backoff: BackoffPolicy,
}

impl Default for ActorSchedulerConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            queue_size: 256,
            deliver_timeout: Duration::from_secs(30),
            backoff: BackoffPolicy::default(),
        }
    }
}
