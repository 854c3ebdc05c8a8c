// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("no scheduler registered for actor {actor_id}")]
    UnknownActor { actor_id: String },
    #[error("actor {actor_id} queue is closed")]
    QueueClosed { actor_id: String },
}
