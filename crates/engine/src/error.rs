// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors the supervisor can hit while assembling or starting an engine.
//!
//! Anything reaching this enum during [`crate::Engine::start`] is fatal to
//! startup (§7: `ConfigInvalid` and `BusCorruption` are the only fatal
//! kinds in the taxonomy; everything this crate wraps is one or the
//! other). Runtime errors raised by individual components (a transient
//! source error, a rejected delivery) never surface here — they are
//! logged and handled locally by the component that raised them.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error("invalid topology: {0}")]
    InvalidTopology(String),

    #[error(transparent)]
    Wal(#[from] orgloop_wal::WalError),

    #[error(transparent)]
    Checkpoint(#[from] orgloop_checkpoint::CheckpointError),

    #[error(transparent)]
    Router(#[from] orgloop_router::RouterError),

    #[error(transparent)]
    Listener(#[from] orgloop_listener::ListenerError),

    /// Unlike a source init failure (§7 `SourceFatal`: that source is
    /// disabled, others continue), an actor failing to initialize aborts
    /// the whole startup — a route bound to a broken actor can never
    /// deliver, and the declarative surface gives the supervisor no way to
    /// start "without" an actor a route depends on (see DESIGN.md).
    #[error("actor {actor_id} failed to initialize: {message}")]
    ActorInitFailed { actor_id: String, message: String },
}
