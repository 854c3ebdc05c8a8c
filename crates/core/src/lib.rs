// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! orgloop-core: shared data model and connector contracts for the OrgLoop
//! event-routing engine.
//!
//! This crate defines the wire-level types (`Event`, `RouteSpec`,
//! `SourceSpec`, `ActorSpec`, `Checkpoint`, `DeliveryAttempt`) and the
//! connector traits (`Source`, `Actor`, `Transform`, `Logger`) that sit at
//! the boundary between the engine core and its plugins. It owns no I/O.

pub mod macros;

pub mod checkpoint;
pub mod clock;
pub mod config;
pub mod delivery;
pub mod error;
pub mod event;
pub mod fingerprint;
pub mod id;
pub mod logger;
pub mod route;
pub mod source;
pub mod spec;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use checkpoint::{Checkpoint, DedupEntry};
pub use clock::{Clock, FakeClock, SystemClock};
pub use delivery::{DeliveryAttempt, DeliveryStatus};
pub use error::EngineError;
pub use event::{Event, EventId, EventType, Provenance};
pub use id::{short, IdGen, NanoIdGen};
pub use logger::{Logger, LoggerError, ObserverEvent};
pub use route::{Filter, FilterNode, RouteName, RouteSpec, ThenSpec, TransformSpec, WhenSpec};
pub use source::{
    Actor, ActorError, DeliverOutcome, DeliverResult, PollOutcome, Source, SourceError, Transform,
    TransformContext, TransformError,
};
pub use spec::{ActorId, ActorSpec, SourceId, SourceInstanceId, SourceSpec};
pub use config::ConfigError;
pub use fingerprint::compute as compute_fingerprint;
