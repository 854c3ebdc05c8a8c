// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! orgloop-engine: the supervisor that wires every other crate in the
//! workspace into a running engine instance (§4.9).
//!
//! `orgloop-core` through `orgloop-sources` each implement one stage of
//! `Source -> Bus -> Router -> Transforms -> Scheduler`; this crate is the
//! only one that knows the whole pipeline, owns the startup order, and
//! drives graceful shutdown.

pub mod config;
pub mod error;
pub mod router_task;
pub mod sweep;
pub mod supervisor;
pub mod topology;

pub use config::EngineConfig;
pub use error::SupervisorError;
pub use router_task::RouteRuntime;
pub use supervisor::{DrainReport, Engine};
pub use topology::{ActorDecl, EngineTopology, SourceDecl, SourceMode};
