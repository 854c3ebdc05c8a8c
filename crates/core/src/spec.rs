// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Declarative specs loaded once at startup: `SourceSpec` and `ActorSpec`.
//!
//! These are immutable after load (§3); the engine supervisor validates
//! them against the route graph before starting anything (§4.9, invariant 3).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

crate::define_id! {
    /// Identifier for a declared source *kind* (the connector), e.g. `"github"`.
    pub struct SourceId("src-");
}

crate::define_id! {
    /// Identifier for a running instance of a source. An `Event::source`
    /// always refers to one of these, not a `SourceId`.
    pub struct SourceInstanceId("sin-");
}

crate::define_id! {
    /// Identifier for a declared actor instance.
    pub struct ActorId("act-");
}

/// `{id, connector, config}` — a declared source instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSpec {
    pub id: SourceInstanceId,
    pub connector: String,
    #[serde(default)]
    pub config: Map<String, Value>,
}

/// `{id, connector, config}` — a declared actor instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorSpec {
    pub id: ActorId,
    pub connector: String,
    #[serde(default)]
    pub config: Map<String, Value>,
}

#[cfg(test)]
#[path = "spec_tests.rs"]
mod tests;
