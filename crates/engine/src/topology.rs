// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The declarative shape the supervisor resolves at startup (§4.9):
//! declared sources, declared actors, and the route graph binding them.
//!
//! Concrete connector instances are handed in already-constructed (but not
//! yet `init`-ed) by the caller — instantiating a connector from a config
//! file is the CLI/module-composition layer's job, out of scope here (§1).
//! This module only owns wiring those instances into the engine and
//! validating the graph they form.

use orgloop_core::{Actor, ActorSpec, RouteSpec, Source, SourceSpec};
use orgloop_router::GateCapability;
use orgloop_sources::{PollConfig, WebhookSource};
use orgloop_scheduler::ActorSchedulerConfig;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::SupervisorError;

/// How a declared source ingests events (§4.3).
pub enum SourceMode {
    /// The supervisor drives `source.poll` on an interval.
    Poll { source: Box<dyn Source>, config: PollConfig },
    /// The listener dispatches webhook bodies to `source` by path.
    Webhook { source: Arc<dyn WebhookSource> },
    /// The source only ever receives events via `POST /hooks/{name}` or a
    /// generic NDJSON reader the caller drives independently; the
    /// supervisor has nothing to spawn for it beyond registering the name.
    Hook,
}

pub struct SourceDecl {
    pub spec: SourceSpec,
    pub mode: SourceMode,
}

pub struct ActorDecl {
    pub spec: ActorSpec,
    pub actor: Box<dyn Actor>,
    pub scheduler: ActorSchedulerConfig,
}

/// Everything the supervisor needs to start an engine instance: the
/// declared sources/actors/routes plus any `gate` transform capabilities
/// routes reference (§4.6, §4.9).
pub struct EngineTopology {
    pub sources: Vec<SourceDecl>,
    pub actors: Vec<ActorDecl>,
    pub routes: Vec<RouteSpec>,
    pub gate_capabilities: HashMap<String, Arc<dyn GateCapability>>,
}

impl EngineTopology {
    pub fn new() -> Self {
        Self { sources: Vec::new(), actors: Vec::new(), routes: Vec::new(), gate_capabilities: HashMap::new() }
    }

    pub fn with_source(mut self, decl: SourceDecl) -> Self {
        self.sources.push(decl);
        self
    }

    pub fn with_actor(mut self, decl: ActorDecl) -> Self {
        self.actors.push(decl);
        self
    }

    pub fn with_route(mut self, route: RouteSpec) -> Self {
        self.routes.push(route);
        self
    }

    pub fn with_gate_capability(mut self, name: impl Into<String>, capability: Arc<dyn GateCapability>) -> Self {
        self.gate_capabilities.insert(name.into(), capability);
        self
    }

    /// `when.source`/`then.actor` resolve against these ids.
    pub fn declared_source_ids(&self) -> Vec<String> {
        self.sources.iter().map(|s| s.spec.id.to_string()).collect()
    }

    pub fn declared_actor_ids(&self) -> Vec<String> {
        self.actors.iter().map(|a| a.spec.id.to_string()).collect()
    }

    /// Resolve routes against sources/actors (§4.9). `orgloop_router::validate_routes`
    /// already rejects dead sources, empty `event_types` and orphan
    /// transform kinds (invariant 3, §3); this adds the one check that
    /// crate has no business making since it doesn't know about actors:
    /// every route's `then.actor` must name a declared actor.
    pub fn validate(&self) -> Result<(), SupervisorError> {
        let declared_sources = self.declared_source_ids();
        let declared_actors = self.declared_actor_ids();

        orgloop_router::validate_routes(&self.routes, &declared_sources, orgloop_router::KNOWN_TRANSFORM_KINDS)?;

        for route in &self.routes {
            if !declared_actors.iter().any(|a| a == &route.then.actor) {
                return Err(SupervisorError::InvalidTopology(format!(
                    "route {:?} refers to undeclared actor {:?}",
                    route.name.0, route.then.actor
                )));
            }
        }
        Ok(())
    }
}

impl Default for EngineTopology {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "topology_tests.rs"]
mod tests;
