// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors surfaced while building or evaluating the route graph.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RouterError {
    #[error("route {route_name:?} refers to undeclared source {source:?}")]
    DeadSource { route_name: String, source: String },

    #[error("route {route_name:?} has no declared event_types")]
    EmptyEventTypes { route_name: String },

    #[error("route {route_name:?} transform #{index} has unknown kind {kind:?}")]
    UnknownTransformKind { route_name: String, index: usize, kind: String },

    #[error("route {route_name:?} transform #{index} ({kind}) has invalid config: {message}")]
    InvalidTransformConfig { route_name: String, index: usize, kind: String, message: String },

    #[error("gate transform in route {route_name:?} references unregistered capability {capability:?}")]
    UnknownGateCapability { route_name: String, capability: String },
}
