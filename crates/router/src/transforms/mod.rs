// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The four built-in transforms (§4.6) and the builder that turns a
//! [`TransformSpec`] into a boxed [`Transform`].

pub mod dedup;
pub mod enrich;
pub mod filter;
pub mod gate;

use crate::error::RouterError;
use async_trait::async_trait;
use orgloop_checkpoint::CheckpointStore;
use orgloop_core::{Transform, TransformSpec};
use std::collections::HashMap;
use std::sync::Arc;

/// An external capability a `gate` transform consults (§4.6): "any active
/// session exists?" and similar yes/no questions the core does not itself
/// know how to answer. Concrete capabilities are connector-adjacent and out
/// of scope (§1); this crate only defines the contract and the registry
/// gate transforms are built against.
#[async_trait]
pub trait GateCapability: Send + Sync {
    async fn is_open(&self, config: &serde_json::Map<String, serde_json::Value>) -> Result<bool, String>;
}

/// The names of every transform kind this crate knows how to build, used by
/// [`crate::validate::validate_routes`] to reject orphan transforms.
pub const KNOWN_TRANSFORM_KINDS: &[&str] = &["filter", "dedup", "enrich", "gate"];

/// Shared dependencies transforms need beyond their own per-route config.
#[derive(Clone)]
pub struct TransformDeps {
    pub checkpoints: Arc<CheckpointStore>,
    pub gate_capabilities: Arc<HashMap<String, Arc<dyn GateCapability>>>,
}

/// Build a boxed, initialized [`Transform`] from a declarative spec. Returns
/// [`RouterError::UnknownTransformKind`] for anything not in
/// [`KNOWN_TRANSFORM_KINDS`] (should already have been rejected by
/// `validate_routes`, but the builder re-checks since it is the last line
/// of defense before wiring a route).
pub fn build_transform(
    route_name: &str,
    index: usize,
    spec: &TransformSpec,
    deps: &TransformDeps,
) -> Result<Box<dyn Transform>, RouterError> {
    let boxed: Box<dyn Transform> = match spec.kind.as_str() {
        "filter" => Box::new(filter::FilterTransform::from_config(&spec.config).map_err(|message| {
            RouterError::InvalidTransformConfig {
                route_name: route_name.to_string(),
                index,
                kind: spec.kind.clone(),
                message,
            }
        })?),
        "dedup" => Box::new(dedup::DedupTransform::from_config(&spec.config, Arc::clone(&deps.checkpoints)).map_err(
            |message| RouterError::InvalidTransformConfig {
                route_name: route_name.to_string(),
                index,
                kind: spec.kind.clone(),
                message,
            },
        )?),
        "enrich" => Box::new(enrich::EnrichTransform::from_config(&spec.config).map_err(|message| {
            RouterError::InvalidTransformConfig {
                route_name: route_name.to_string(),
                index,
                kind: spec.kind.clone(),
                message,
            }
        })?),
        "gate" => {
            let capability_name = spec
                .config
                .get("capability")
                .and_then(|v| v.as_str())
                .ok_or_else(|| RouterError::InvalidTransformConfig {
                    route_name: route_name.to_string(),
                    index,
                    kind: spec.kind.clone(),
                    message: "missing required \"capability\" field".to_string(),
                })?;
            let capability = deps.gate_capabilities.get(capability_name).cloned().ok_or_else(|| {
                RouterError::UnknownGateCapability {
                    route_name: route_name.to_string(),
                    capability: capability_name.to_string(),
                }
            })?;
            Box::new(gate::GateTransform::new(capability, spec.config.clone()))
        }
        other => {
            return Err(RouterError::UnknownTransformKind {
                route_name: route_name.to_string(),
                index,
                kind: other.to_string(),
            })
        }
    };
    Ok(boxed)
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
