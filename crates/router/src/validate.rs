// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Load-time route validation (§3 invariant 3): reject routes that point at
//! an undeclared source, have an empty `event_types` list, or carry a
//! transform of unknown kind ("orphan transforms").

use crate::error::RouterError;
use orgloop_core::RouteSpec;

/// Validate every route against the declared source instance ids and the
/// set of transform kinds the pipeline builder knows how to construct.
/// Returns the first violation found; callers surface this as a fatal
/// startup error (§7 `ConfigInvalid`).
pub fn validate_routes(
    routes: &[RouteSpec],
    declared_sources: &[String],
    known_transform_kinds: &[&str],
) -> Result<(), RouterError> {
    for route in routes {
        if route.when.event_types.is_empty() {
            return Err(RouterError::EmptyEventTypes { route_name: route.name.to_string() });
        }
        if !declared_sources.iter().any(|s| s == &route.when.source) {
            return Err(RouterError::DeadSource {
                route_name: route.name.to_string(),
                source: route.when.source.clone(),
            });
        }
        for (index, transform) in route.transforms.iter().enumerate() {
            if !known_transform_kinds.contains(&transform.kind.as_str()) {
                return Err(RouterError::UnknownTransformKind {
                    route_name: route.name.to_string(),
                    index,
                    kind: transform.kind.clone(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
