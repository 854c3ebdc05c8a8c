// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The route matcher (§4.5): an index from declared source to the routes
//! that watch it, and the three-step evaluation a single event goes
//! through (source lookup, event-type membership, filter predicate).

use orgloop_core::{Event, RouteSpec};
use std::collections::HashMap;

/// `source_id -> [RouteSpec]`, built once at load time from the validated
/// route graph (invariant 3, §3).
pub struct RouteIndex {
    by_source: HashMap<String, Vec<RouteSpec>>,
}

impl RouteIndex {
    /// Build the index. Callers should validate routes (see
    /// [`crate::validate::validate_routes`]) before constructing this, since
    /// the index itself does not reject dead sources or empty `event_types`.
    pub fn build(routes: Vec<RouteSpec>) -> Self {
        let mut by_source: HashMap<String, Vec<RouteSpec>> = HashMap::new();
        for route in routes {
            by_source.entry(route.when.source.clone()).or_default().push(route);
        }
        Self { by_source }
    }

    /// Every route whose `when` clause matches `event`: source, then
    /// event_types, then the filter predicate tree, in that order. Multiple
    /// matches are independent deliveries, one per route (§4.5).
    pub fn matching_routes(&self, event: &Event) -> Vec<&RouteSpec> {
        let Some(candidates) = self.by_source.get(event.source.as_str()) else {
            return Vec::new();
        };
        candidates
            .iter()
            .filter(|route| route.when.event_types.contains(&event.event_type))
            .filter(|route| route.when.filter.matches(event))
            .collect()
    }

    pub fn routes(&self) -> impl Iterator<Item = &RouteSpec> {
        self.by_source.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.by_source.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "index_tests.rs"]
mod tests;
