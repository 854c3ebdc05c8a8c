// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Route declarations and the filter predicate grammar (§3, §4.5).
//!
//! `RouteSpec` itself is pure data; evaluating `when`/`filter` against a
//! concrete `Event` is implemented here too since it only needs
//! [`Event::resolve_path`] — the actual route *index* (`source_id -> [RouteSpec]`)
//! lives in `orgloop-router`, which owns the I/O-free matching loop.

use crate::event::{Event, EventType};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A route's declared name. Unlike the id newtypes, names are author-chosen
/// at load time, not minted at runtime, so this just wraps a `String`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteName(pub String);

impl std::fmt::Display for RouteName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RouteName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RouteName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A single predicate-tree node. Leaves resolve a dot-path against the
/// event; combiners fold over child nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum FilterNode {
    Equals { path: String, value: Value },
    NotEquals { path: String, value: Value },
    In { path: String, values: Vec<Value> },
    /// Regex match against the path's value coerced to a string.
    Matches { path: String, regex: String },
    Exists { path: String },
    /// All child nodes must match.
    Match { nodes: Vec<FilterNode> },
    /// No child node may match.
    Exclude { nodes: Vec<FilterNode> },
}

impl FilterNode {
    pub fn evaluate(&self, event: &Event) -> bool {
        match self {
            Self::Equals { path, value } => event.resolve_path(path).as_ref() == Some(value),
            Self::NotEquals { path, value } => event.resolve_path(path).as_ref() != Some(value),
            Self::In { path, values } => event
                .resolve_path(path)
                .map(|v| values.contains(&v))
                .unwrap_or(false),
            Self::Matches { path, regex } => {
                let Some(value) = event.resolve_path(path) else {
                    return false;
                };
                let Some(s) = value.as_str() else {
                    return false;
                };
                Regex::new(regex).map(|re| re.is_match(s)).unwrap_or(false)
            }
            Self::Exists { path } => event.resolve_path(path).is_some(),
            Self::Match { nodes } => nodes.iter().all(|n| n.evaluate(event)),
            Self::Exclude { nodes } => !nodes.iter().any(|n| n.evaluate(event)),
        }
    }
}

/// The top-level predicate tree attached to a route's `when` clause or a
/// `filter` transform. `None` matches every event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filter(pub Option<FilterNode>);

impl Filter {
    pub fn matches(&self, event: &Event) -> bool {
        match &self.0 {
            Some(node) => node.evaluate(event),
            None => true,
        }
    }
}

/// `{source, event_types[], filter}` — the matching clause of a route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhenSpec {
    pub source: String,
    pub event_types: Vec<EventType>,
    #[serde(default)]
    pub filter: Filter,
}

/// `{actor, config}` — the delivery target of a route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThenSpec {
    pub actor: String,
    #[serde(default)]
    pub config: Map<String, Value>,
}

/// One entry in a route's `transforms` list: a built-in kind plus its
/// per-route config (e.g. `{kind: "dedup", config: {fields: [...], ttl_secs: 60}}`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformSpec {
    pub kind: String,
    #[serde(default)]
    pub config: Map<String, Value>,
}

/// A fully declarative route: `{name, when, transforms, then, with}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteSpec {
    pub name: RouteName,
    pub when: WhenSpec,
    #[serde(default)]
    pub transforms: Vec<TransformSpec>,
    pub then: ThenSpec,
    #[serde(default)]
    pub with: Map<String, Value>,
}

impl RouteSpec {
    /// Invariant 3 (§3): a route is deliverable only if its `when.source`
    /// names a declared source and `when.event_types` is non-empty.
    pub fn is_deliverable(&self, declared_sources: &[String]) -> bool {
        !self.when.event_types.is_empty() && declared_sources.iter().any(|s| s == &self.when.source)
    }
}

#[cfg(test)]
#[path = "route_tests.rs"]
mod tests;
