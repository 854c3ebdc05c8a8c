// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Environment-variable substitution for connector config (§6).
//!
//! `${VAR_NAME}` references are resolved at load time against an arbitrary
//! lookup function (normally `std::env::var`, swapped for a `HashMap` in
//! tests); a missing variable fails with the variable name included, per
//! the `ConfigInvalid` policy (§7). This is the one sliver of "config"
//! handling that belongs in the core — YAML parsing, schema validation and
//! the CLI surface that feeds it remain out of scope (§1).

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    MissingVar(String),
}

fn var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        #[allow(clippy::unwrap_used)] // literal pattern, infallible at compile time
        Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap()
    })
}

/// Resolve every `${VAR_NAME}` reference in `input` via `lookup`.
pub fn resolve_str(
    input: &str,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<String, ConfigError> {
    let mut out = String::with_capacity(input.len());
    let mut last = 0;
    for caps in var_pattern().captures_iter(input) {
        let Some(whole) = caps.get(0) else { continue };
        let name = &caps[1];
        out.push_str(&input[last..whole.start()]);
        out.push_str(&lookup(name).ok_or_else(|| ConfigError::MissingVar(name.to_string()))?);
        last = whole.end();
    }
    out.push_str(&input[last..]);
    Ok(out)
}

/// Recursively resolve `${VAR_NAME}` references in every string leaf of a
/// JSON config value (source/actor `config` maps, route `with` blocks).
pub fn resolve_value(
    value: &Value,
    lookup: &impl Fn(&str) -> Option<String>,
) -> Result<Value, ConfigError> {
    match value {
        Value::String(s) => Ok(Value::String(resolve_str(s, lookup)?)),
        Value::Array(items) => items
            .iter()
            .map(|v| resolve_value(v, lookup))
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        Value::Object(map) => {
            let mut resolved = serde_json::Map::with_capacity(map.len());
            for (k, v) in map {
                resolved.insert(k.clone(), resolve_value(v, lookup)?);
            }
            Ok(Value::Object(resolved))
        }
        other => Ok(other.clone()),
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
