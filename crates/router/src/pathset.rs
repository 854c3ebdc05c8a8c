// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dot-path write helper for the `enrich` transform. [`Event::resolve_path`]
//! (in `orgloop-core`) already handles reads; this is the write-side
//! counterpart, creating intermediate objects as needed.

use serde_json::{Map, Value};

/// Set `path` (dot-separated, e.g. `payload.extra.note`) to `new_value`
/// within `root`, creating any missing intermediate objects. Overwrites a
/// non-object intermediate value with a fresh object rather than failing,
/// since enrich configs are trusted, author-provided route declarations.
pub fn set_path(root: &mut Value, path: &str, new_value: Value) {
    let mut segments = path.split('.').peekable();
    let mut current = root;
    while let Some(segment) = segments.next() {
        if !current.is_object() {
            *current = Value::Object(Map::new());
        }
        let map = current.as_object_mut().expect("just coerced to object above");
        if segments.peek().is_none() {
            map.insert(segment.to_string(), new_value);
            return;
        }
        current = map.entry(segment.to_string()).or_insert_with(|| Value::Object(Map::new()));
    }
}

/// Substitute every `{{dot.path}}` placeholder in `template` by resolving
/// the path against `source` and rendering it as a plain string (quotes
/// stripped for JSON string values, numbers/bools rendered literally,
/// missing paths render as an empty string).
pub fn render_template(template: &str, resolve: impl Fn(&str) -> Option<Value>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    loop {
        let Some(start) = rest.find("{{") else {
            out.push_str(rest);
            break;
        };
        let Some(end_rel) = rest[start..].find("}}") else {
            out.push_str(rest);
            break;
        };
        out.push_str(&rest[..start]);
        let path = rest[start + 2..start + end_rel].trim();
        let rendered = match resolve(path) {
            Some(Value::String(s)) => s,
            Some(other) => other.to_string(),
            None => String::new(),
        };
        out.push_str(&rendered);
        rest = &rest[start + end_rel + 2..];
    }
    out
}

#[cfg(test)]
#[path = "pathset_tests.rs"]
mod tests;
