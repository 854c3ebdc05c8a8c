// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `enrich` transform (§4.6): static field addition, dot-path copies,
//! and `{{dot.path}}` template substitution into `payload`/`provenance`.
//!
//! All three operations read their sources from the event as it existed
//! *before* this transform ran, so `copy`/`template` never observe another
//! operation's output within the same `enrich` stage — order within the
//! config is irrelevant to the result.

use crate::pathset::{render_template, set_path};
use async_trait::async_trait;
use orgloop_core::{Event, Transform, TransformContext, TransformError};
use serde_json::{Map, Value};

#[derive(Clone)]
struct CopyOp {
    from: String,
    to: String,
}

#[derive(Clone)]
struct TemplateOp {
    to: String,
    template: String,
}

pub struct EnrichTransform {
    add: Vec<(String, Value)>,
    copy: Vec<CopyOp>,
    template: Vec<TemplateOp>,
}

impl EnrichTransform {
    pub fn from_config(config: &Map<String, Value>) -> Result<Self, String> {
        let add = match config.get("add") {
            Some(Value::Object(map)) => map.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
            Some(_) => return Err("\"add\" must be an object".to_string()),
            None => Vec::new(),
        };
        let copy = match config.get("copy") {
            Some(Value::Object(map)) => map
                .iter()
                .map(|(from, to)| {
                    let to = to.as_str().ok_or("\"copy\" values must be string paths")?;
                    Ok(CopyOp { from: from.clone(), to: to.to_string() })
                })
                .collect::<Result<_, String>>()?,
            Some(_) => return Err("\"copy\" must be an object".to_string()),
            None => Vec::new(),
        };
        let template = match config.get("template") {
            Some(Value::Object(map)) => map
                .iter()
                .map(|(to, template)| {
                    let template = template.as_str().ok_or("\"template\" values must be strings")?;
                    Ok(TemplateOp { to: to.clone(), template: template.to_string() })
                })
                .collect::<Result<_, String>>()?,
            Some(_) => return Err("\"template\" must be an object".to_string()),
            None => Vec::new(),
        };
        if add.is_empty() && copy.is_empty() && template.is_empty() {
            return Err("enrich transform requires at least one of add/copy/template".to_string());
        }
        Ok(Self { add, copy, template })
    }
}

#[async_trait]
impl Transform for EnrichTransform {
    async fn init(&mut self, _config: &Map<String, Value>) -> Result<(), TransformError> {
        Ok(())
    }

    async fn execute(
        &self,
        event: Event,
        _context: &TransformContext,
    ) -> Result<Option<Event>, TransformError> {
        let mut root = serde_json::to_value(&event).map_err(|e| TransformError::ExecuteFailed(e.to_string()))?;

        for (path, value) in &self.add {
            set_path(&mut root, path, value.clone());
        }
        for op in &self.copy {
            if let Some(value) = event.resolve_path(&op.from) {
                set_path(&mut root, &op.to, value);
            }
        }
        for op in &self.template {
            let rendered = render_template(&op.template, |path| event.resolve_path(path));
            set_path(&mut root, &op.to, Value::String(rendered));
        }

        let enriched: Event =
            serde_json::from_value(root).map_err(|e| TransformError::ExecuteFailed(e.to_string()))?;
        Ok(Some(enriched))
    }

    async fn shutdown(&mut self) {}
}

#[cfg(test)]
#[path = "enrich_tests.rs"]
mod tests;
