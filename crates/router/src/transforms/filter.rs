// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `filter` transform (§4.6): the same predicate grammar the route
//! matcher uses, applied again after a route has already matched.

use async_trait::async_trait;
use orgloop_core::{Event, Filter, FilterNode, Transform, TransformContext, TransformError};
use serde_json::{Map, Value};

pub struct FilterTransform {
    filter: Filter,
}

impl FilterTransform {
    pub fn from_config(config: &Map<String, Value>) -> Result<Self, String> {
        if config.is_empty() {
            return Ok(Self { filter: Filter::default() });
        }
        let node: FilterNode =
            serde_json::from_value(Value::Object(config.clone())).map_err(|e| e.to_string())?;
        Ok(Self { filter: Filter(Some(node)) })
    }
}

#[async_trait]
impl Transform for FilterTransform {
    async fn init(&mut self, _config: &Map<String, Value>) -> Result<(), TransformError> {
        Ok(())
    }

    async fn execute(
        &self,
        event: Event,
        _context: &TransformContext,
    ) -> Result<Option<Event>, TransformError> {
        Ok(if self.filter.matches(&event) { Some(event) } else { None })
    }

    async fn shutdown(&mut self) {}
}

#[cfg(test)]
#[path = "filter_tests.rs"]
mod tests;
