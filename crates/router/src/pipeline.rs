// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The per-route transform pipeline (§4.6): an ordered chain of transforms
//! executed against a clone of the event seen by this route only. Dropping
//! anywhere in the chain drops the event for this route alone — every
//! other route that matched the same event runs its own pipeline
//! independently (§4.5, §4.6).

use crate::error::RouterError;
use crate::transforms::{build_transform, TransformDeps};
use orgloop_core::{Event, RouteName, RouteSpec, SourceInstanceId, Transform, TransformContext, TransformError};

/// Outcome of running one route's pipeline over one event.
pub enum PipelineOutcome {
    /// Every transform passed the event through; ready for the scheduler.
    Delivered(Event),
    /// A transform returned `None`; `transform_kind` names which one, for
    /// the `transform.dropped` observer event (§4.8).
    Dropped { transform_kind: String },
}

/// A built, ready-to-run pipeline for one route.
pub struct RoutePipeline {
    route_name: RouteName,
    source: SourceInstanceId,
    stages: Vec<(String, Box<dyn Transform>)>,
}

impl RoutePipeline {
    /// Build a pipeline from a route's declared `transforms` list. Assumes
    /// the route has already passed [`crate::validate::validate_routes`].
    pub fn build(route: &RouteSpec, source: SourceInstanceId, deps: &TransformDeps) -> Result<Self, RouterError> {
        let mut stages = Vec::with_capacity(route.transforms.len());
        for (index, spec) in route.transforms.iter().enumerate() {
            let transform = build_transform(route.name.0.as_str(), index, spec, deps)?;
            stages.push((spec.kind.clone(), transform));
        }
        Ok(Self { route_name: route.name.clone(), source, stages })
    }

    pub fn route_name(&self) -> &RouteName {
        &self.route_name
    }

    /// Run every stage in order against an owned clone of `event`.
    pub async fn run(&self, event: Event) -> Result<PipelineOutcome, TransformError> {
        let context = TransformContext { route_name: self.route_name.clone(), source: self.source };
        let mut current = event;
        for (kind, transform) in &self.stages {
            match transform.execute(current, &context).await? {
                Some(next) => current = next,
                None => return Ok(PipelineOutcome::Dropped { transform_kind: kind.clone() }),
            }
        }
        Ok(PipelineOutcome::Delivered(current))
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
