// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wires `orgloop-wal`, `orgloop-router` and `orgloop-scheduler` into the
//! `Source -> Bus -> Router -> Transforms -> Scheduler` data flow (§2).
//!
//! Every other crate in the workspace only knows its own stage; this is
//! the one place that drives the pipeline end to end, which is why it
//! lives in the supervisor crate rather than in `orgloop-router` itself.

use orgloop_core::{ActorId, ObserverEvent, RouteName, RouteSpec, SourceInstanceId};
use orgloop_observer::ObserverBus;
use orgloop_router::{PipelineOutcome, RoutePipeline, RouteIndex, RouterError, TransformDeps};
use orgloop_scheduler::Scheduler;
use orgloop_wal::Wal;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// A route's pipeline plus the delivery target it submits to once the
/// pipeline passes an event through.
pub struct RouteRuntime {
    pipeline: RoutePipeline,
    actor_id: ActorId,
    delivery_config: Map<String, Value>,
}

/// Build one [`RoutePipeline`] per route, keyed by route name for lookup
/// from [`RouteIndex::matching_routes`] results (§4.5, §4.6).
pub fn build_route_runtimes(
    routes: &[RouteSpec],
    deps: &TransformDeps,
) -> Result<HashMap<RouteName, RouteRuntime>, RouterError> {
    let mut runtimes = HashMap::with_capacity(routes.len());
    for route in routes {
        let source = SourceInstanceId::from(route.when.source.as_str());
        let pipeline = RoutePipeline::build(route, source, deps)?;
        runtimes.insert(
            route.name.clone(),
            RouteRuntime {
                pipeline,
                actor_id: ActorId::from(route.then.actor.as_str()),
                delivery_config: route.then.config.clone(),
            },
        );
    }
    Ok(runtimes)
}

/// Tail the bus from `start_offset` forever: match each event against the
/// route index, run the matching route's pipeline against its own clone,
/// and submit whatever survives to the scheduler (§4.5, §4.6, §4.7).
///
/// Backpressure is implicit: [`Scheduler::submit`] blocks when an actor's
/// queue is full, which blocks this loop, which stops it from pulling the
/// next batch off the bus — exactly the "router blocks on enqueue" edge
/// §4.7 describes.
pub async fn run(
    wal: Arc<Wal>,
    start_offset: u64,
    index: Arc<RouteIndex>,
    runtimes: Arc<HashMap<RouteName, RouteRuntime>>,
    scheduler: Arc<Scheduler>,
    observer: Arc<ObserverBus>,
    cancel: CancellationToken,
) {
    let mut offset = start_offset;
    loop {
        let (batch, next_offset) = match wal.next_batch(offset, &cancel).await {
            Ok(result) => result,
            Err(err) => {
                tracing::error!(error = %err, "router task stopping: wal read failed");
                return;
            }
        };

        if batch.is_empty() {
            // `next_batch` only returns an empty batch when it observed
            // cancellation with nothing new to read (§4.9 drain: the
            // router stops once the bus has nothing left to route).
            return;
        }

        for (_offset, event) in batch {
            for route in index.matching_routes(&event) {
                let Some(runtime) = runtimes.get(&route.name) else {
                    tracing::warn!(route = %route.name, "matched route has no built pipeline, skipping");
                    continue;
                };
                observer.emit(ObserverEvent::RouteMatched { event_id: event.id, route_name: route.name.clone() });

                match runtime.pipeline.run(event.clone()).await {
                    Ok(PipelineOutcome::Delivered(out_event)) => {
                        if let Err(err) = scheduler
                            .submit(runtime.actor_id, route.name.clone(), out_event, runtime.delivery_config.clone())
                            .await
                        {
                            tracing::warn!(route = %route.name, actor = %runtime.actor_id, error = %err, "failed to submit delivery");
                        }
                    }
                    Ok(PipelineOutcome::Dropped { transform_kind }) => {
                        observer.emit(ObserverEvent::TransformDropped {
                            event_id: event.id,
                            route_name: route.name.clone(),
                            transform_kind,
                        });
                    }
                    Err(err) => {
                        // TransformError (§7): drop the event for this route
                        // only, other routes matching the same event are
                        // unaffected since each runs its own cloned event.
                        tracing::warn!(route = %route.name, event_id = %event.id, error = %err, "transform error, dropping event for this route");
                    }
                }
            }
        }

        offset = next_offset;
    }
}

#[cfg(test)]
#[path = "router_task_tests.rs"]
mod tests;
