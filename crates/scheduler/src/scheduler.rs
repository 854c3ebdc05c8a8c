// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The top-level delivery scheduler: one [`crate::actor_queue::ActorQueue`]
//! per registered actor (§4.7).

use crate::actor_queue::ActorQueue;
use crate::config::ActorSchedulerConfig;
use crate::error::SchedulerError;
use crate::job::DeliveryJob;
use orgloop_core::{Actor, ActorId, DeliveryAttempt, Event, RouteName};
use orgloop_observer::ObserverBus;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub struct Scheduler {
    queues: HashMap<ActorId, ActorQueue>,
    observer: Arc<ObserverBus>,
    cancel: CancellationToken,
}

impl Scheduler {
    pub fn new(observer: Arc<ObserverBus>, cancel: CancellationToken) -> Self {
        Self { queues: HashMap::new(), observer, cancel }
    }

    /// Start a worker pool for `actor_id`. Must be called once per actor
    /// before any route can `submit` against it (§4.9 startup order: the
    /// supervisor calls this for every declared actor before starting
    /// source runners).
    pub fn register_actor(&mut self, actor_id: ActorId, actor: Arc<dyn Actor>, config: ActorSchedulerConfig) {
        let queue = ActorQueue::spawn(actor_id, actor, config, Arc::clone(&self.observer), self.cancel.clone());
        self.queues.insert(actor_id, queue);
    }

    /// Enqueue a `{event, route}` delivery for `actor_id`. Blocks if that
    /// actor's queue is full (§4.7 backpressure); this is how flow control
    /// propagates back through the router into the bus tailer.
    pub async fn submit(
        &self,
        actor_id: ActorId,
        route_name: RouteName,
        event: Event,
        config: Map<String, Value>,
    ) -> Result<(), SchedulerError> {
        let queue = self
            .queues
            .get(&actor_id)
            .ok_or_else(|| SchedulerError::UnknownActor { actor_id: actor_id.to_string() })?;
        let attempt = DeliveryAttempt::scheduled(event.id, route_name, actor_id);
        queue.submit(DeliveryJob { event, config, attempt }).await
    }

    /// Sum of in-flight deliveries across every registered actor. The
    /// supervisor samples this while racing the drain timeout so it can log
    /// how much work it waited for versus force-terminated.
    pub fn in_flight(&self) -> usize {
        self.queues.values().map(|q| q.in_flight()).sum()
    }

    /// Stop accepting new work and drain every actor's queue (§4.9). The
    /// supervisor is responsible for the timeout half of the drain phase:
    /// it races this against `drain_timeout` and force-terminates after.
    pub async fn shutdown(self) {
        for (_, queue) in self.queues {
            queue.shutdown().await;
        }
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
