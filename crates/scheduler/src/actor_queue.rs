// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One actor's bounded FIFO queue and its worker pool (§4.7).

use crate::config::ActorSchedulerConfig;
use crate::error::SchedulerError;
use crate::job::DeliveryJob;
use orgloop_core::{Actor, ActorId, DeliverOutcome, DeliverResult, DeliveryStatus, ObserverEvent};
use orgloop_observer::ObserverBus;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex as AsyncMutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub struct ActorQueue {
    actor_id: ActorId,
    tx: mpsc::Sender<DeliveryJob>,
    handles: Vec<JoinHandle<()>>,
    in_flight: Arc<AtomicUsize>,
}

impl ActorQueue {
    pub fn spawn(
        actor_id: ActorId,
        actor: Arc<dyn Actor>,
        config: ActorSchedulerConfig,
        observer: Arc<ObserverBus>,
        cancel: CancellationToken,
    ) -> Self {
        let (tx, rx) = mpsc::channel::<DeliveryJob>(config.queue_size.max(1));
        let rx = Arc::new(AsyncMutex::new(rx));
        let in_flight = Arc::new(AtomicUsize::new(0));
        let mut handles = Vec::with_capacity(config.workers);
        for worker_id in 0..config.workers.max(1) {
            let rx = Arc::clone(&rx);
            let retry_tx = tx.clone();
            let actor = Arc::clone(&actor);
            let observer = Arc::clone(&observer);
            let cancel = cancel.clone();
            let config = config.clone();
            let in_flight = Arc::clone(&in_flight);
            handles.push(tokio::spawn(async move {
                run_worker(worker_id, actor_id, actor.as_ref(), rx, retry_tx, config, observer, cancel, in_flight).await;
            }));
        }
        Self { actor_id, tx, handles, in_flight }
    }

    /// Deliveries currently past `submit` and not yet resolved (delivered,
    /// rejected, or exhausted). Used by the supervisor's drain phase to
    /// report how much in-flight work a shutdown waited for (§4.9).
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Relaxed)
    }

    /// Enqueue a job. Blocks when the queue is full: this is the
    /// backpressure edge in §4.7 — the caller (ultimately the bus tailer)
    /// stalls rather than the event being dropped.
    pub async fn submit(&self, job: DeliveryJob) -> Result<(), SchedulerError> {
        self.tx
            .send(job)
            .await
            .map_err(|_| SchedulerError::QueueClosed { actor_id: self.actor_id.to_string() })
    }

    pub async fn shutdown(self) {
        drop(self.tx);
        for handle in self.handles {
            let _ = handle.await;
        }
    }
}

async fn run_worker(
    worker_id: usize,
    actor_id: ActorId,
    actor: &dyn Actor,
    rx: Arc<AsyncMutex<mpsc::Receiver<DeliveryJob>>>,
    retry_tx: mpsc::Sender<DeliveryJob>,
    config: ActorSchedulerConfig,
    observer: Arc<ObserverBus>,
    cancel: CancellationToken,
    in_flight: Arc<AtomicUsize>,
) {
    loop {
        let job = {
            let mut guard = rx.lock().await;
            tokio::select! {
                _ = cancel.cancelled() => return,
                received = guard.recv() => match received {
                    Some(job) => job,
                    None => return,
                },
            }
        };
        tracing::debug!(actor = %actor_id, worker_id, event_id = %job.event.id, attempt_n = job.attempt.attempt_n, "delivering");
        in_flight.fetch_add(1, Ordering::Relaxed);
        handle_job(job, actor, &retry_tx, &config, &observer, &cancel).await;
        in_flight.fetch_sub(1, Ordering::Relaxed);
    }
}

async fn handle_job(
    mut job: DeliveryJob,
    actor: &dyn Actor,
    retry_tx: &mpsc::Sender<DeliveryJob>,
    config: &ActorSchedulerConfig,
    observer: &ObserverBus,
    cancel: &CancellationToken,
) {
    observer.emit(ObserverEvent::DeliveryAttempt { attempt: job.attempt.clone() });

    let deliver = actor.deliver(&job.event, &job.config, cancel);
    let outcome = tokio::select! {
        _ = cancel.cancelled() => return,
        result = tokio::time::timeout(config.deliver_timeout, deliver) => result,
    };
    let outcome = outcome.unwrap_or_else(|_| DeliverOutcome::error("delivery timed out"));

    match outcome.result {
        DeliverResult::Delivered => {
            job.attempt.status = DeliveryStatus::Delivered;
            job.attempt.error = None;
            observer.emit(ObserverEvent::DeliveryResult { attempt: job.attempt });
        }
        DeliverResult::Rejected => {
            job.attempt.status = DeliveryStatus::Rejected;
            job.attempt.error = outcome.error;
            observer.emit(ObserverEvent::DeliveryResult { attempt: job.attempt });
        }
        DeliverResult::Error => {
            job.attempt.status = DeliveryStatus::Error;
            job.attempt.error = outcome.error;
            if config.backoff.is_exhausted(job.attempt.attempt_n) {
                job.attempt.status = DeliveryStatus::Failed;
                observer.emit(ObserverEvent::DeliveryResult { attempt: job.attempt });
                return;
            }
            let delay = config.backoff.delay_for(job.attempt.attempt_n);
            let next_attempt_at = chrono::Utc::now() + chrono::Duration::from_std(delay).unwrap_or_default();
            job.attempt.attempt_n += 1;
            job.attempt.status = DeliveryStatus::Scheduled;
            job.attempt.next_attempt_at = Some(next_attempt_at);
            observer.emit(ObserverEvent::DeliveryResult { attempt: job.attempt.clone() });

            let retry_tx = retry_tx.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move {
                tokio::select! {
                    _ = cancel.cancelled() => {}
                    _ = tokio::time::sleep(delay) => {
                        let _ = retry_tx.send(job).await;
                    }
                }
            });
        }
    }
}

#[cfg(test)]
#[path = "actor_queue_tests.rs"]
mod tests;
