// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The engine supervisor (§4.9): owns the startup order, the running
//! topology's background tasks, and the graceful drain shutdown sequence.
//!
//! Deliberately not a module-level singleton (§9 "Process-wide state"):
//! `Engine` is a plain owned value with explicit `start`/`shutdown`, so a
//! test process can run several engines against separate `data_dir`s at
//! once.

use crate::config::EngineConfig;
use crate::error::SupervisorError;
use crate::router_task::{self, RouteRuntime};
use crate::sweep;
use crate::topology::{EngineTopology, SourceMode};
use orgloop_checkpoint::CheckpointStore;
use orgloop_core::{Logger, ObserverEvent, RouteName};
use orgloop_observer::{ConsoleLogger, ObserverBus};
use orgloop_router::{RouteIndex, TransformDeps};
use orgloop_scheduler::Scheduler;
use orgloop_sources::{HookRegistry, WebhookRegistry};
use orgloop_wal::Wal;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// What a [`Engine::shutdown`] call waited for and whether it had to force
/// terminate (SPEC_FULL §C "graceful drain metrics").
#[derive(Debug, Clone, Copy)]
pub struct DrainReport {
    pub in_flight_at_drain_start: usize,
    pub forced: bool,
}

/// A running engine instance. Holds every background task's join handle
/// so [`Engine::shutdown`] can wait on them in the order §4.9 specifies.
pub struct Engine {
    drain_timeout: std::time::Duration,
    draining: Arc<AtomicBool>,
    ingest_cancel: CancellationToken,
    delivery_cancel: CancellationToken,
    observer: Arc<ObserverBus>,
    scheduler: Arc<Scheduler>,
    listener_handle: JoinHandle<Result<(), orgloop_listener::ListenerError>>,
    router_handle: JoinHandle<()>,
    source_handles: Vec<JoinHandle<()>>,
    sweep_handles: Vec<JoinHandle<()>>,
}

impl Engine {
    /// Run the full startup order (§4.9): open bus, open checkpoint
    /// store, instantiate connectors, resolve routes, start listener,
    /// start source runners, start schedulers.
    pub async fn start(
        topology: EngineTopology,
        config: EngineConfig,
        extra_loggers: Vec<(String, Box<dyn Logger>)>,
    ) -> Result<Self, SupervisorError> {
        let ingest_cancel = CancellationToken::new();
        let delivery_cancel = CancellationToken::new();

        // 1. Open bus.
        let wal = Arc::new(Wal::open(config.wal_dir(), config.fsync_policy)?);

        // 2. Open checkpoint store.
        let checkpoints = Arc::new(CheckpointStore::open(config.checkpoint_dir())?);

        // Observer bus: console logger is always registered (SPEC_FULL §B);
        // extra_loggers are whatever sinks the caller wants tapped in too.
        let mut observer = ObserverBus::new(ingest_cancel.clone());
        observer.register("console", Box::new(ConsoleLogger));
        for (name, logger) in extra_loggers {
            observer.register(name, logger);
        }
        let observer = Arc::new(observer);

        // Resolve routes against sources/actors up front (§4.9, invariant
        // 3 §3), before anything is instantiated — a dead or orphan
        // reference is a config error independent of connector init luck.
        topology.validate()?;
        let EngineTopology { sources, mut actors, routes, gate_capabilities } = topology;

        // 3. Instantiate connectors. Actor init failure is fatal to
        // startup (no route bound to it could ever deliver, see
        // DESIGN.md); source init failure disables just that source and
        // logs, other sources continue (§7 `SourceFatal`).
        let mut scheduler = Scheduler::new(Arc::clone(&observer), delivery_cancel.clone());
        for decl in &mut actors {
            decl.actor.init(&decl.spec.config).await.map_err(|err| SupervisorError::ActorInitFailed {
                actor_id: decl.spec.id.to_string(),
                message: err.to_string(),
            })?;
        }
        let actors = actors;

        let webhooks = Arc::new(WebhookRegistry::new());
        let hooks = Arc::new(HookRegistry::new());
        let mut live_sources = Vec::with_capacity(sources.len());
        for mut decl in sources {
            match decl.mode {
                SourceMode::Poll { ref mut source, .. } => {
                    if let Err(err) = source.init(&decl.spec.config).await {
                        tracing::error!(source = %decl.spec.id, error = %err, "source failed to initialize, disabling it");
                        observer.emit(ObserverEvent::EngineLifecycle {
                            phase: "startup".to_string(),
                            message: format!("source {} disabled: {err}", decl.spec.id),
                        });
                        continue;
                    }
                }
                SourceMode::Webhook { ref source } => {
                    webhooks.register(decl.spec.id.to_string(), Arc::clone(source));
                }
                SourceMode::Hook => {
                    hooks.register(decl.spec.id.to_string(), decl.spec.id);
                }
            }
            live_sources.push(decl);
        }

        // 4. Routes are already validated above; build their runtime pipelines.
        let deps = TransformDeps { checkpoints: Arc::clone(&checkpoints), gate_capabilities: Arc::new(gate_capabilities) };
        let runtimes: HashMap<RouteName, RouteRuntime> = router_task::build_route_runtimes(&routes, &deps)?;
        let runtimes = Arc::new(runtimes);
        let index = Arc::new(RouteIndex::build(routes));

        // 5. Start listener.
        let listener_addr = config.listener.addr;
        let tcp_listener = orgloop_listener::bind(listener_addr).await?;
        let draining = Arc::new(AtomicBool::new(false));
        let listener_handle = {
            let wal = Arc::clone(&wal);
            let observer = Arc::clone(&observer);
            let webhooks = Arc::clone(&webhooks);
            let hooks = Arc::clone(&hooks);
            let draining = Arc::clone(&draining);
            let cancel = ingest_cancel.clone();
            let listener_config = config.listener;
            tokio::spawn(async move {
                orgloop_listener::run(tcp_listener, listener_config, wal, observer, webhooks, hooks, draining, cancel).await
            })
        };

        // 6. Start source runners (poll-mode only; webhook/hook sources
        // are driven by the listener or an external forwarder).
        let mut source_handles = Vec::new();
        for decl in live_sources {
            if let SourceMode::Poll { source, config: poll_config } = decl.mode {
                let wal = Arc::clone(&wal);
                let checkpoints = Arc::clone(&checkpoints);
                let observer = Arc::clone(&observer);
                let cancel = ingest_cancel.clone();
                let source_id = decl.spec.id;
                source_handles.push(tokio::spawn(async move {
                    orgloop_sources::run_poll_source(source_id, source, wal, checkpoints, observer, poll_config, cancel).await;
                }));
            }
        }

        // 7. Start schedulers.
        for decl in actors {
            let actor: Arc<dyn orgloop_core::Actor> = Arc::from(decl.actor);
            scheduler.register_actor(decl.spec.id, actor, decl.scheduler);
        }
        let scheduler = Arc::new(scheduler);

        let router_handle = {
            let wal = Arc::clone(&wal);
            let scheduler = Arc::clone(&scheduler);
            let observer = Arc::clone(&observer);
            let cancel = ingest_cancel.clone();
            tokio::spawn(async move { router_task::run(wal, 0, index, runtimes, scheduler, observer, cancel).await })
        };

        let mut sweep_handles = Vec::new();
        sweep_handles.push(tokio::spawn(sweep::run_checkpoint_sweep(
            Arc::clone(&checkpoints),
            config.checkpoint_sweep_interval,
            ingest_cancel.clone(),
        )));
        sweep_handles.push(tokio::spawn(sweep::run_compaction_sweep(
            Arc::clone(&wal),
            config.compaction,
            config.compaction_interval,
            ingest_cancel.clone(),
        )));

        observer.emit(ObserverEvent::EngineLifecycle { phase: "startup".to_string(), message: "engine started".to_string() });

        Ok(Self {
            drain_timeout: config.drain_timeout,
            draining,
            ingest_cancel,
            delivery_cancel,
            observer,
            scheduler,
            listener_handle,
            router_handle,
            source_handles,
            sweep_handles,
        })
    }

    /// Deliveries currently in flight across every actor (used by tests
    /// and by callers racing their own shutdown timeout).
    pub fn in_flight_deliveries(&self) -> usize {
        self.scheduler.in_flight()
    }

    /// Graceful drain shutdown (§4.9): stop accepting new events, wait up
    /// to `drain_timeout` for in-flight deliveries, then force-terminate.
    pub async fn shutdown(self) -> DrainReport {
        self.draining.store(true, Ordering::Relaxed);
        self.observer.emit(ObserverEvent::EngineLifecycle {
            phase: "drain".to_string(),
            message: "draining: no longer accepting new events".to_string(),
        });

        // Stop producing new events: listener, poll sources, and the
        // router's own tail loop all share `ingest_cancel`.
        self.ingest_cancel.cancel();
        for handle in self.source_handles {
            let _ = handle.await;
        }
        let _ = self.listener_handle.await;
        let _ = self.router_handle.await;
        for handle in self.sweep_handles {
            let _ = handle.await;
        }

        let in_flight_at_drain_start = self.scheduler.in_flight();
        tracing::info!(in_flight = in_flight_at_drain_start, "waiting for in-flight deliveries to drain");

        let forced = match Arc::try_unwrap(self.scheduler) {
            Ok(scheduler) => match tokio::time::timeout(self.drain_timeout, scheduler.shutdown()).await {
                Ok(()) => false,
                Err(_) => {
                    tracing::warn!(timeout_secs = self.drain_timeout.as_secs(), "drain timeout exceeded, forcing termination");
                    self.delivery_cancel.cancel();
                    true
                }
            },
            Err(_) => {
                tracing::warn!("scheduler still had outstanding references at shutdown, forcing termination");
                self.delivery_cancel.cancel();
                true
            }
        };

        self.observer.emit(ObserverEvent::EngineLifecycle {
            phase: "shutdown".to_string(),
            message: format!("drain complete, forced={forced}"),
        });
        match Arc::try_unwrap(self.observer) {
            Ok(observer) => observer.shutdown().await,
            Err(_) => tracing::warn!("observer bus still had outstanding references at shutdown"),
        }

        DrainReport { in_flight_at_drain_start, forced }
    }
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
