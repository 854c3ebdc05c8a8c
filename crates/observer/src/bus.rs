// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use orgloop_core::{Logger, ObserverEvent};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Per-logger channel depth. A logger lagging behind this many events
/// starts losing them; the rest of the pipeline never notices.
const DEFAULT_BUFFER_SIZE: usize = 1024;

/// Fans an [`ObserverEvent`] out to every registered logger without ever
/// blocking the caller. Callers should construct one bus per engine
/// instance and call [`ObserverBus::emit`] from every pipeline stage.
pub struct ObserverBus {
    senders: Vec<(String, mpsc::Sender<Arc<ObserverEvent>>)>,
    handles: Vec<JoinHandle<()>>,
    cancel: CancellationToken,
}

impl ObserverBus {
    pub fn new(cancel: CancellationToken) -> Self {
        Self { senders: Vec::new(), handles: Vec::new(), cancel }
    }

    /// Register an already-initialized logger under `name` with the
    /// default buffer size. The logger's `init` is the caller's
    /// responsibility (it is connector-specific and may need config this
    /// bus has no business seeing).
    pub fn register(&mut self, name: impl Into<String>, logger: Box<dyn Logger>) {
        self.register_with_buffer(name, logger, DEFAULT_BUFFER_SIZE);
    }

    pub fn register_with_buffer(&mut self, name: impl Into<String>, mut logger: Box<dyn Logger>, buffer_size: usize) {
        let name = name.into();
        let (tx, mut rx) = mpsc::channel::<Arc<ObserverEvent>>(buffer_size);
        let cancel = self.cancel.clone();
        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    received = rx.recv() => match received {
                        Some(event) => logger.observe(&event),
                        None => break,
                    }
                }
            }
            logger.shutdown().await;
        });
        self.senders.push((name, tx));
        self.handles.push(handle);
    }

    /// Fan `event` out to every registered logger. Never blocks: a logger
    /// whose buffer is full (or whose task has exited) simply misses this
    /// event (§4.8).
    pub fn emit(&self, event: ObserverEvent) {
        let event = Arc::new(event);
        for (name, tx) in &self.senders {
            if tx.try_send(Arc::clone(&event)).is_err() {
                tracing::debug!(logger = name.as_str(), kind = event.kind(), "observer buffer full, dropping event for this logger");
            }
        }
    }

    /// Close every logger's channel and wait for its task to drain and
    /// call `shutdown`. Part of the engine's shutdown sequence (§4.9).
    pub async fn shutdown(mut self) {
        self.senders.clear();
        for handle in self.handles.drain(..) {
            let _ = handle.await;
        }
    }
}

#[cfg(test)]
#[path = "bus_tests.rs"]
mod tests;
