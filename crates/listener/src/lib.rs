// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! orgloop-listener: the loopback HTTP ingestion surface (§4.4).
//!
//! Binds `POST /webhooks/{source_id}` and `POST /hooks/{hook_name}` to the
//! registries `orgloop-sources` already owns; this crate only adds the HTTP
//! transport and the drain-aware `503` behavior the bus-level registries
//! have no business knowing about.

pub mod config;
pub mod error;
pub mod routes;

pub use config::{ListenerConfig, DEFAULT_MAX_BODY_BYTES, DEFAULT_PORT};
pub use error::ListenerError;
pub use routes::ListenerState;

use orgloop_observer::ObserverBus;
use orgloop_sources::{HookRegistry, WebhookRegistry};
use orgloop_wal::Wal;
use std::net::SocketAddr;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

/// Bind the loopback socket. Split out from [`run`] so the supervisor can
/// surface a bind failure as a fatal startup error before spawning the
/// long-running accept loop (§4.9).
pub async fn bind(addr: SocketAddr) -> Result<TcpListener, ListenerError> {
    TcpListener::bind(addr).await.map_err(|source| ListenerError::Bind { addr, source })
}

/// Serve HTTP requests on an already-bound `listener` until `cancel` fires.
/// Graceful: in-flight requests finish, no new connections are accepted
/// once cancellation is observed.
pub async fn run(
    listener: TcpListener,
    config: ListenerConfig,
    wal: Arc<Wal>,
    observer: Arc<ObserverBus>,
    webhooks: Arc<WebhookRegistry>,
    hooks: Arc<HookRegistry>,
    draining: Arc<AtomicBool>,
    cancel: CancellationToken,
) -> Result<(), ListenerError> {
    let state = Arc::new(ListenerState { wal, observer, webhooks, hooks, draining, max_body_bytes: config.max_body_bytes });
    let app = routes::build_router(state, &config);
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await?;
    Ok(())
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
