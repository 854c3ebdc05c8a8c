// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Route handlers for the two HTTP surfaces (§4.4, §6).

use crate::config::ListenerConfig;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use orgloop_observer::ObserverBus;
use orgloop_sources::{HookRegistry, WebhookRegistry};
use orgloop_wal::Wal;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Everything a request handler needs: the registries it dispatches
/// through, the bus/observer every ingestion path appends and emits to,
/// and the drain flag the supervisor flips before it starts waiting on
/// in-flight deliveries (§4.9).
pub struct ListenerState {
    pub wal: Arc<Wal>,
    pub observer: Arc<ObserverBus>,
    pub webhooks: Arc<WebhookRegistry>,
    pub hooks: Arc<HookRegistry>,
    pub draining: Arc<AtomicBool>,
    pub max_body_bytes: usize,
}

pub fn build_router(state: Arc<ListenerState>, config: &ListenerConfig) -> Router {
    Router::new()
        .route("/webhooks/:source_id", post(webhook_handler))
        .route("/hooks/:hook_name", post(hook_handler))
        .layer(axum::extract::DefaultBodyLimit::max(config.max_body_bytes))
        .with_state(state)
}

fn is_json_content_type(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("application/json"))
        .unwrap_or(false)
}

async fn webhook_handler(
    State(state): State<Arc<ListenerState>>,
    Path(source_id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if state.draining.load(Ordering::Relaxed) {
        return (StatusCode::SERVICE_UNAVAILABLE, "engine is draining").into_response();
    }
    if body.len() > state.max_body_bytes {
        return StatusCode::PAYLOAD_TOO_LARGE.into_response();
    }
    if !state.webhooks.contains(&source_id) {
        return (StatusCode::NOT_FOUND, format!("no webhook source registered for {source_id:?}")).into_response();
    }
    if !is_json_content_type(&headers) {
        return (StatusCode::BAD_REQUEST, "expected content-type: application/json").into_response();
    }

    match state.webhooks.ingest(&source_id, &body, &state.wal, &state.observer).await {
        Ok(_count) => StatusCode::ACCEPTED.into_response(),
        Err(err) => (StatusCode::BAD_REQUEST, err.to_string()).into_response(),
    }
}

async fn hook_handler(
    State(state): State<Arc<ListenerState>>,
    Path(hook_name): Path<String>,
    body: Bytes,
) -> Response {
    if state.draining.load(Ordering::Relaxed) {
        return (StatusCode::SERVICE_UNAVAILABLE, "engine is draining").into_response();
    }
    if body.len() > state.max_body_bytes {
        return StatusCode::PAYLOAD_TOO_LARGE.into_response();
    }
    if !state.hooks.contains(&hook_name) {
        return (StatusCode::NOT_FOUND, format!("no hook registered under {hook_name:?}")).into_response();
    }
    let Ok(text) = std::str::from_utf8(&body) else {
        return (StatusCode::BAD_REQUEST, "body is not valid UTF-8").into_response();
    };

    match state.hooks.ingest(&hook_name, text, &state.wal, &state.observer) {
        Ok(_count) => StatusCode::ACCEPTED.into_response(),
        Err(err) => (StatusCode::BAD_REQUEST, err.to_string()).into_response(),
    }
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
