// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use orgloop_core::{EventType, Provenance, SourceInstanceId};
use orgloop_wal::FsyncPolicy;
use tokio_util::sync::CancellationToken;

struct EchoWebhook {
    source_id: SourceInstanceId,
}

#[async_trait]
impl WebhookSource for EchoWebhook {
    async fn translate(&self, body: &[u8]) -> Result<Vec<Event>, SourceError> {
        if body.is_empty() {
            return Err(SourceError::Transient("empty body".to_string()));
        }
        Ok(vec![Event {
            id: Default::default(),
            source: self.source_id,
            event_type: EventType::ResourceChanged,
            timestamp: chrono::Utc::now(),
            provenance: Provenance::default(),
            payload: Default::default(),
            fingerprint: None,
        }])
    }
}

#[tokio::test]
async fn ingest_translates_and_appends() {
    let wal_dir = tempfile::tempdir().expect("tempdir");
    let wal = Wal::open(wal_dir.path(), FsyncPolicy::PerRecord).expect("open wal");
    let observer = ObserverBus::new(CancellationToken::new());
    let source_id = SourceInstanceId::new();

    let registry = WebhookRegistry::new();
    registry.register(source_id.to_string(), Arc::new(EchoWebhook { source_id }));

    let count = registry.ingest(source_id.as_str(), b"payload", &wal, &observer).await.expect("ingest");
    assert_eq!(count, 1);

    let mut seen = 0;
    wal.tail(0, &CancellationToken::new(), |_offset, _event| seen += 1).await.expect("tail");
    assert_eq!(seen, 1);
}

#[tokio::test]
async fn ingest_against_an_unregistered_source_fails() {
    let wal_dir = tempfile::tempdir().expect("tempdir");
    let wal = Wal::open(wal_dir.path(), FsyncPolicy::PerRecord).expect("open wal");
    let observer = ObserverBus::new(CancellationToken::new());
    let registry = WebhookRegistry::new();

    let err = registry.ingest("sin-unknown", b"x", &wal, &observer).await.unwrap_err();
    assert!(matches!(err, SourceRunnerError::UnknownWebhookSource { .. }));
}

#[tokio::test]
async fn translation_failure_is_surfaced() {
    let wal_dir = tempfile::tempdir().expect("tempdir");
    let wal = Wal::open(wal_dir.path(), FsyncPolicy::PerRecord).expect("open wal");
    let observer = ObserverBus::new(CancellationToken::new());
    let source_id = SourceInstanceId::new();
    let registry = WebhookRegistry::new();
    registry.register(source_id.to_string(), Arc::new(EchoWebhook { source_id }));

    let err = registry.ingest(source_id.as_str(), b"", &wal, &observer).await.unwrap_err();
    assert!(matches!(err, SourceRunnerError::Translate { .. }));
}
