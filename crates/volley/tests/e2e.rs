// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests over real HTTP.
//!
//! Each test binds the router on an ephemeral port and uses the local timer
//! backend, so every continuation really leaves the process and comes back
//! through `/timeout/{payload}`. Only the transport and the audit log are
//! mocked.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use volley_config::model::{BlastConfig, StorageConfig};
use volley_core::{Blast, BlastStatus, BlastStore, DeliveryStatus};
use volley_engine::{BlastRunner, ContinuationHandler, TimeoutDispatcher};
use volley_gateway::{AuthConfig, GatewayState, HealthState, serve_listener};
use volley_sheets::{CsvLocation, CsvRecipientSource};
use volley_storage::SqliteStore;
use volley_test_utils::{MockAuditSink, MockMessenger};
use volley_timer::LocalTimerGateway;

struct Service {
    base_url: String,
    store: Arc<SqliteStore>,
    messenger: Arc<MockMessenger>,
    audit: Arc<MockAuditSink>,
    cancel: CancellationToken,
    _dir: tempfile::TempDir,
}

impl Service {
    async fn spawn(rows: &str, iteration_delay_secs: u64, max_wait_secs: u64) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let csv = dir.path().join("rows.csv");
        std::fs::write(&csv, rows).unwrap();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let cancel = CancellationToken::new();

        let store = Arc::new(SqliteStore::new(StorageConfig {
            database_path: dir.path().join("volley.db").to_string_lossy().to_string(),
            wal_mode: true,
        }));
        store.initialize().await.unwrap();

        let timer = Arc::new(LocalTimerGateway::new(base_url.clone(), cancel.child_token()).unwrap());
        let messenger = Arc::new(MockMessenger::new());
        let audit = Arc::new(MockAuditSink::new());
        let source = Arc::new(CsvRecipientSource::new(CsvLocation::File(csv)).unwrap());

        let runner = Arc::new(BlastRunner::new(
            store.clone(),
            source,
            messenger.clone(),
            audit.clone(),
            Arc::new(TimeoutDispatcher::new(timer, max_wait_secs)),
            BlastConfig {
                iteration_delay_secs,
                source_number: "+15550000000".to_string(),
            },
        ));
        let state = GatewayState {
            handler: ContinuationHandler::new(runner),
            auth: AuthConfig::new(Some("e2e-token".to_string())),
            health: HealthState::new(vec![store.clone()]),
        };
        tokio::spawn(serve_listener(listener, state, cancel.clone()));

        Self {
            base_url,
            store,
            messenger,
            audit,
            cancel,
            _dir: dir,
        }
    }

    async fn trigger(&self) -> String {
        let response = reqwest::Client::new()
            .post(format!("{}/blast/e2e-token", self.base_url))
            .send()
            .await
            .unwrap();
        assert!(response.status().is_success());
        let body: serde_json::Value = response.json().await.unwrap();
        body["blast_id"].as_str().unwrap().to_string()
    }

    async fn wait_terminal(&self, id: &str, timeout: Duration) -> Blast {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let blast = self.store.get_blast(id).await.unwrap().unwrap();
            if blast.status.is_terminal() {
                return blast;
            }
            assert!(
                tokio::time::Instant::now() < deadline,
                "blast {id} still {} at index {}",
                blast.status,
                blast.last_sent_index
            );
            tokio::time::sleep(Duration::from_millis(25)).await;
        }
    }
}

impl Drop for Service {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn blast_walks_every_recipient_over_http() {
    let service = Service::spawn("hello world\n+1000\n+2000\n+3000\n", 0, 60).await;

    let id = service.trigger().await;
    let blast = service.wait_terminal(&id, Duration::from_secs(10)).await;

    assert_eq!(blast.status, BlastStatus::Done);
    assert_eq!(blast.last_sent_index, 2);
    assert!(blast.ended_at.is_some());
    assert_eq!(
        service.messenger.sent_phones().await,
        vec!["+1000", "+2000", "+3000"]
    );

    let deliveries = service.store.list_deliveries(&id).await.unwrap();
    assert_eq!(deliveries.len(), 3);
    assert!(deliveries.iter().all(|d| d.status == DeliveryStatus::Sent));
    assert_eq!(service.audit.reports().await.len(), 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn long_delay_is_chained_through_capped_waits() {
    // Every step waits 2s, delivered as two 1s waits.
    let service = Service::spawn("hello world\n+1000\n+2000\n", 2, 1).await;

    let id = service.trigger().await;
    assert_eq!(service.messenger.sent_phones().await, vec!["+1000"]);

    let blast = service.wait_terminal(&id, Duration::from_secs(15)).await;
    assert_eq!(blast.status, BlastStatus::Done);
    assert_eq!(service.messenger.sent_phones().await, vec!["+1000", "+2000"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn fatal_transport_error_stops_the_chain() {
    let service = Service::spawn("hello world\n+1000\n+2000\n+3000\n", 0, 60).await;
    service.messenger.fail_for("+2000", 401, true).await;

    let id = service.trigger().await;
    let blast = service.wait_terminal(&id, Duration::from_secs(10)).await;

    assert_eq!(blast.status, BlastStatus::Error);
    assert_eq!(service.messenger.sent_phones().await, vec!["+1000"]);
    let deliveries = service.store.list_deliveries(&id).await.unwrap();
    assert_eq!(deliveries.len(), 2);
    assert_eq!(deliveries[1].status, DeliveryStatus::Failed);
}
