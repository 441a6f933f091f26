// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end blast tests.
//!
//! `TestHarness` wires a [`BlastRunner`] to mock collaborators and a temp
//! SQLite store. The mock timer never fires by itself; tests call
//! [`TestHarness::fire_next`] to play the scheduler.

use std::sync::Arc;

use volley_config::model::{BlastConfig, StorageConfig, VolleyConfig};
use volley_core::{Blast, BlastStore, Delivery, TimerRequest, VolleyError};
use volley_engine::payload::TIMEOUT_PATH_PREFIX;
use volley_engine::{BlastRunner, ContinuationHandler, ContinuationOutcome, TimeoutDispatcher};
use volley_storage::SqliteStore;

use crate::mocks::{MockAuditSink, MockMessenger, MockRecipientSource, MockTimerGateway};

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    rows: Vec<String>,
    iteration_delay_secs: u64,
    max_wait_secs: u64,
    source_number: String,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            rows: Vec::new(),
            iteration_delay_secs: 1,
            max_wait_secs: 86_400,
            source_number: "+15550000000".to_string(),
        }
    }

    /// Raw rows returned by the mock source: text first, then phones.
    pub fn with_rows<I, S>(mut self, rows: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows = rows.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_iteration_delay(mut self, secs: u64) -> Self {
        self.iteration_delay_secs = secs;
        self
    }

    pub fn with_max_wait(mut self, secs: u64) -> Self {
        self.max_wait_secs = secs;
        self
    }

    /// Build the harness, creating the temp database.
    pub async fn build(self) -> Result<TestHarness, VolleyError> {
        let temp_dir =
            tempfile::TempDir::new().map_err(|e| VolleyError::Storage { source: e.into() })?;
        let db_path = temp_dir.path().join("test.db");

        let mut config = VolleyConfig::default();
        config.storage = StorageConfig {
            database_path: db_path.to_string_lossy().to_string(),
            wal_mode: true,
        };
        config.scheduler.max_wait_secs = self.max_wait_secs;
        config.blast = BlastConfig {
            iteration_delay_secs: self.iteration_delay_secs,
            source_number: self.source_number,
        };
        config.server.webhook_token = Some("test-token".to_string());

        let store = SqliteStore::new(config.storage.clone());
        store.initialize().await?;
        let store: Arc<dyn BlastStore + Send + Sync> = Arc::new(store);

        let messenger = Arc::new(MockMessenger::new());
        let timer = Arc::new(MockTimerGateway::new());
        let source = Arc::new(MockRecipientSource::new(self.rows));
        let audit = Arc::new(MockAuditSink::new());

        let dispatcher = Arc::new(TimeoutDispatcher::new(
            timer.clone(),
            config.scheduler.max_wait_secs,
        ));
        let runner = Arc::new(BlastRunner::new(
            store.clone(),
            source.clone(),
            messenger.clone(),
            audit.clone(),
            dispatcher,
            config.blast.clone(),
        ));
        let handler = ContinuationHandler::new(runner.clone());

        Ok(TestHarness {
            store,
            messenger,
            timer,
            source,
            audit,
            runner,
            handler,
            config,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete blast environment with mock adapters and temp storage.
pub struct TestHarness {
    /// SQLite store (temp DB, cleaned up on drop).
    pub store: Arc<dyn BlastStore + Send + Sync>,
    pub messenger: Arc<MockMessenger>,
    pub timer: Arc<MockTimerGateway>,
    pub source: Arc<MockRecipientSource>,
    pub audit: Arc<MockAuditSink>,
    pub runner: Arc<BlastRunner>,
    pub handler: ContinuationHandler,
    pub config: VolleyConfig,
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Start a blast from the mock source.
    pub async fn start(&self) -> Result<Blast, VolleyError> {
        self.runner.start().await
    }

    /// Deliver `request` to the continuation handler as the scheduler would.
    pub async fn fire(&self, request: &TimerRequest) -> Result<ContinuationOutcome, VolleyError> {
        let encoded = request
            .request_path
            .strip_prefix(TIMEOUT_PATH_PREFIX)
            .ok_or_else(|| {
                VolleyError::Internal(format!("unexpected callback path {}", request.request_path))
            })?;
        self.handler.handle_encoded(encoded).await
    }

    /// Fire the oldest pending wait. `None` when nothing is pending.
    pub async fn fire_next(&self) -> Option<Result<ContinuationOutcome, VolleyError>> {
        let request = self.timer.next_pending().await?;
        Some(self.fire(&request).await)
    }

    /// Fire pending waits until none remain or `max_steps` is reached.
    pub async fn drain(&self, max_steps: usize) -> Result<Vec<ContinuationOutcome>, VolleyError> {
        let mut outcomes = Vec::new();
        for _ in 0..max_steps {
            match self.fire_next().await {
                Some(result) => outcomes.push(result?),
                None => break,
            }
        }
        Ok(outcomes)
    }

    pub async fn blast(&self, id: &str) -> Result<Blast, VolleyError> {
        self.store
            .get_blast(id)
            .await?
            .ok_or_else(|| VolleyError::Internal(format!("no blast {id}")))
    }

    pub async fn deliveries(&self, id: &str) -> Result<Vec<Delivery>, VolleyError> {
        self.store.list_deliveries(id).await
    }
}
