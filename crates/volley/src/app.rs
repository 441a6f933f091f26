// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter wiring shared by `serve` and `start`.

use std::sync::Arc;

use tracing::{info, warn};
use volley_config::VolleyConfig;
use volley_core::{
    AuditSink, BlastStore, PluginAdapter, RecipientSource, TimerGateway, VolleyError,
};
use volley_engine::{BlastRunner, TimeoutDispatcher};
use volley_storage::SqliteStore;
use volley_whatsapp::WassengerMessenger;

/// Every collaborator of the blast runner, built from configuration.
pub struct App {
    pub store: Arc<SqliteStore>,
    pub timer: Arc<dyn TimerGateway + Send + Sync>,
    pub messenger: Arc<WassengerMessenger>,
    pub source: Arc<dyn RecipientSource + Send + Sync>,
    pub audit: Arc<dyn AuditSink + Send + Sync>,
    pub runner: Arc<BlastRunner>,
}

impl App {
    /// Open storage and build the adapters around `timer`.
    pub async fn build(
        config: &VolleyConfig,
        timer: Arc<dyn TimerGateway + Send + Sync>,
    ) -> Result<Self, VolleyError> {
        let store = SqliteStore::new(config.storage.clone());
        store.initialize().await?;
        let store = Arc::new(store);
        info!(path = %config.storage.database_path, "storage ready");

        let messenger = Arc::new(WassengerMessenger::new(config.messaging.clone())?);
        let source = volley_sheets::source_from_config(config)?;
        let audit = volley_sheets::audit_from_config(config)?;

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

        info!(
            timer = timer.name(),
            source = source.name(),
            audit = audit.name(),
            dry_run = config.messaging.dry_run,
            "adapters ready"
        );

        Ok(Self {
            store,
            timer,
            messenger,
            source,
            audit,
            runner,
        })
    }

    /// Adapters reported by `/health`.
    pub fn adapters(&self) -> Vec<Arc<dyn PluginAdapter>> {
        vec![
            self.store.clone(),
            self.timer.clone(),
            self.messenger.clone(),
            self.source.clone(),
            self.audit.clone(),
        ]
    }

    /// Shut adapters down, timer first and storage last.
    pub async fn shutdown(&self) {
        for adapter in self.adapters().into_iter().skip(1) {
            if let Err(e) = adapter.shutdown().await {
                warn!(adapter = adapter.name(), error = %e, "adapter shutdown failed");
            }
        }
        if let Err(e) = self.store.close().await {
            warn!(error = %e, "failed to close storage");
        }
    }
}
