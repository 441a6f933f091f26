// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the BlastStore trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use volley_config::model::StorageConfig;
use volley_core::{
    AdapterType, Blast, BlastRecipient, BlastStatus, BlastStore, Delivery, DeliveryStatus,
    HealthStatus, PluginAdapter, VolleyError,
};

use crate::database::{Database, map_tr_err};
use crate::queries;

/// SQLite-backed progress store.
///
/// The database is opened on the first call to [`BlastStore::initialize`].
pub struct SqliteStore {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStore {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    fn db(&self) -> Result<&Database, VolleyError> {
        self.db.get().ok_or_else(|| VolleyError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }

    async fn checkpoint(db: &Database) -> Result<(), VolleyError> {
        db.connection()
            .call(|conn| conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);"))
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}

#[async_trait]
impl PluginAdapter for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Store
    }

    async fn health_check(&self) -> Result<HealthStatus, VolleyError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| conn.execute_batch("SELECT 1;"))
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), VolleyError> {
        if let Some(db) = self.db.get() {
            Self::checkpoint(db).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl BlastStore for SqliteStore {
    async fn initialize(&self) -> Result<(), VolleyError> {
        let db = Database::open_with(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| VolleyError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite store initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), VolleyError> {
        Self::checkpoint(self.db()?).await
    }

    async fn create_blast(&self, blast: &Blast) -> Result<(), VolleyError> {
        queries::blasts::create_blast(self.db()?, blast).await
    }

    async fn get_blast(&self, id: &str) -> Result<Option<Blast>, VolleyError> {
        queries::blasts::get_blast(self.db()?, id).await
    }

    async fn list_blasts(&self, status: Option<BlastStatus>) -> Result<Vec<Blast>, VolleyError> {
        queries::blasts::list_blasts(self.db()?, status).await
    }

    async fn advance_cursor(
        &self,
        id: &str,
        expected: i64,
        next: i64,
    ) -> Result<bool, VolleyError> {
        queries::blasts::advance_cursor(self.db()?, id, expected, next).await
    }

    async fn finish_blast(
        &self,
        id: &str,
        status: BlastStatus,
        ended_at: &str,
    ) -> Result<bool, VolleyError> {
        queries::blasts::finish_blast(self.db()?, id, status, ended_at).await
    }

    async fn insert_recipients(&self, recipients: &[BlastRecipient]) -> Result<(), VolleyError> {
        queries::recipients::insert_recipients(self.db()?, recipients).await
    }

    async fn list_recipients(&self, blast_id: &str) -> Result<Vec<BlastRecipient>, VolleyError> {
        queries::recipients::list_recipients(self.db()?, blast_id).await
    }

    async fn claim_delivery(
        &self,
        blast_id: &str,
        index: i64,
        phone: &str,
    ) -> Result<bool, VolleyError> {
        queries::deliveries::claim_delivery(self.db()?, blast_id, index, phone).await
    }

    async fn complete_delivery(
        &self,
        blast_id: &str,
        index: i64,
        status: DeliveryStatus,
        detail: Option<&str>,
    ) -> Result<(), VolleyError> {
        queries::deliveries::complete_delivery(self.db()?, blast_id, index, status, detail).await
    }

    async fn list_deliveries(&self, blast_id: &str) -> Result<Vec<Delivery>, VolleyError> {
        queries::deliveries::list_deliveries(self.db()?, blast_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn make_config(path: &std::path::Path) -> StorageConfig {
        StorageConfig {
            database_path: path.to_str().unwrap().to_string(),
            wal_mode: true,
        }
    }

    #[tokio::test]
    async fn sqlite_store_implements_plugin_adapter() {
        let dir = tempdir().unwrap();
        let store = SqliteStore::new(make_config(&dir.path().join("meta.db")));
        assert_eq!(store.name(), "sqlite");
        assert_eq!(store.version(), semver::Version::new(0, 1, 0));
        assert_eq!(store.adapter_type(), AdapterType::Store);
    }

    #[tokio::test]
    async fn operations_fail_before_initialize() {
        let dir = tempdir().unwrap();
        let store = SqliteStore::new(make_config(&dir.path().join("uninit.db")));
        assert!(store.health_check().await.is_err());
        assert!(store.get_blast("x").await.is_err());
        // Shutdown without a database is a no-op.
        store.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn initialize_twice_returns_error() {
        let dir = tempdir().unwrap();
        let store = SqliteStore::new(make_config(&dir.path().join("twice.db")));
        store.initialize().await.unwrap();
        assert!(store.initialize().await.is_err());
        assert_eq!(store.health_check().await.unwrap(), HealthStatus::Healthy);
    }

    #[tokio::test]
    async fn progress_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("durable.db");

        {
            let store = SqliteStore::new(make_config(&path));
            store.initialize().await.unwrap();
            store
                .create_blast(&Blast {
                    id: "b-durable".to_string(),
                    status: BlastStatus::InProgress,
                    recipient_count: 2,
                    last_sent_index: 0,
                    text: "hello world".to_string(),
                    started_at: "2026-01-01T00:00:00.000Z".to_string(),
                    ended_at: None,
                })
                .await
                .unwrap();
            store
                .insert_recipients(&[
                    BlastRecipient {
                        blast_id: "b-durable".to_string(),
                        index: 0,
                        phone: "+1000".to_string(),
                    },
                    BlastRecipient {
                        blast_id: "b-durable".to_string(),
                        index: 1,
                        phone: "+2000".to_string(),
                    },
                ])
                .await
                .unwrap();
            assert!(store.claim_delivery("b-durable", 1, "+2000").await.unwrap());
            assert!(store.advance_cursor("b-durable", 0, 1).await.unwrap());
            store.close().await.unwrap();
        }

        let store = SqliteStore::new(make_config(&path));
        store.initialize().await.unwrap();
        let blast = store.get_blast("b-durable").await.unwrap().unwrap();
        assert_eq!(blast.last_sent_index, 1);
        assert_eq!(store.list_recipients("b-durable").await.unwrap().len(), 2);
        assert!(!store.claim_delivery("b-durable", 1, "+2000").await.unwrap());
        store.shutdown().await.unwrap();
    }
}
