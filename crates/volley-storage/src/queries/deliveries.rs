// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delivery claims and outcomes.
//!
//! A claim is an insert into a table keyed by `(blast_id, idx)`. The insert
//! either creates the row or is ignored, so two continuations carrying the same
//! step agree on which of them sends.

use std::str::FromStr;

use rusqlite::params;
use volley_core::{Delivery, DeliveryStatus, VolleyError};

use crate::database::{Database, map_tr_err};

/// Claim a delivery slot. Returns `false` if it was already claimed.
pub async fn claim_delivery(
    db: &Database,
    blast_id: &str,
    index: i64,
    phone: &str,
) -> Result<bool, VolleyError> {
    let blast_id = blast_id.to_string();
    let phone = phone.to_string();
    db.connection()
        .call(move |conn| {
            let inserted = conn.execute(
                "INSERT OR IGNORE INTO deliveries (blast_id, idx, phone) VALUES (?1, ?2, ?3)",
                params![blast_id, index, phone],
            )?;
            Ok(inserted == 1)
        })
        .await
        .map_err(map_tr_err)
}

/// Record the outcome of a claimed delivery.
pub async fn complete_delivery(
    db: &Database,
    blast_id: &str,
    index: i64,
    status: DeliveryStatus,
    detail: Option<&str>,
) -> Result<(), VolleyError> {
    let blast_id = blast_id.to_string();
    let status = status.to_string();
    let detail = detail.map(str::to_string);
    let updated = db
        .connection()
        .call(move |conn| {
            conn.execute(
                "UPDATE deliveries SET status = ?3, detail = ?4,
                 updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE blast_id = ?1 AND idx = ?2",
                params![blast_id, index, status, detail],
            )
        })
        .await
        .map_err(map_tr_err)?;
    if updated == 0 {
        return Err(VolleyError::Internal(format!(
            "no claimed delivery at index {index}"
        )));
    }
    Ok(())
}

/// Delivery records of a blast ordered by index.
pub async fn list_deliveries(db: &Database, blast_id: &str) -> Result<Vec<Delivery>, VolleyError> {
    let blast_id = blast_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT blast_id, idx, phone, status, detail, created_at, updated_at
                 FROM deliveries WHERE blast_id = ?1 ORDER BY idx ASC",
            )?;
            let rows = stmt.query_map(params![blast_id], |row| {
                let status: String = row.get(3)?;
                let status = DeliveryStatus::from_str(&status).map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        3,
                        rusqlite::types::Type::Text,
                        Box::new(e),
                    )
                })?;
                Ok(Delivery {
                    blast_id: row.get(0)?,
                    index: row.get(1)?,
                    phone: row.get(2)?,
                    status,
                    detail: row.get(4)?,
                    created_at: row.get(5)?,
                    updated_at: row.get(6)?,
                })
            })?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::blasts::create_blast;
    use tempfile::tempdir;
    use volley_core::{Blast, BlastStatus};

    async fn db_with_blast() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("d.db").to_str().unwrap())
            .await
            .unwrap();
        create_blast(
            &db,
            &Blast {
                id: "b".to_string(),
                status: BlastStatus::InProgress,
                recipient_count: 2,
                last_sent_index: 0,
                text: "hi".to_string(),
                started_at: "2026-01-01T00:00:00.000Z".to_string(),
                ended_at: None,
            },
        )
        .await
        .unwrap();
        (db, dir)
    }

    #[tokio::test]
    async fn second_claim_of_a_slot_loses() {
        let (db, _dir) = db_with_blast().await;
        assert!(claim_delivery(&db, "b", 1, "+2000").await.unwrap());
        assert!(!claim_delivery(&db, "b", 1, "+2000").await.unwrap());
        assert!(claim_delivery(&db, "b", 0, "+1000").await.unwrap());
    }

    #[tokio::test]
    async fn claim_starts_pending_and_completes() {
        let (db, _dir) = db_with_blast().await;
        claim_delivery(&db, "b", 0, "+1000").await.unwrap();
        claim_delivery(&db, "b", 1, "+2000").await.unwrap();

        let pending = list_deliveries(&db, "b").await.unwrap();
        assert!(pending.iter().all(|d| d.status == DeliveryStatus::Pending));

        complete_delivery(&db, "b", 0, DeliveryStatus::Sent, None)
            .await
            .unwrap();
        complete_delivery(&db, "b", 1, DeliveryStatus::Failed, Some("HTTP 502"))
            .await
            .unwrap();

        let done = list_deliveries(&db, "b").await.unwrap();
        assert_eq!(done[0].status, DeliveryStatus::Sent);
        assert_eq!(done[0].phone, "+1000");
        assert_eq!(done[1].status, DeliveryStatus::Failed);
        assert_eq!(done[1].detail.as_deref(), Some("HTTP 502"));
    }

    #[tokio::test]
    async fn completing_an_unclaimed_slot_is_an_error() {
        let (db, _dir) = db_with_blast().await;
        let result = complete_delivery(&db, "b", 7, DeliveryStatus::Sent, None).await;
        assert!(matches!(result, Err(VolleyError::Internal(_))));
    }
}
