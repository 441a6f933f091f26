// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recipient list operations.

use rusqlite::params;
use volley_core::{BlastRecipient, VolleyError};

use crate::database::{Database, map_tr_err};

/// Insert every recipient in one transaction. Either all rows land or none do.
pub async fn insert_recipients(
    db: &Database,
    recipients: &[BlastRecipient],
) -> Result<(), VolleyError> {
    if recipients.is_empty() {
        return Ok(());
    }
    let recipients = recipients.to_vec();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO blast_recipients (blast_id, idx, phone) VALUES (?1, ?2, ?3)",
                )?;
                for r in &recipients {
                    stmt.execute(params![r.blast_id, r.index, r.phone])?;
                }
            }
            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// All recipients of a blast, ordered by index.
pub async fn list_recipients(
    db: &Database,
    blast_id: &str,
) -> Result<Vec<BlastRecipient>, VolleyError> {
    let blast_id = blast_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT blast_id, idx, phone FROM blast_recipients
                 WHERE blast_id = ?1 ORDER BY idx ASC",
            )?;
            let rows = stmt.query_map(params![blast_id], |row| {
                Ok(BlastRecipient {
                    blast_id: row.get(0)?,
                    index: row.get(1)?,
                    phone: row.get(2)?,
                })
            })?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}
