// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Blast row operations.

use std::str::FromStr;

use rusqlite::{OptionalExtension, params};
use volley_core::{Blast, BlastStatus, VolleyError};

use crate::database::{Database, map_tr_err};

const BLAST_COLUMNS: &str =
    "id, status, recipient_count, last_sent_index, text, started_at, ended_at";

fn row_to_blast(row: &rusqlite::Row<'_>) -> rusqlite::Result<Blast> {
    let status: String = row.get(1)?;
    let status = BlastStatus::from_str(&status).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(Blast {
        id: row.get(0)?,
        status,
        recipient_count: row.get(2)?,
        last_sent_index: row.get(3)?,
        text: row.get(4)?,
        started_at: row.get(5)?,
        ended_at: row.get(6)?,
    })
}

/// Insert a new blast.
pub async fn create_blast(db: &Database, blast: &Blast) -> Result<(), VolleyError> {
    let blast = blast.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO blasts (id, status, recipient_count, last_sent_index, text, started_at, ended_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    blast.id,
                    blast.status.to_string(),
                    blast.recipient_count,
                    blast.last_sent_index,
                    blast.text,
                    blast.started_at,
                    blast.ended_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Fetch a blast by id.
pub async fn get_blast(db: &Database, id: &str) -> Result<Option<Blast>, VolleyError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                &format!("SELECT {BLAST_COLUMNS} FROM blasts WHERE id = ?1"),
                params![id],
                row_to_blast,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// List blasts newest first, optionally filtered by status.
pub async fn list_blasts(
    db: &Database,
    status: Option<BlastStatus>,
) -> Result<Vec<Blast>, VolleyError> {
    let status = status.map(|s| s.to_string());
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {BLAST_COLUMNS} FROM blasts
                 WHERE ?1 IS NULL OR status = ?1
                 ORDER BY started_at DESC, id DESC"
            ))?;
            let rows = stmt.query_map(params![status], row_to_blast)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// Compare-and-set the cursor of an in-progress blast.
///
/// Returns `true` only if exactly one row moved from `expected` to `next`.
pub async fn advance_cursor(
    db: &Database,
    id: &str,
    expected: i64,
    next: i64,
) -> Result<bool, VolleyError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE blasts SET last_sent_index = ?3
                 WHERE id = ?1 AND last_sent_index = ?2 AND status = 'in_progress'",
                params![id, expected, next],
            )?;
            Ok(changed == 1)
        })
        .await
        .map_err(map_tr_err)
}

/// Move an in-progress blast to a terminal status.
///
/// Returns `false` if the blast is missing or already terminal, which keeps
/// `ended_at` stamped exactly once.
pub async fn finish_blast(
    db: &Database,
    id: &str,
    status: BlastStatus,
    ended_at: &str,
) -> Result<bool, VolleyError> {
    if !status.is_terminal() {
        return Err(VolleyError::Internal(format!(
            "finish_blast called with non-terminal status {status}"
        )));
    }
    let id = id.to_string();
    let status = status.to_string();
    let ended_at = ended_at.to_string();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE blasts SET status = ?2, ended_at = ?3
                 WHERE id = ?1 AND status = 'in_progress'",
                params![id, status, ended_at],
            )?;
            Ok(changed == 1)
        })
        .await
        .map_err(map_tr_err)
}
