// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `volley status` command implementation.
//!
//! Reads blast progress straight from the database, so it works whether or
//! not the service is running.

use std::io::IsTerminal;

use serde::Serialize;
use volley_config::VolleyConfig;
use volley_core::{Blast, BlastStatus, BlastStore, Delivery, DeliveryStatus, VolleyError};
use volley_storage::SqliteStore;

/// Structured output for `--json` mode.
#[derive(Debug, Serialize)]
pub struct BlastReport {
    #[serde(flatten)]
    pub blast: Blast,
    pub sent: usize,
    pub failed: usize,
    pub deliveries: Vec<Delivery>,
}

impl BlastReport {
    pub fn new(blast: Blast, deliveries: Vec<Delivery>) -> Self {
        let count = |status: DeliveryStatus| deliveries.iter().filter(|d| d.status == status).count();
        let sent = count(DeliveryStatus::Sent);
        let failed = count(DeliveryStatus::Failed);
        Self {
            blast,
            sent,
            failed,
            deliveries,
        }
    }

    /// Recipients not yet walked.
    pub fn remaining(&self) -> i64 {
        if self.blast.recipient_count == 0 {
            return 0;
        }
        (self.blast.recipient_count - 1 - self.blast.last_sent_index).max(0)
    }
}

/// Run the `volley status` command.
pub async fn run_status(
    config: &VolleyConfig,
    blast_id: Option<&str>,
    json: bool,
    plain: bool,
) -> Result<(), VolleyError> {
    let store = SqliteStore::new(config.storage.clone());
    store.initialize().await?;
    let use_color = !plain && std::io::stdout().is_terminal();

    let result = match blast_id {
        Some(id) => show_blast(&store, id, json, use_color).await,
        None => list_blasts(&store, json, use_color).await,
    };
    store.close().await?;
    result
}

async fn show_blast(
    store: &SqliteStore,
    id: &str,
    json: bool,
    use_color: bool,
) -> Result<(), VolleyError> {
    let blast = store
        .get_blast(id)
        .await?
        .ok_or_else(|| VolleyError::Internal(format!("no blast with id {id}")))?;
    let deliveries = store.list_deliveries(id).await?;
    let report = BlastReport::new(blast, deliveries);

    if json {
        println!("{}", to_json(&report)?);
        return Ok(());
    }

    println!();
    println!("  blast {}", report.blast.id);
    println!("  {}", "-".repeat(45));
    println!("    State:      {}", status_label(report.blast.status, use_color));
    println!("    Started:    {}", report.blast.started_at);
    if let Some(ended) = &report.blast.ended_at {
        println!("    Ended:      {ended}");
    }
    println!(
        "    Progress:   {} sent, {} failed, {} remaining of {}",
        report.sent,
        report.failed,
        report.remaining(),
        report.blast.recipient_count
    );
    println!("    Text:       {}", preview(&report.blast.text));
    println!();
    for delivery in &report.deliveries {
        let detail = delivery.detail.as_deref().unwrap_or("");
        println!(
            "    #{:<5} {:<18} {:<8} {}",
            delivery.index, delivery.phone, delivery.status, detail
        );
    }
    println!();
    Ok(())
}

async fn list_blasts(store: &SqliteStore, json: bool, use_color: bool) -> Result<(), VolleyError> {
    let blasts = store.list_blasts(None).await?;
    if json {
        println!("{}", to_json(&blasts)?);
        return Ok(());
    }

    println!();
    println!("  volley blasts");
    println!("  {}", "-".repeat(45));
    if blasts.is_empty() {
        println!("    (none)");
    }
    for blast in &blasts {
        println!(
            "    {}  {}  {}/{}  {}",
            blast.id,
            status_label(blast.status, use_color),
            (blast.last_sent_index + 1).min(blast.recipient_count),
            blast.recipient_count,
            blast.started_at
        );
    }
    println!();
    Ok(())
}

fn to_json<T: Serialize>(value: &T) -> Result<String, VolleyError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| VolleyError::Internal(format!("failed to serialize status: {e}")))
}

fn status_label(status: BlastStatus, use_color: bool) -> String {
    if !use_color {
        return status.to_string();
    }
    use colored::Colorize;
    match status {
        BlastStatus::InProgress => status.to_string().yellow().to_string(),
        BlastStatus::Done => status.to_string().green().to_string(),
        BlastStatus::Error => status.to_string().red().to_string(),
    }
}

/// First line of the text, cut at 60 characters.
fn preview(text: &str) -> String {
    let line = text.lines().next().unwrap_or("");
    let mut out: String = line.chars().take(60).collect();
    if out.len() < text.len() {
        out.push_str("...");
    }
    out
}
