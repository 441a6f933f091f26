// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! CSV recipient source.
//!
//! The first column of every row is one blast row: row 0 holds the message
//! text, the rest hold phone numbers. The phone list ends at the first row
//! whose first cell is blank. No header row is assumed.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;
use volley_core::{AdapterType, HealthStatus, PluginAdapter, RecipientSource, VolleyError};

/// Where the CSV export lives.
#[derive(Debug, Clone)]
pub enum CsvLocation {
    /// Fetched with a GET on every blast start (e.g. a published sheet export).
    Url(String),
    File(PathBuf),
}

pub struct CsvRecipientSource {
    location: CsvLocation,
    client: reqwest::Client,
}

impl CsvRecipientSource {
    pub fn new(location: CsvLocation) -> Result<Self, VolleyError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| source_err("failed to build HTTP client", e))?;
        Ok(Self { location, client })
    }

    async fn read_raw(&self) -> Result<String, VolleyError> {
        match &self.location {
            CsvLocation::Url(url) => {
                let response = self
                    .client
                    .get(url)
                    .send()
                    .await
                    .map_err(|e| source_err("failed to fetch CSV export", e))?;
                let status = response.status();
                if !status.is_success() {
                    return Err(VolleyError::Source {
                        message: format!("CSV export returned {status}"),
                        source: None,
                    });
                }
                response
                    .text()
                    .await
                    .map_err(|e| source_err("failed to read CSV export body", e))
            }
            CsvLocation::File(path) => tokio::fs::read_to_string(path)
                .await
                .map_err(|e| source_err(&format!("failed to read {}", path.display()), e)),
        }
    }
}

/// First cell of every record up to the first blank one.
///
/// A blank first row is an error: it would otherwise turn the first phone
/// number into the message text.
pub fn first_column(raw: &str) -> Result<Vec<String>, VolleyError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(raw.as_bytes());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| source_err("malformed CSV", e))?;
        let cell = record.get(0).map(str::trim).unwrap_or_default();
        if cell.is_empty() {
            if rows.is_empty() {
                return Err(VolleyError::Source {
                    message: "first row is blank; it must hold the message text".to_string(),
                    source: None,
                });
            }
            break;
        }
        rows.push(cell.to_string());
    }
    Ok(rows)
}

fn source_err(
    message: &str,
    e: impl std::error::Error + Send + Sync + 'static,
) -> VolleyError {
    VolleyError::Source {
        message: format!("{message}: {e}"),
        source: Some(Box::new(e)),
    }
}

#[async_trait]
impl PluginAdapter for CsvRecipientSource {
    fn name(&self) -> &str {
        "csv-source"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Source
    }

    async fn health_check(&self) -> Result<HealthStatus, VolleyError> {
        match &self.location {
            CsvLocation::File(path) if !path.exists() => Ok(HealthStatus::Unhealthy(format!(
                "{} does not exist",
                path.display()
            ))),
            _ => Ok(HealthStatus::Healthy),
        }
    }

    async fn shutdown(&self) -> Result<(), VolleyError> {
        Ok(())
    }
}

#[async_trait]
impl RecipientSource for CsvRecipientSource {
    async fn fetch_rows(&self) -> Result<Vec<String>, VolleyError> {
        let raw = self.read_raw().await?;
        let rows = first_column(&raw)?;
        debug!(rows = rows.len(), "fetched blast rows");
        Ok(rows)
    }
}
