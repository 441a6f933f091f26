// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Spreadsheet-backed collaborators: the blast row source and the delivery log.

pub mod audit;
pub mod source;

use std::sync::Arc;

use volley_config::VolleyConfig;
use volley_core::{AuditSink, RecipientSource, VolleyError};

pub use audit::{FormAuditSink, FormFields, TracingAuditSink};
pub use source::{CsvLocation, CsvRecipientSource};

/// Builds the recipient source named by `[source]`.
pub fn source_from_config(
    config: &VolleyConfig,
) -> Result<Arc<dyn RecipientSource + Send + Sync>, VolleyError> {
    let location = match (&config.source.csv_url, &config.source.csv_path) {
        (Some(url), None) => CsvLocation::Url(url.clone()),
        (None, Some(path)) => CsvLocation::File(path.into()),
        (Some(_), Some(_)) => {
            return Err(VolleyError::Config(
                "source.csv_url and source.csv_path are mutually exclusive".into(),
            ));
        }
        (None, None) => {
            return Err(VolleyError::Config(
                "one of source.csv_url or source.csv_path is required".into(),
            ));
        }
    };
    Ok(Arc::new(CsvRecipientSource::new(location)?))
}

/// Builds the audit sink named by `[audit]`, logging reports when no form is set.
pub fn audit_from_config(
    config: &VolleyConfig,
) -> Result<Arc<dyn AuditSink + Send + Sync>, VolleyError> {
    match &config.audit.form_url {
        Some(url) => Ok(Arc::new(FormAuditSink::new(
            url.clone(),
            FormFields::from(&config.audit),
        )?)),
        None => Ok(Arc::new(TracingAuditSink)),
    }
}
