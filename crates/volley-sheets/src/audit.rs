// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delivery audit sinks.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};
use volley_config::model::AuditConfig;
use volley_core::{AdapterType, AuditSink, DeliveryReport, HealthStatus, PluginAdapter, VolleyError};

/// Form field names for each part of a [`DeliveryReport`].
#[derive(Debug, Clone)]
pub struct FormFields {
    pub from: String,
    pub to: String,
    pub text: String,
    pub status_code: String,
    pub status_text: String,
}

impl From<&AuditConfig> for FormFields {
    fn from(config: &AuditConfig) -> Self {
        Self {
            from: config.from_field.clone(),
            to: config.to_field.clone(),
            text: config.text_field.clone(),
            status_code: config.status_code_field.clone(),
            status_text: config.status_text_field.clone(),
        }
    }
}

impl Default for FormFields {
    fn default() -> Self {
        Self::from(&AuditConfig::default())
    }
}

/// Posts each report as `application/x-www-form-urlencoded` to a form endpoint.
pub struct FormAuditSink {
    client: reqwest::Client,
    url: String,
    fields: FormFields,
}

impl FormAuditSink {
    pub fn new(url: String, fields: FormFields) -> Result<Self, VolleyError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| VolleyError::Audit {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(Self { client, url, fields })
    }
}

#[async_trait]
impl PluginAdapter for FormAuditSink {
    fn name(&self) -> &str {
        "form-audit"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Audit
    }

    async fn health_check(&self) -> Result<HealthStatus, VolleyError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), VolleyError> {
        Ok(())
    }
}

#[async_trait]
impl AuditSink for FormAuditSink {
    async fn report(&self, report: &DeliveryReport) -> Result<(), VolleyError> {
        let form = [
            (self.fields.from.as_str(), report.from_phone.as_str()),
            (self.fields.to.as_str(), report.to_phone.as_str()),
            (self.fields.text.as_str(), report.text.as_str()),
            (self.fields.status_code.as_str(), report.status_code.as_str()),
            (self.fields.status_text.as_str(), report.status_text.as_str()),
        ];

        let response = self
            .client
            .post(&self.url)
            .form(&form)
            .send()
            .await
            .map_err(|e| VolleyError::Audit {
                message: format!("failed to post delivery report: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(%status, to = %report.to_phone, "delivery report posted");
        if !status.is_success() {
            return Err(VolleyError::Audit {
                message: format!("form endpoint returned {status}"),
                source: None,
            });
        }
        Ok(())
    }
}

/// Writes reports to the log.
pub struct TracingAuditSink;

#[async_trait]
impl PluginAdapter for TracingAuditSink {
    fn name(&self) -> &str {
        "tracing-audit"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Audit
    }

    async fn health_check(&self) -> Result<HealthStatus, VolleyError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), VolleyError> {
        Ok(())
    }
}

#[async_trait]
impl AuditSink for TracingAuditSink {
    async fn report(&self, report: &DeliveryReport) -> Result<(), VolleyError> {
        info!(
            from = %report.from_phone,
            to = %report.to_phone,
            status_code = %report.status_code,
            status_text = %report.status_text,
            "delivery"
        );
        Ok(())
    }
}
