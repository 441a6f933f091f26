// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Managed delayed-webhook backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Serialize;
use tracing::debug;
use volley_core::{
    AdapterType, HealthStatus, PluginAdapter, TimerGateway, TimerRequest, VolleyError,
};

/// Body of one wait request.
#[derive(Debug, Serialize)]
struct WaitRequest<'a> {
    name: &'a str,
    wait_seconds: u64,
    request_path: &'a str,
    callback_url: String,
}

/// Posts each wait to an external scheduler that calls back when it elapses.
#[derive(Debug, Clone)]
pub struct HttpTimerGateway {
    client: reqwest::Client,
    endpoint: String,
    callback_base_url: String,
}

impl HttpTimerGateway {
    pub fn new(
        endpoint: String,
        api_token: Option<&str>,
        callback_base_url: String,
    ) -> Result<Self, VolleyError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = api_token {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {token}")).map_err(|e| {
                    VolleyError::Config(format!("invalid scheduler api token: {e}"))
                })?,
            );
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| VolleyError::Scheduler {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            endpoint,
            callback_base_url: callback_base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl PluginAdapter for HttpTimerGateway {
    fn name(&self) -> &str {
        "http-timer"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Timer
    }

    async fn health_check(&self) -> Result<HealthStatus, VolleyError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), VolleyError> {
        Ok(())
    }
}

#[async_trait]
impl TimerGateway for HttpTimerGateway {
    async fn schedule(&self, request: &TimerRequest) -> Result<(), VolleyError> {
        let body = WaitRequest {
            name: &request.execution_name,
            wait_seconds: request.wait_secs,
            request_path: &request.request_path,
            callback_url: format!("{}{}", self.callback_base_url, request.request_path),
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| VolleyError::Scheduler {
                message: format!("scheduler request failed: {e}"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        debug!(status = %status, execution = %request.execution_name, "scheduler responded");
        if status.is_success() {
            return Ok(());
        }

        let text = response.text().await.unwrap_or_default();
        Err(VolleyError::Scheduler {
            message: format!("scheduler returned {status}: {text}"),
            source: None,
        })
    }
}
