// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WhatsApp messenger backed by the Wassenger HTTP API.
//!
//! Long texts are split with the engine's message splitter and sent as one
//! request per chunk. Rejected credentials (401/403) are reported as fatal so
//! the running blast halts instead of failing every remaining recipient.

pub mod phone;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Serialize;
use tracing::{debug, info, warn};
use volley_config::model::MessagingConfig;
use volley_core::{
    AdapterType, HealthStatus, Messenger, PluginAdapter, SendReceipt, VolleyError,
};
use volley_engine::split_message;

pub use phone::clean_phone;

#[derive(Debug, Serialize)]
struct OutgoingMessage<'a> {
    device: &'a str,
    phone: &'a str,
    message: &'a str,
}

/// Wassenger messenger adapter.
pub struct WassengerMessenger {
    client: reqwest::Client,
    config: MessagingConfig,
}

impl WassengerMessenger {
    /// Creates the adapter. `messaging.api_key` is required unless `dry_run` is set.
    pub fn new(config: MessagingConfig) -> Result<Self, VolleyError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        match config.api_key.as_deref() {
            Some(key) if !key.is_empty() => {
                headers.insert(
                    "token",
                    HeaderValue::from_str(key).map_err(|e| {
                        VolleyError::Config(format!("invalid messaging.api_key header value: {e}"))
                    })?,
                );
            }
            _ if config.dry_run => {}
            _ => {
                return Err(VolleyError::Config(
                    "messaging.api_key is required unless messaging.dry_run is set".into(),
                ));
            }
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| VolleyError::Messenger {
                message: format!("failed to build HTTP client: {e}"),
                status: None,
                fatal: true,
                source: Some(Box::new(e)),
            })?;

        Ok(Self { client, config })
    }

    async fn post_chunk(&self, phone: &str, chunk: &str) -> Result<SendReceipt, VolleyError> {
        let body = OutgoingMessage {
            device: &self.config.device,
            phone,
            message: chunk,
        };
        let response = self
            .client
            .post(&self.config.api_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| VolleyError::Messenger {
                message: format!("HTTP request failed: {e}"),
                status: None,
                fatal: false,
                source: Some(Box::new(e)),
            })?;

        let status = response.status();
        let status_text = status.canonical_reason().unwrap_or_default().to_string();
        if status.is_success() {
            return Ok(SendReceipt {
                status_code: status.as_u16(),
                status_text,
            });
        }

        let body = response.text().await.unwrap_or_default();
        warn!(status = %status, body = %body, "message rejected");
        Err(VolleyError::Messenger {
            message: format!("messaging API returned {status}: {body}"),
            status: Some(status.as_u16()),
            fatal: is_fatal_status(status),
            source: None,
        })
    }
}

/// Statuses that will repeat for every recipient.
fn is_fatal_status(status: StatusCode) -> bool {
    matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
}

#[async_trait]
impl PluginAdapter for WassengerMessenger {
    fn name(&self) -> &str {
        "wassenger"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Messenger
    }

    async fn health_check(&self) -> Result<HealthStatus, VolleyError> {
        if self.config.dry_run {
            return Ok(HealthStatus::Degraded("dry run: messages are not sent".into()));
        }
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), VolleyError> {
        Ok(())
    }
}

#[async_trait]
impl Messenger for WassengerMessenger {
    async fn send(&self, phone: &str, text: &str) -> Result<SendReceipt, VolleyError> {
        let phone = clean_phone(phone).ok_or_else(|| VolleyError::Messenger {
            message: format!("invalid phone number {phone:?}"),
            status: None,
            fatal: false,
            source: None,
        })?;

        let chunks = split_message(text, self.config.max_message_len);
        if self.config.dry_run {
            info!(%phone, chunks = chunks.len(), "dry run, message not sent");
            return Ok(SendReceipt::dry_run());
        }

        let mut last = None;
        for (i, chunk) in chunks.iter().enumerate() {
            debug!(%phone, chunk = i, len = chunk.len(), "sending chunk");
            last = Some(self.post_chunk(&phone, chunk).await?);
        }
        last.ok_or_else(|| VolleyError::Internal("splitter returned no chunks".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(api_url: String) -> MessagingConfig {
        MessagingConfig {
            api_url,
            api_key: Some("wa-key".to_string()),
            device: "device-1".to_string(),
            max_message_len: 6000,
            dry_run: false,
        }
    }

    #[test]
    fn new_requires_api_key() {
        let mut cfg = config("http://localhost".to_string());
        cfg.api_key = None;
        assert!(matches!(
            WassengerMessenger::new(cfg.clone()),
            Err(VolleyError::Config(_))
        ));

        cfg.dry_run = true;
        assert!(WassengerMessenger::new(cfg).is_ok());
    }

    #[tokio::test]
    async fn sends_json_with_token_header() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/messages"))
            .and(header("Token", "wa-key"))
            .and(body_json(serde_json::json!({
                "device": "device-1",
                "phone": "+972501234567",
                "message": "hello world"
            })))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let messenger =
            WassengerMessenger::new(config(format!("{}/v1/messages", server.uri()))).unwrap();
        let receipt = messenger.send("972-50-1234567", "hello world").await.unwrap();
        assert_eq!(receipt.status_code, 201);
        assert_eq!(receipt.status_text, "Created");
    }

    #[tokio::test]
    async fn long_text_is_sent_in_chunks() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(2)
            .mount(&server)
            .await;

        let mut cfg = config(server.uri());
        cfg.max_message_len = 16;
        let messenger = WassengerMessenger::new(cfg).unwrap();
        messenger
            .send("+1000", "first line here\nsecond line here")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn unauthorized_is_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad token"))
            .mount(&server)
            .await;

        let messenger = WassengerMessenger::new(config(server.uri())).unwrap();
        let err = messenger.send("+1000", "hi").await.unwrap_err();
        assert!(err.is_fatal());
        assert!(matches!(
            err,
            VolleyError::Messenger {
                status: Some(401),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn server_error_is_not_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let messenger = WassengerMessenger::new(config(server.uri())).unwrap();
        let err = messenger.send("+1000", "hi").await.unwrap_err();
        assert!(!err.is_fatal());
    }

    #[tokio::test]
    async fn dry_run_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut cfg = config(server.uri());
        cfg.dry_run = true;
        let messenger = WassengerMessenger::new(cfg).unwrap();
        let receipt = messenger.send("+1000", "hi").await.unwrap();
        assert_eq!(receipt, SendReceipt::dry_run());
        assert!(matches!(
            messenger.health_check().await.unwrap(),
            HealthStatus::Degraded(_)
        ));
    }

    #[tokio::test]
    async fn blank_phone_is_rejected_without_a_request() {
        let messenger = WassengerMessenger::new(config("http://127.0.0.1:9".to_string())).unwrap();
        let err = messenger.send("  ", "hi").await.unwrap_err();
        assert!(!err.is_fatal());
    }
}
