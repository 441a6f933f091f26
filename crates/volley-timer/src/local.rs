// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-process timer backend for single-node deployments.

use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};
use volley_core::{
    AdapterType, HealthStatus, PluginAdapter, TimerGateway, TimerRequest, VolleyError,
};

/// Sleeps on a tokio task, then POSTs `callback_base_url + request_path`.
pub struct LocalTimerGateway {
    client: reqwest::Client,
    callback_base_url: String,
    cancel: CancellationToken,
    tasks: TaskTracker,
}

impl LocalTimerGateway {
    pub fn new(callback_base_url: String, cancel: CancellationToken) -> Result<Self, VolleyError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| VolleyError::Scheduler {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(Self {
            client,
            callback_base_url: callback_base_url.trim_end_matches('/').to_string(),
            cancel,
            tasks: TaskTracker::new(),
        })
    }

    /// Waits that have not fired yet.
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Wait until every scheduled callback has been posted.
    ///
    /// Used by one-shot commands that must outlive their first wait.
    pub async fn flush(&self) {
        self.tasks.close();
        self.tasks.wait().await;
        self.tasks.reopen();
    }
}

#[async_trait]
impl PluginAdapter for LocalTimerGateway {
    fn name(&self) -> &str {
        "local-timer"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Timer
    }

    async fn health_check(&self) -> Result<HealthStatus, VolleyError> {
        if self.cancel.is_cancelled() {
            return Ok(HealthStatus::Unhealthy("shutting down".to_string()));
        }
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), VolleyError> {
        let dropped = self.tasks.len();
        self.cancel.cancel();
        self.tasks.close();
        self.tasks.wait().await;
        if dropped > 0 {
            warn!(dropped, "local timer stopped with pending waits");
        }
        Ok(())
    }
}

#[async_trait]
impl TimerGateway for LocalTimerGateway {
    async fn schedule(&self, request: &TimerRequest) -> Result<(), VolleyError> {
        if self.cancel.is_cancelled() {
            return Err(VolleyError::Scheduler {
                message: "local timer is shut down".to_string(),
                source: None,
            });
        }

        let client = self.client.clone();
        let cancel = self.cancel.clone();
        let url = format!("{}{}", self.callback_base_url, request.request_path);
        let execution = request.execution_name.clone();
        let wait = Duration::from_secs(request.wait_secs);

        self.tasks.spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!(%execution, "wait cancelled");
                    return;
                }
                _ = tokio::time::sleep(wait) => {}
            }

            match client.post(&url).send().await {
                Ok(response) if response.status().is_success() => {
                    info!(%execution, "callback delivered");
                }
                Ok(response) => {
                    warn!(%execution, status = %response.status(), "callback rejected");
                }
                Err(e) => {
                    warn!(%execution, error = %e, "callback failed");
                }
            }
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request(wait_secs: u64) -> TimerRequest {
        TimerRequest {
            execution_name: "exec-local".to_string(),
            wait_secs,
            request_path: "/timeout/abc".to_string(),
        }
    }

    async fn wait_for_requests(server: &MockServer, count: usize) {
        for _ in 0..100 {
            if server.received_requests().await.unwrap_or_default().len() >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("callback never arrived");
    }

    #[tokio::test]
    async fn fires_callback_after_wait() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/timeout/abc"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = LocalTimerGateway::new(server.uri(), CancellationToken::new()).unwrap();
        gateway.schedule(&request(0)).await.unwrap();
        wait_for_requests(&server, 1).await;
    }

    #[tokio::test]
    async fn shutdown_cancels_pending_waits() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let gateway = LocalTimerGateway::new(server.uri(), CancellationToken::new()).unwrap();
        gateway.schedule(&request(3600)).await.unwrap();
        assert_eq!(gateway.pending(), 1);

        gateway.shutdown().await.unwrap();
        assert_eq!(gateway.pending(), 0);
        assert!(gateway.schedule(&request(1)).await.is_err());
        assert!(matches!(
            gateway.health_check().await.unwrap(),
            HealthStatus::Unhealthy(_)
        ));
    }

    #[tokio::test]
    async fn flush_waits_for_callbacks() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(2)
            .mount(&server)
            .await;

        let gateway = LocalTimerGateway::new(server.uri(), CancellationToken::new()).unwrap();
        gateway.schedule(&request(0)).await.unwrap();
        gateway.schedule(&request(1)).await.unwrap();
        gateway.flush().await;

        assert_eq!(gateway.pending(), 0);
        assert_eq!(server.received_requests().await.unwrap().len(), 2);
    }
}
