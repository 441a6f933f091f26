// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock adapters for deterministic testing.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use tokio::sync::Mutex;

use volley_core::{
    AdapterType, AuditSink, DeliveryReport, HealthStatus, Messenger, PluginAdapter,
    RecipientSource, SendReceipt, TimerGateway, TimerRequest, VolleyError,
};

macro_rules! mock_adapter {
    ($ty:ty, $name:literal, $kind:expr) => {
        #[async_trait]
        impl PluginAdapter for $ty {
            fn name(&self) -> &str {
                $name
            }

            fn version(&self) -> semver::Version {
                semver::Version::new(0, 1, 0)
            }

            fn adapter_type(&self) -> AdapterType {
                $kind
            }

            async fn health_check(&self) -> Result<HealthStatus, VolleyError> {
                Ok(HealthStatus::Healthy)
            }

            async fn shutdown(&self) -> Result<(), VolleyError> {
                Ok(())
            }
        }
    };
}

/// A scripted transport failure.
#[derive(Debug, Clone, Copy)]
pub struct ScriptedFailure {
    pub status: u16,
    pub fatal: bool,
}

/// Messenger that records every send.
///
/// Phones registered with [`MockMessenger::fail_for`] get an error instead.
#[derive(Default)]
pub struct MockMessenger {
    sent: Mutex<Vec<(String, String)>>,
    failures: Mutex<HashMap<String, ScriptedFailure>>,
}

impl MockMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sends to `phone` fail with `status`.
    pub async fn fail_for(&self, phone: &str, status: u16, fatal: bool) {
        self.failures
            .lock()
            .await
            .insert(phone.to_string(), ScriptedFailure { status, fatal });
    }

    /// `(phone, text)` pairs in send order, failures excluded.
    pub async fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().await.clone()
    }

    pub async fn sent_phones(&self) -> Vec<String> {
        self.sent
            .lock()
            .await
            .iter()
            .map(|(phone, _)| phone.clone())
            .collect()
    }
}

mock_adapter!(MockMessenger, "mock-messenger", AdapterType::Messenger);

#[async_trait]
impl Messenger for MockMessenger {
    async fn send(&self, phone: &str, text: &str) -> Result<SendReceipt, VolleyError> {
        if let Some(failure) = self.failures.lock().await.get(phone).copied() {
            return Err(VolleyError::Messenger {
                message: format!("HTTP {} for {phone}", failure.status),
                status: Some(failure.status),
                fatal: failure.fatal,
                source: None,
            });
        }
        self.sent
            .lock()
            .await
            .push((phone.to_string(), text.to_string()));
        Ok(SendReceipt {
            status_code: 201,
            status_text: "Created".to_string(),
        })
    }
}

/// Timer that queues requests instead of waiting.
#[derive(Default)]
pub struct MockTimerGateway {
    pending: Mutex<VecDeque<TimerRequest>>,
    history: Mutex<Vec<TimerRequest>>,
    failing: Mutex<bool>,
}

impl MockTimerGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following `schedule` call fail.
    pub async fn set_failing(&self, failing: bool) {
        *self.failing.lock().await = failing;
    }

    /// Pop the oldest request that has not fired yet.
    pub async fn next_pending(&self) -> Option<TimerRequest> {
        self.pending.lock().await.pop_front()
    }

    pub async fn pending_count(&self) -> usize {
        self.pending.lock().await.len()
    }

    /// Every request ever scheduled, in order.
    pub async fn history(&self) -> Vec<TimerRequest> {
        self.history.lock().await.clone()
    }
}

mock_adapter!(MockTimerGateway, "mock-timer", AdapterType::Timer);

#[async_trait]
impl TimerGateway for MockTimerGateway {
    async fn schedule(&self, request: &TimerRequest) -> Result<(), VolleyError> {
        if *self.failing.lock().await {
            return Err(VolleyError::Scheduler {
                message: "mock scheduler unavailable".to_string(),
                source: None,
            });
        }
        self.pending.lock().await.push_back(request.clone());
        self.history.lock().await.push(request.clone());
        Ok(())
    }
}

/// Source that returns fixed rows.
#[derive(Default)]
pub struct MockRecipientSource {
    rows: Mutex<Vec<String>>,
}

impl MockRecipientSource {
    pub fn new<I, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rows: Mutex::new(rows.into_iter().map(Into::into).collect()),
        }
    }

    pub async fn set_rows(&self, rows: Vec<String>) {
        *self.rows.lock().await = rows;
    }
}

mock_adapter!(MockRecipientSource, "mock-source", AdapterType::Source);

#[async_trait]
impl RecipientSource for MockRecipientSource {
    async fn fetch_rows(&self) -> Result<Vec<String>, VolleyError> {
        Ok(self.rows.lock().await.clone())
    }
}

/// Audit sink that keeps every report.
#[derive(Default)]
pub struct MockAuditSink {
    reports: Mutex<Vec<DeliveryReport>>,
    failing: Mutex<bool>,
}

impl MockAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_failing(&self, failing: bool) {
        *self.failing.lock().await = failing;
    }

    pub async fn reports(&self) -> Vec<DeliveryReport> {
        self.reports.lock().await.clone()
    }
}

mock_adapter!(MockAuditSink, "mock-audit", AdapterType::Audit);

#[async_trait]
impl AuditSink for MockAuditSink {
    async fn report(&self, report: &DeliveryReport) -> Result<(), VolleyError> {
        self.reports.lock().await.push(report.clone());
        if *self.failing.lock().await {
            return Err(VolleyError::Audit {
                message: "mock audit endpoint down".to_string(),
                source: None,
            });
        }
        Ok(())
    }
}
