// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the blast engine.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the type of adapter wired into the service.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Store,
    Source,
    Timer,
    Messenger,
    Audit,
}

/// Lifecycle status of a blast.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BlastStatus {
    /// Continuations are still being scheduled.
    InProgress,
    /// Every recipient has been walked.
    Done,
    /// The chain was halted by an unrecoverable send error.
    Error,
}

impl BlastStatus {
    /// Returns true if no further continuation will run for this blast.
    pub fn is_terminal(self) -> bool {
        !matches!(self, BlastStatus::InProgress)
    }
}

/// A broadcast job walking a persisted recipient list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blast {
    pub id: String,
    pub status: BlastStatus,
    /// Recipients persisted for this blast (the text row is not counted).
    pub recipient_count: i64,
    /// Index of the last recipient that was sent to.
    pub last_sent_index: i64,
    /// The message body sent to every recipient.
    pub text: String,
    pub started_at: String,
    /// Set only on a terminal transition.
    pub ended_at: Option<String>,
}

/// A single recipient of a blast, addressed by `(blast_id, index)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlastRecipient {
    pub blast_id: String,
    pub index: i64,
    pub phone: String,
}

/// Outcome of a single delivery attempt.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    /// Claimed by a step, send not yet finished.
    Pending,
    Sent,
    Failed,
}

/// Durable record of one `(blast_id, index)` delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delivery {
    pub blast_id: String,
    pub index: i64,
    pub phone: String,
    pub status: DeliveryStatus,
    pub detail: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// A request for the external scheduler to call back after a bounded wait.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerRequest {
    /// Unique per request; the scheduler rejects duplicates.
    pub execution_name: String,
    /// Seconds to wait, never above the configured maximum single wait.
    pub wait_secs: u64,
    /// Path on this service to POST once the wait elapses.
    pub request_path: String,
}

/// What the transport answered for a successful send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendReceipt {
    pub status_code: u16,
    pub status_text: String,
}

impl SendReceipt {
    /// Receipt for a send that was logged instead of transmitted.
    pub fn dry_run() -> Self {
        Self {
            status_code: 200,
            status_text: "dry run".to_string(),
        }
    }
}

/// Delivery audit record handed to an [`AuditSink`](crate::AuditSink).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReport {
    pub from_phone: String,
    pub to_phone: String,
    pub text: String,
    pub status_code: String,
    pub status_text: String,
}

/// Current UTC time in the millisecond RFC 3339 form stored by Volley.
pub fn now_timestamp() -> String {
    chrono::Utc::now()
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
}
