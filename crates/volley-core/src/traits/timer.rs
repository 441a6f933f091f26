// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Timer gateway trait for the external scheduling primitive.

use async_trait::async_trait;

use crate::error::VolleyError;
use crate::traits::adapter::PluginAdapter;
use crate::types::TimerRequest;

/// Adapter for a scheduler that calls the service back after a bounded wait.
///
/// Delivery is at-least-once: a request may produce more than one callback,
/// and callbacks of different requests are not ordered.
#[async_trait]
pub trait TimerGateway: PluginAdapter {
    /// Requests one callback to `request.request_path` after `request.wait_secs`.
    async fn schedule(&self, request: &TimerRequest) -> Result<(), VolleyError>;
}
