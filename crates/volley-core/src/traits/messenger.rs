// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Messenger trait for outbound text transports.

use async_trait::async_trait;

use crate::error::VolleyError;
use crate::traits::adapter::PluginAdapter;
use crate::types::SendReceipt;

/// Adapter that delivers a text message to a phone number.
#[async_trait]
pub trait Messenger: PluginAdapter {
    /// Sends `text` to `phone`. Not retried by callers.
    async fn send(&self, phone: &str, text: &str) -> Result<SendReceipt, VolleyError>;
}
