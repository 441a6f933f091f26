// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recipient source trait for the raw rows a blast starts from.

use async_trait::async_trait;

use crate::error::VolleyError;
use crate::traits::adapter::PluginAdapter;

/// Adapter yielding the ordered raw items of a new blast.
///
/// Item 0 is the message text; items `1..` are recipient phone numbers.
#[async_trait]
pub trait RecipientSource: PluginAdapter {
    /// Fetches the current raw item list.
    async fn fetch_rows(&self) -> Result<Vec<String>, VolleyError>;
}
