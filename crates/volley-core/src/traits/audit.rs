// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Audit sink trait for external delivery logs.

use async_trait::async_trait;

use crate::error::VolleyError;
use crate::traits::adapter::PluginAdapter;
use crate::types::DeliveryReport;

/// Adapter that records delivery reports outside the progress store.
#[async_trait]
pub trait AuditSink: PluginAdapter {
    async fn report(&self, report: &DeliveryReport) -> Result<(), VolleyError>;
}
