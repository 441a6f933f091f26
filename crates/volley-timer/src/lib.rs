// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Timer gateways that call Volley back after a bounded wait.
//!
//! - [`HttpTimerGateway`] hands each wait to a managed delayed-webhook service.
//! - [`LocalTimerGateway`] sleeps on a tokio task and posts the callback
//!   itself. Pending waits do not survive a restart.

pub mod http;
pub mod local;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use volley_config::model::{SchedulerBackend, VolleyConfig};
use volley_core::{TimerGateway, VolleyError};

pub use http::HttpTimerGateway;
pub use local::LocalTimerGateway;

/// Build the gateway selected by `scheduler.backend`.
pub fn from_config(
    config: &VolleyConfig,
    cancel: CancellationToken,
) -> Result<Arc<dyn TimerGateway + Send + Sync>, VolleyError> {
    let callback_base_url = config.server.callback_base_url();
    match config.scheduler.backend {
        SchedulerBackend::Http => {
            let endpoint = config.scheduler.endpoint.clone().ok_or_else(|| {
                VolleyError::Config("scheduler.endpoint is required for the http backend".into())
            })?;
            Ok(Arc::new(HttpTimerGateway::new(
                endpoint,
                config.scheduler.api_token.as_deref(),
                callback_base_url,
            )?))
        }
        SchedulerBackend::Local => Ok(Arc::new(LocalTimerGateway::new(
            callback_base_url,
            cancel,
        )?)),
    }
}
