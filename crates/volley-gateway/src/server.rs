// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Router, shared state and listener.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Router,
    routing::{get, post},
};
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use volley_core::{PluginAdapter, VolleyError};
use volley_engine::ContinuationHandler;

use crate::auth::AuthConfig;
use crate::handlers;

/// Inputs of the `/health` endpoint.
#[derive(Clone)]
pub struct HealthState {
    /// Process start time for uptime calculation.
    pub start_time: Instant,
    /// Adapters whose health checks are reported.
    pub adapters: Vec<Arc<dyn PluginAdapter>>,
}

impl HealthState {
    pub fn new(adapters: Vec<Arc<dyn PluginAdapter>>) -> Self {
        Self {
            start_time: Instant::now(),
            adapters,
        }
    }
}

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub handler: ContinuationHandler,
    pub auth: AuthConfig,
    pub health: HealthState,
}

/// Build the service router.
///
/// - `GET /` liveness greeting
/// - `GET|POST /blast/{webhook_token}` starts a blast
/// - `POST /timeout/{*payload}` scheduler callback
/// - `GET /health` adapter health
pub fn build_router(state: GatewayState) -> Router {
    Router::new()
        .route("/", get(handlers::hello_world))
        .route(
            "/blast/{webhook_token}",
            get(handlers::trigger_blast).post(handlers::trigger_blast),
        )
        .route("/timeout/{*payload}", post(handlers::timeout_callback))
        .route("/health", get(handlers::get_health))
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Bind `addr` and serve until `shutdown` is cancelled.
pub async fn start_server(
    addr: &str,
    state: GatewayState,
    shutdown: CancellationToken,
) -> Result<(), VolleyError> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| VolleyError::Internal(format!("failed to bind {addr}: {e}")))?;
    serve_listener(listener, state, shutdown).await
}

/// Serve on an already bound listener until `shutdown` is cancelled.
pub async fn serve_listener(
    listener: tokio::net::TcpListener,
    state: GatewayState,
    shutdown: CancellationToken,
) -> Result<(), VolleyError> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("listening on {addr}");
    }

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| VolleyError::Internal(format!("server error: {e}")))?;

    tracing::info!("server stopped");
    Ok(())
}
