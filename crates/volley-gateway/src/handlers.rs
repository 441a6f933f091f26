// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers.
//!
//! Engine errors never leak to callers: the scheduler and the trigger only
//! ever see a generic error body.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use tracing::{error, info};
use volley_core::HealthStatus;

use crate::server::GatewayState;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok`, `degraded` or `unhealthy`.
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub adapters: Vec<AdapterHealth>,
}

#[derive(Debug, Serialize)]
pub struct AdapterHealth {
    pub name: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// GET /
pub async fn hello_world() -> Json<serde_json::Value> {
    Json(json!({ "message": "hello world!" }))
}

/// GET|POST /blast/{webhook_token}
///
/// Starts a blast from the configured source. The first recipient is sent to
/// before the response is written.
pub async fn trigger_blast(
    State(state): State<GatewayState>,
    Path(webhook_token): Path<String>,
) -> Response {
    if !state.auth.verify(&webhook_token) {
        return error_response(StatusCode::UNAUTHORIZED, "incorrect token");
    }

    match state.handler.runner().start().await {
        Ok(blast) => {
            info!(blast_id = %blast.id, status = %blast.status, "blast triggered");
            Json(json!({ "blast_id": blast.id })).into_response()
        }
        Err(e) => {
            error!(error = %e, "failed to start blast");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "had an error")
        }
    }
}

/// POST /timeout/{*payload}
pub async fn timeout_callback(
    State(state): State<GatewayState>,
    Path(payload): Path<String>,
) -> Response {
    match state.handler.handle_encoded(&payload).await {
        Ok(outcome) => {
            tracing::debug!(?outcome, "continuation handled");
            Json(json!({})).into_response()
        }
        Err(e) => {
            error!(error = %e, "continuation failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "had an error")
        }
    }
}

/// GET /health
///
/// 200 while every adapter is healthy or degraded, 503 otherwise.
pub async fn get_health(State(state): State<GatewayState>) -> Response {
    let mut adapters = Vec::with_capacity(state.health.adapters.len());
    let mut worst = "ok";

    for adapter in &state.health.adapters {
        let (status, detail) = match adapter.health_check().await {
            Ok(HealthStatus::Healthy) => ("healthy", None),
            Ok(HealthStatus::Degraded(detail)) => ("degraded", Some(detail)),
            Ok(HealthStatus::Unhealthy(detail)) => ("unhealthy", Some(detail)),
            Err(e) => ("unhealthy", Some(e.to_string())),
        };
        match status {
            "unhealthy" => worst = "unhealthy",
            "degraded" if worst == "ok" => worst = "degraded",
            _ => {}
        }
        adapters.push(AdapterHealth {
            name: adapter.name().to_string(),
            status: status.to_string(),
            detail,
        });
    }

    let code = if worst == "unhealthy" {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };
    let body = HealthResponse {
        status: worst.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.health.start_time.elapsed().as_secs(),
        adapters,
    };
    (code, Json(body)).into_response()
}

/// Fallback for unknown routes.
pub async fn not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found!")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_response_serializes() {
        let resp = HealthResponse {
            status: "ok".to_string(),
            version: "0.1.0".to_string(),
            uptime_secs: 42,
            adapters: vec![AdapterHealth {
                name: "sqlite".to_string(),
                status: "healthy".to_string(),
                detail: None,
            }],
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"status\":\"ok\""));
        assert!(json.contains("\"uptime_secs\":42"));
        assert!(!json.contains("detail"));
    }

    #[tokio::test]
    async fn not_found_body() {
        let response = not_found().await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn hello_world_body() {
        let Json(body) = hello_world().await;
        assert_eq!(body["message"], "hello world!");
    }
}
