// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `volley serve` command implementation.
//!
//! Wires storage, transport, source, audit and the configured timer backend
//! into the HTTP surface, then serves until SIGINT/SIGTERM.

use tracing::info;
use volley_config::VolleyConfig;
use volley_core::VolleyError;
use volley_engine::ContinuationHandler;
use volley_gateway::{AuthConfig, GatewayState, HealthState};

use crate::app::App;
use crate::shutdown;

pub async fn run_serve(config: VolleyConfig) -> Result<(), VolleyError> {
    let mut errors = Vec::new();
    for check in [volley_config::validate_for_serve, volley_config::validate_for_start] {
        if let Err(mut e) = check(&config) {
            errors.append(&mut e);
        }
    }
    if !errors.is_empty() {
        volley_config::render_errors(&errors);
        return Err(VolleyError::Config(format!(
            "{} configuration error(s)",
            errors.len()
        )));
    }

    init_tracing(&config.service.log_level);
    info!(
        service = %config.service.name,
        env = %config.service.env_name,
        backend = ?config.scheduler.backend,
        "starting volley serve"
    );

    let cancel = shutdown::install_signal_handler();
    let timer = volley_timer::from_config(&config, cancel.child_token())?;
    let app = App::build(&config, timer).await?;

    let state = GatewayState {
        handler: ContinuationHandler::new(app.runner.clone()),
        auth: AuthConfig::new(config.server.webhook_token.clone()),
        health: HealthState::new(app.adapters()),
    };

    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!(callback_base_url = %config.server.callback_base_url(), "callbacks will target this service");
    let served = volley_gateway::start_server(&addr, state, cancel.clone()).await;

    app.shutdown().await;
    info!("volley stopped");
    served
}

/// Initialize the tracing subscriber. `RUST_LOG` overrides the configured level.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("volley={log_level},warn")));

    // A second init (e.g. in tests) is ignored.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .try_init();
}
