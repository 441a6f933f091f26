// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `volley start` command implementation.
//!
//! Starts a blast from the configured source, exactly as the HTTP trigger
//! would. Later steps arrive as callbacks on the running `volley serve`
//! instance at `server.public_url`.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;
use volley_config::{SchedulerBackend, VolleyConfig};
use volley_core::{BlastStatus, TimerGateway, VolleyError};
use volley_timer::LocalTimerGateway;

use crate::app::App;
use crate::serve::init_tracing;

pub async fn run_start(config: VolleyConfig) -> Result<(), VolleyError> {
    if let Err(errors) = volley_config::validate_for_start(&config) {
        volley_config::render_errors(&errors);
        return Err(VolleyError::Config(format!(
            "{} configuration error(s)",
            errors.len()
        )));
    }
    init_tracing(&config.service.log_level);

    // The local backend posts the first callback from this process, so it
    // must stay alive until that wait has fired.
    let local = match config.scheduler.backend {
        SchedulerBackend::Local => Some(Arc::new(LocalTimerGateway::new(
            config.server.callback_base_url(),
            CancellationToken::new(),
        )?)),
        SchedulerBackend::Http => None,
    };
    let timer: Arc<dyn TimerGateway + Send + Sync> = match &local {
        Some(local) => local.clone(),
        None => volley_timer::from_config(&config, CancellationToken::new())?,
    };

    let app = App::build(&config, timer).await?;
    let result = app.runner.start().await;

    if let Some(local) = &local {
        if local.pending() > 0 {
            info!(
                callback_base_url = %config.server.callback_base_url(),
                "waiting for the first continuation to be handed to the server"
            );
        }
        local.flush().await;
    }
    app.shutdown().await;

    let blast = result?;
    match blast.status {
        BlastStatus::InProgress => println!(
            "blast {} started: {} recipient(s), first send done",
            blast.id, blast.recipient_count
        ),
        status => println!("blast {} finished immediately: {status}", blast.id),
    }
    Ok(())
}
