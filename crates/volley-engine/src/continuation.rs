// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Entry point for scheduler callbacks.

use std::sync::Arc;

use tracing::{info, warn};
use volley_core::{TimerRequest, VolleyError};

use crate::blast::{BlastRunner, StepOutcome};
use crate::payload::{self, Continuation, Params};

/// What handling one callback did.
#[derive(Debug, Clone, PartialEq)]
pub enum ContinuationOutcome {
    /// The delay was not over yet; another wait was scheduled.
    Rescheduled(TimerRequest),
    /// A blast step ran.
    Stepped(StepOutcome),
    /// The payload asked for nothing this service does.
    Ignored(String),
}

/// Routes decoded callback payloads to the dispatcher or the blast runner.
#[derive(Clone)]
pub struct ContinuationHandler {
    runner: Arc<BlastRunner>,
}

impl ContinuationHandler {
    pub fn new(runner: Arc<BlastRunner>) -> Self {
        Self { runner }
    }

    pub fn runner(&self) -> &Arc<BlastRunner> {
        &self.runner
    }

    /// Decode the path segment of a callback and handle it.
    pub async fn handle_encoded(&self, encoded: &str) -> Result<ContinuationOutcome, VolleyError> {
        let params = payload::decode(encoded)?;
        self.handle(params).await
    }

    pub async fn handle(&self, params: Params) -> Result<ContinuationOutcome, VolleyError> {
        match Continuation::classify(params) {
            Continuation::Wait {
                params,
                remaining_secs,
            } => {
                info!(remaining_secs, "delay not elapsed, waiting again");
                let request = self
                    .runner
                    .dispatcher()
                    .dispatch(params, remaining_secs)
                    .await?;
                Ok(ContinuationOutcome::Rescheduled(request))
            }
            Continuation::IterateBlast { blast_id, index } => {
                let outcome = self.runner.iterate(&blast_id, index).await?;
                Ok(ContinuationOutcome::Stepped(outcome))
            }
            Continuation::Ignore { reason } => {
                warn!(%reason, "continuation ignored");
                Ok(ContinuationOutcome::Ignored(reason))
            }
        }
    }
}
