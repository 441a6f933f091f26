// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Blast state machine.
//!
//! A blast is started once and then advanced one recipient per continuation.
//! All state lives in the [`BlastStore`]; a [`BlastRunner`] holds only its
//! collaborators and can be rebuilt for every request.
//!
//! Every continuation names the index it was scheduled for, every send is
//! preceded by a claim on the `(blast_id, index)` delivery slot, and the
//! cursor only moves through a compare-and-set. A replayed continuation is
//! either behind the cursor or loses the compare-and-set, so it never sends
//! twice and never forks the chain.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, error, info, warn};
use volley_config::model::BlastConfig;
use volley_core::types::now_timestamp;
use volley_core::{
    AuditSink, Blast, BlastRecipient, BlastStatus, BlastStore, DeliveryReport, DeliveryStatus,
    Messenger, RecipientSource, VolleyError,
};

use crate::dispatch::TimeoutDispatcher;
use crate::payload::iterate_blast_params;

/// Result of sending to one recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Sent,
    /// The transport refused the message. `fatal` halts the blast.
    Failed { fatal: bool, detail: String },
    /// Another step already claimed this slot; nothing was sent.
    AlreadyClaimed,
}

/// What a single [`BlastRunner::iterate`] call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// No blast with this id.
    Missing,
    /// The blast was already done or halted.
    Terminal(BlastStatus),
    /// Every recipient has been walked; the blast is now done.
    Finished,
    /// Sent (or attempted) to `index` and scheduled the next step.
    Advanced { index: i64, delivered: bool },
    /// A replayed continuation, or the slot at `index` was claimed by a
    /// step that is still moving the chain. Nothing was sent or scheduled.
    Duplicate { index: i64 },
    /// The slot at `index` was claimed by a step that never moved the
    /// cursor; the cursor was moved and the next step scheduled.
    Resumed { index: i64 },
    /// The cursor moved under us after sending to `index`.
    CursorConflict { index: i64 },
    /// A fatal send error at `index` moved the blast to `error`.
    Halted { index: i64 },
}

/// Runs blasts against the configured collaborators.
pub struct BlastRunner {
    store: Arc<dyn BlastStore + Send + Sync>,
    source: Arc<dyn RecipientSource + Send + Sync>,
    messenger: Arc<dyn Messenger + Send + Sync>,
    audit: Arc<dyn AuditSink + Send + Sync>,
    dispatcher: Arc<TimeoutDispatcher>,
    config: BlastConfig,
}

impl BlastRunner {
    pub fn new(
        store: Arc<dyn BlastStore + Send + Sync>,
        source: Arc<dyn RecipientSource + Send + Sync>,
        messenger: Arc<dyn Messenger + Send + Sync>,
        audit: Arc<dyn AuditSink + Send + Sync>,
        dispatcher: Arc<TimeoutDispatcher>,
        config: BlastConfig,
    ) -> Self {
        Self {
            store,
            source,
            messenger,
            audit,
            dispatcher,
            config,
        }
    }

    pub fn dispatcher(&self) -> &Arc<TimeoutDispatcher> {
        &self.dispatcher
    }

    pub fn store(&self) -> &Arc<dyn BlastStore + Send + Sync> {
        &self.store
    }

    /// Fetch rows from the recipient source and start a blast with them.
    pub async fn start(&self) -> Result<Blast, VolleyError> {
        let rows = self.source.fetch_rows().await?;
        self.start_with_rows(rows).await
    }

    /// Start a blast from raw rows: row 0 is the text, the rest are phones.
    ///
    /// The first recipient is sent to before this returns, and one
    /// continuation is scheduled for the rest.
    pub async fn start_with_rows(&self, rows: Vec<String>) -> Result<Blast, VolleyError> {
        let mut rows = rows.into_iter();
        let text = rows.next().ok_or_else(|| VolleyError::Source {
            message: "recipient source returned no rows; the first row must hold the text"
                .to_string(),
            source: None,
        })?;
        let phones: Vec<String> = rows.collect();

        let blast = Blast {
            id: uuid::Uuid::new_v4().to_string(),
            status: BlastStatus::InProgress,
            recipient_count: phones.len() as i64,
            last_sent_index: 0,
            text,
            started_at: now_timestamp(),
            ended_at: None,
        };
        self.store.create_blast(&blast).await?;

        let recipients: Vec<BlastRecipient> = phones
            .into_iter()
            .enumerate()
            .map(|(index, phone)| BlastRecipient {
                blast_id: blast.id.clone(),
                index: index as i64,
                phone,
            })
            .collect();
        self.store.insert_recipients(&recipients).await?;
        info!(
            blast_id = %blast.id,
            recipients = recipients.len(),
            "blast created"
        );

        let Some(first) = recipients.first() else {
            warn!(blast_id = %blast.id, "blast has no recipients");
            self.finish(&blast.id, BlastStatus::Done).await?;
            return self.reload(&blast.id).await;
        };

        let outcome = self.deliver(&blast, first).await?;
        if matches!(outcome, DeliveryOutcome::Failed { fatal: true, .. }) {
            self.finish(&blast.id, BlastStatus::Error).await?;
            return self.reload(&blast.id).await;
        }

        self.dispatcher
            .dispatch(
                iterate_blast_params(&blast.id, 1),
                self.config.iteration_delay_secs,
            )
            .await?;
        Ok(blast)
    }

    /// Advance `blast_id` by one recipient.
    ///
    /// `expected` is the index the continuation was scheduled for. A
    /// continuation whose index no longer follows the cursor is a replay and
    /// does nothing.
    pub async fn iterate(
        &self,
        blast_id: &str,
        expected: Option<i64>,
    ) -> Result<StepOutcome, VolleyError> {
        let Some(blast) = self.store.get_blast(blast_id).await? else {
            warn!(blast_id, "iterate called for unknown blast");
            return Ok(StepOutcome::Missing);
        };
        if blast.status.is_terminal() {
            debug!(blast_id, status = %blast.status, "blast already terminal");
            return Ok(StepOutcome::Terminal(blast.status));
        }

        let next = blast.last_sent_index + 1;
        if let Some(index) = expected
            && index != next
        {
            warn!(blast_id, index, cursor = blast.last_sent_index, "stale continuation skipped");
            return Ok(StepOutcome::Duplicate { index });
        }

        let phones: HashMap<i64, BlastRecipient> = self
            .store
            .list_recipients(blast_id)
            .await?
            .into_iter()
            .map(|r| (r.index, r))
            .collect();

        let Some(recipient) = phones.get(&next) else {
            self.finish(blast_id, BlastStatus::Done).await?;
            return Ok(StepOutcome::Finished);
        };

        let delivered = match self.deliver(&blast, recipient).await? {
            DeliveryOutcome::AlreadyClaimed => {
                // The claiming step may have died before moving the cursor.
                return if self.schedule_next(&blast, next).await? {
                    warn!(blast_id, index = next, "slot already claimed, chain resumed");
                    Ok(StepOutcome::Resumed { index: next })
                } else {
                    warn!(blast_id, index = next, "duplicate continuation, step skipped");
                    Ok(StepOutcome::Duplicate { index: next })
                };
            }
            DeliveryOutcome::Failed { fatal: true, .. } => {
                self.finish(blast_id, BlastStatus::Error).await?;
                return Ok(StepOutcome::Halted { index: next });
            }
            DeliveryOutcome::Failed { fatal: false, .. } => false,
            DeliveryOutcome::Sent => true,
        };

        if !self.schedule_next(&blast, next).await? {
            warn!(blast_id, index = next, "cursor moved concurrently, chain stops here");
            return Ok(StepOutcome::CursorConflict { index: next });
        }
        Ok(StepOutcome::Advanced {
            index: next,
            delivered,
        })
    }

    /// Move the cursor from `blast.last_sent_index` to `index` and schedule
    /// the step after it.
    ///
    /// Returns `false` if another step moved the cursor first. If scheduling
    /// fails the cursor is moved back, so a retry of the same continuation
    /// can resume the chain.
    async fn schedule_next(&self, blast: &Blast, index: i64) -> Result<bool, VolleyError> {
        if !self
            .store
            .advance_cursor(&blast.id, blast.last_sent_index, index)
            .await?
        {
            return Ok(false);
        }

        let dispatched = self
            .dispatcher
            .dispatch(
                iterate_blast_params(&blast.id, index + 1),
                self.config.iteration_delay_secs,
            )
            .await;
        if let Err(e) = dispatched {
            match self
                .store
                .advance_cursor(&blast.id, index, blast.last_sent_index)
                .await
            {
                Ok(true) => debug!(blast_id = %blast.id, index, "cursor rewound"),
                Ok(false) => warn!(blast_id = %blast.id, index, "cursor moved before rewind"),
                Err(rewind) => {
                    error!(blast_id = %blast.id, index, error = %rewind, "cursor rewind failed")
                }
            }
            return Err(e);
        }
        Ok(true)
    }

    /// Claim, send, record, and audit one delivery.
    async fn deliver(
        &self,
        blast: &Blast,
        recipient: &BlastRecipient,
    ) -> Result<DeliveryOutcome, VolleyError> {
        let index = recipient.index;
        if !self
            .store
            .claim_delivery(&blast.id, index, &recipient.phone)
            .await?
        {
            return Ok(DeliveryOutcome::AlreadyClaimed);
        }

        let (outcome, status_code, status_text) =
            match self.messenger.send(&recipient.phone, &blast.text).await {
                Ok(receipt) => {
                    info!(blast_id = %blast.id, index, "message sent");
                    (
                        DeliveryOutcome::Sent,
                        receipt.status_code.to_string(),
                        receipt.status_text,
                    )
                }
                Err(e) => {
                    let status = match &e {
                        VolleyError::Messenger {
                            status: Some(code), ..
                        } => code.to_string(),
                        _ => "error".to_string(),
                    };
                    let fatal = e.is_fatal();
                    if fatal {
                        error!(blast_id = %blast.id, index, error = %e, "fatal send error");
                    } else {
                        warn!(blast_id = %blast.id, index, error = %e, "send failed");
                    }
                    let detail = e.to_string();
                    (
                        DeliveryOutcome::Failed {
                            fatal,
                            detail: detail.clone(),
                        },
                        status,
                        detail,
                    )
                }
            };

        let (delivery_status, detail) = match &outcome {
            DeliveryOutcome::Failed { detail, .. } => {
                (DeliveryStatus::Failed, Some(detail.as_str()))
            }
            _ => (DeliveryStatus::Sent, None),
        };
        self.store
            .complete_delivery(&blast.id, index, delivery_status, detail)
            .await?;

        let report = DeliveryReport {
            from_phone: self.config.source_number.clone(),
            to_phone: recipient.phone.clone(),
            text: blast.text.clone(),
            status_code,
            status_text,
        };
        if let Err(e) = self.audit.report(&report).await {
            warn!(blast_id = %blast.id, index, error = %e, "delivery audit failed");
        }

        Ok(outcome)
    }

    async fn finish(&self, blast_id: &str, status: BlastStatus) -> Result<(), VolleyError> {
        if self
            .store
            .finish_blast(blast_id, status, &now_timestamp())
            .await?
        {
            info!(blast_id, %status, "blast finished");
        } else {
            debug!(blast_id, %status, "blast was already terminal");
        }
        Ok(())
    }

    async fn reload(&self, blast_id: &str) -> Result<Blast, VolleyError> {
        self.store.get_blast(blast_id).await?.ok_or_else(|| {
            VolleyError::Internal(format!("blast {blast_id} vanished after creation"))
        })
    }
}
