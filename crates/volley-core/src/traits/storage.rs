// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Progress store trait for blast persistence backends (SQLite, etc.).

use async_trait::async_trait;

use crate::error::VolleyError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{Blast, BlastRecipient, BlastStatus, Delivery, DeliveryStatus};

/// Adapter for the keyed store that carries blast progress between invocations.
///
/// The store is the only memory shared by continuations. Cursor moves are
/// conditional and delivery claims are insert-if-absent, so a duplicated
/// continuation can detect that its step already ran.
#[async_trait]
pub trait BlastStore: PluginAdapter {
    /// Initializes the storage backend (migrations, connection, etc.).
    async fn initialize(&self) -> Result<(), VolleyError>;

    /// Closes the storage backend, flushing pending writes.
    async fn close(&self) -> Result<(), VolleyError>;

    // --- Blast operations ---

    /// Persists a new blast row.
    async fn create_blast(&self, blast: &Blast) -> Result<(), VolleyError>;

    /// Loads a blast by id.
    async fn get_blast(&self, id: &str) -> Result<Option<Blast>, VolleyError>;

    /// Lists blasts, newest first, optionally filtered by status.
    async fn list_blasts(&self, status: Option<BlastStatus>) -> Result<Vec<Blast>, VolleyError>;

    /// Moves the cursor from `expected` to `next`.
    ///
    /// Returns `false` without writing when the stored cursor is not
    /// `expected` or the blast is no longer in progress.
    async fn advance_cursor(
        &self,
        id: &str,
        expected: i64,
        next: i64,
    ) -> Result<bool, VolleyError>;

    /// Stamps a terminal status and `ended_at` on an in-progress blast.
    ///
    /// Returns `false` if the blast was already terminal.
    async fn finish_blast(
        &self,
        id: &str,
        status: BlastStatus,
        ended_at: &str,
    ) -> Result<bool, VolleyError>;

    // --- Recipient operations ---

    /// Writes all recipients of a blast in one batch.
    async fn insert_recipients(&self, recipients: &[BlastRecipient]) -> Result<(), VolleyError>;

    /// Returns every recipient of a blast.
    async fn list_recipients(&self, blast_id: &str) -> Result<Vec<BlastRecipient>, VolleyError>;

    // --- Delivery operations ---

    /// Claims the `(blast_id, index)` delivery slot.
    ///
    /// Returns `false` if the slot was already claimed by an earlier step.
    async fn claim_delivery(
        &self,
        blast_id: &str,
        index: i64,
        phone: &str,
    ) -> Result<bool, VolleyError>;

    /// Records the outcome of a claimed delivery.
    async fn complete_delivery(
        &self,
        blast_id: &str,
        index: i64,
        status: DeliveryStatus,
        detail: Option<&str>,
    ) -> Result<(), VolleyError>;

    /// Returns the delivery records of a blast ordered by index.
    async fn list_deliveries(&self, blast_id: &str) -> Result<Vec<Delivery>, VolleyError>;
}
