// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for Volley's external collaborators.
//!
//! All adapters extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod adapter;
pub mod audit;
pub mod messenger;
pub mod source;
pub mod storage;
pub mod timer;

pub use adapter::PluginAdapter;
pub use audit::AuditSink;
pub use messenger::Messenger;
pub use source::RecipientSource;
pub use storage::BlastStore;
pub use timer::TimerGateway;
