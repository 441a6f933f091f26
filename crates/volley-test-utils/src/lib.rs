// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Volley integration tests.
//!
//! Provides mock adapters and a test harness for fast, deterministic tests
//! without a real scheduler, transport, or spreadsheet.
//!
//! # Components
//!
//! - [`MockMessenger`] - captures sends, scripted failures per phone
//! - [`MockTimerGateway`] - records waits so tests can fire them by hand
//! - [`MockRecipientSource`] - fixed raw rows
//! - [`MockAuditSink`] - captures delivery reports
//! - [`TestHarness`] - all of the above wired to a temp SQLite store

pub mod harness;
pub mod mocks;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use mocks::{MockAuditSink, MockMessenger, MockRecipientSource, MockTimerGateway};
