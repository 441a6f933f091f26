// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite progress store for Volley.
//!
//! Provides WAL-mode SQLite storage with embedded migrations and a single-writer
//! concurrency model via `tokio-rusqlite`. Every cursor move and delivery claim
//! is a single conditional statement, so concurrent continuations of the same
//! blast cannot both win.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod queries;

pub use adapter::SqliteStore;
pub use database::Database;
