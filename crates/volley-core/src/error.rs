// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for Volley.

use thiserror::Error;

/// The primary error type used across all Volley adapter traits and core operations.
#[derive(Debug, Error)]
pub enum VolleyError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The external scheduling primitive refused or failed a wait request.
    #[error("scheduler error: {message}")]
    Scheduler {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Message transport errors.
    ///
    /// `fatal` marks failures that will repeat for every recipient, such as
    /// rejected credentials. A fatal error halts the blast it occurred in.
    #[error("messenger error: {message}")]
    Messenger {
        message: String,
        /// HTTP status returned by the transport, if a response arrived.
        status: Option<u16>,
        fatal: bool,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Recipient source errors (fetch failure, malformed rows).
    #[error("recipient source error: {message}")]
    Source {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Delivery audit sink errors.
    #[error("audit error: {message}")]
    Audit {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A continuation payload could not be encoded or decoded.
    #[error("invalid continuation payload: {0}")]
    Payload(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl VolleyError {
    /// Returns true for messenger errors that should halt the blast.
    pub fn is_fatal(&self) -> bool {
        matches!(self, VolleyError::Messenger { fatal: true, .. })
    }
}
