// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for Volley.
//!
//! This crate provides the trait definitions, error type, and blast domain
//! types shared by the engine and every adapter crate. Collaborators such as
//! the progress store or the external timer implement traits defined here.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::VolleyError;
pub use types::{
    AdapterType, Blast, BlastRecipient, BlastStatus, Delivery, DeliveryReport, DeliveryStatus,
    HealthStatus, SendReceipt, TimerRequest,
};

// Re-export all adapter traits at crate root.
pub use traits::{AuditSink, BlastStore, Messenger, PluginAdapter, RecipientSource, TimerGateway};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volley_error_has_all_variants() {
        let _config = VolleyError::Config("test".into());
        let _storage = VolleyError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _scheduler = VolleyError::Scheduler {
            message: "test".into(),
            source: None,
        };
        let _messenger = VolleyError::Messenger {
            message: "test".into(),
            status: None,
            fatal: false,
            source: None,
        };
        let _source = VolleyError::Source {
            message: "test".into(),
            source: None,
        };
        let _audit = VolleyError::Audit {
            message: "test".into(),
            source: None,
        };
        let _payload = VolleyError::Payload("test".into());
        let _internal = VolleyError::Internal("test".into());
    }

    #[test]
    fn only_fatal_messenger_errors_are_fatal() {
        let fatal = VolleyError::Messenger {
            message: "unauthorized".into(),
            status: Some(401),
            fatal: true,
            source: None,
        };
        let transient = VolleyError::Messenger {
            message: "bad gateway".into(),
            status: Some(502),
            fatal: false,
            source: None,
        };
        assert!(fatal.is_fatal());
        assert!(!transient.is_fatal());
        assert!(!VolleyError::Internal("x".into()).is_fatal());
    }

    #[test]
    fn adapter_type_round_trips() {
        use std::str::FromStr;

        let variants = [
            AdapterType::Store,
            AdapterType::Source,
            AdapterType::Timer,
            AdapterType::Messenger,
            AdapterType::Audit,
        ];
        for variant in &variants {
            let s = variant.to_string();
            let parsed = AdapterType::from_str(&s).expect("should parse back");
            assert_eq!(*variant, parsed);
        }
    }

    #[test]
    fn all_trait_modules_are_exported() {
        fn _assert_plugin_adapter<T: PluginAdapter>() {}
        fn _assert_blast_store<T: BlastStore>() {}
        fn _assert_recipient_source<T: RecipientSource>() {}
        fn _assert_timer_gateway<T: TimerGateway>() {}
        fn _assert_messenger<T: Messenger>() {}
        fn _assert_audit_sink<T: AuditSink>() {}
    }
}
