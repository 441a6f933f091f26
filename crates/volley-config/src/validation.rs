// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! [`validate_config`] runs on every load. The command-specific checks
//! ([`validate_for_serve`], [`validate_for_start`]) only apply when the
//! corresponding surface is used.

use crate::diagnostic::ConfigError;
use crate::model::{SchedulerBackend, VolleyConfig};

/// Smallest accepted chunk size for outbound messages.
pub const MIN_MESSAGE_LEN: usize = 16;

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first.
pub fn validate_config(config: &VolleyConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.storage.database_path.trim().is_empty() {
        errors.push(invalid("storage.database_path must not be empty"));
    }

    if config.server.host.trim().is_empty() {
        errors.push(invalid("server.host must not be empty"));
    }

    if config.scheduler.max_wait_secs < 1 {
        errors.push(invalid("scheduler.max_wait_secs must be at least 1"));
    }

    if config.scheduler.backend == SchedulerBackend::Http
        && config
            .scheduler
            .endpoint
            .as_deref()
            .is_none_or(|e| e.trim().is_empty())
    {
        errors.push(invalid(
            "scheduler.endpoint is required when scheduler.backend = \"http\"",
        ));
    }

    if config.messaging.max_message_len < MIN_MESSAGE_LEN {
        errors.push(invalid(format!(
            "messaging.max_message_len must be at least {MIN_MESSAGE_LEN}, got {}",
            config.messaging.max_message_len
        )));
    }

    if config.source.csv_url.is_some() && config.source.csv_path.is_some() {
        errors.push(invalid(
            "source.csv_url and source.csv_path are mutually exclusive",
        ));
    }

    if let Some(url) = &config.server.public_url
        && !(url.starts_with("http://") || url.starts_with("https://"))
    {
        errors.push(invalid(format!(
            "server.public_url `{url}` must start with http:// or https://"
        )));
    }

    into_result(errors)
}

/// Extra checks before the HTTP surface is started.
pub fn validate_for_serve(config: &VolleyConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    if config
        .server
        .webhook_token
        .as_deref()
        .is_none_or(|t| t.trim().is_empty())
    {
        errors.push(invalid(
            "server.webhook_token must be set to accept blast triggers",
        ));
    }
    into_result(errors)
}

/// Extra checks before a blast is started from the configured source.
pub fn validate_for_start(config: &VolleyConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    if config.source.csv_url.is_none() && config.source.csv_path.is_none() {
        errors.push(invalid(
            "one of source.csv_url or source.csv_path must be set to start a blast",
        ));
    }
    into_result(errors)
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::Validation {
        message: message.into(),
    }
}

fn into_result(errors: Vec<ConfigError>) -> Result<(), Vec<ConfigError>> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_message(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&VolleyConfig::default()).is_ok());
    }

    #[test]
    fn empty_database_path_fails_validation() {
        let mut config = VolleyConfig::default();
        config.storage.database_path = "  ".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "database_path"));
    }

    #[test]
    fn zero_max_wait_fails_validation() {
        let mut config = VolleyConfig::default();
        config.scheduler.max_wait_secs = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "max_wait_secs"));
    }

    #[test]
    fn http_backend_requires_endpoint() {
        let mut config = VolleyConfig::default();
        config.scheduler.backend = SchedulerBackend::Http;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "scheduler.endpoint"));

        config.scheduler.endpoint = Some("https://timers.example.com".to_string());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn tiny_message_len_fails_validation() {
        let mut config = VolleyConfig::default();
        config.messaging.max_message_len = 4;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "max_message_len"));
    }

    #[test]
    fn both_sources_are_rejected() {
        let mut config = VolleyConfig::default();
        config.source.csv_url = Some("https://sheets.example.com/export.csv".to_string());
        config.source.csv_path = Some("rows.csv".to_string());
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "mutually exclusive"));
    }

    #[test]
    fn errors_are_collected_not_fail_fast() {
        let mut config = VolleyConfig::default();
        config.storage.database_path = String::new();
        config.scheduler.max_wait_secs = 0;
        config.messaging.max_message_len = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn public_url_needs_scheme() {
        let mut config = VolleyConfig::default();
        config.server.public_url = Some("volley.example.com".to_string());
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "public_url"));
    }

    #[test]
    fn serving_requires_webhook_token() {
        let mut config = VolleyConfig::default();
        let errors = validate_for_serve(&config).unwrap_err();
        assert!(has_message(&errors, "webhook_token"));

        config.server.webhook_token = Some("s3cret".to_string());
        assert!(validate_for_serve(&config).is_ok());
    }

    #[test]
    fn starting_requires_a_source() {
        let mut config = VolleyConfig::default();
        assert!(validate_for_start(&config).is_err());

        config.source.csv_path = Some("rows.csv".to_string());
        assert!(validate_for_start(&config).is_ok());
    }
}
