// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for Volley.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Volley configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VolleyConfig {
    /// Service identity and logging.
    #[serde(default)]
    pub service: ServiceConfig,

    /// HTTP listener and trigger token.
    #[serde(default)]
    pub server: ServerConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// External scheduling primitive settings.
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// Blast loop settings.
    #[serde(default)]
    pub blast: BlastConfig,

    /// Where the raw blast rows come from.
    #[serde(default)]
    pub source: SourceConfig,

    /// Outbound message transport settings.
    #[serde(default)]
    pub messaging: MessagingConfig,

    /// External delivery log settings.
    #[serde(default)]
    pub audit: AuditConfig,
}

/// Service identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Display name used in logs.
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Deployment name (e.g. `dev`, `production`).
    #[serde(default = "default_env_name")]
    pub env_name: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            log_level: default_log_level(),
            env_name: default_env_name(),
        }
    }
}

fn default_service_name() -> String {
    "volley".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_env_name() -> String {
    "dev".to_string()
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Externally reachable base URL of this service, used to build callback URLs.
    /// Defaults to `http://{host}:{port}` when unset.
    #[serde(default)]
    pub public_url: Option<String>,

    /// Token that must appear in the blast trigger path. `None` rejects every trigger.
    #[serde(default)]
    pub webhook_token: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_url: None,
            webhook_token: None,
        }
    }
}

impl ServerConfig {
    /// Returns the base URL the scheduler should call back.
    pub fn callback_base_url(&self) -> String {
        match &self.public_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("http://{}:{}", self.host, self.port),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("volley").join("volley.db"))
        .and_then(|p| p.to_str().map(String::from))
        .unwrap_or_else(|| "volley.db".to_string())
}

fn default_wal_mode() -> bool {
    true
}

/// Which timer gateway implementation backs the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulerBackend {
    /// In-process tokio timers that POST back to this service.
    Local,
    /// A managed delayed-webhook service reached over HTTP.
    Http,
}

/// External scheduling primitive configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SchedulerConfig {
    /// Timer backend.
    #[serde(default = "default_scheduler_backend")]
    pub backend: SchedulerBackend,

    /// Longest single wait the scheduler accepts. Longer delays are chained.
    #[serde(default = "default_max_wait_secs")]
    pub max_wait_secs: u64,

    /// Endpoint that accepts wait requests (`http` backend only).
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Bearer token sent to the scheduler endpoint.
    #[serde(default)]
    pub api_token: Option<String>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            backend: default_scheduler_backend(),
            max_wait_secs: default_max_wait_secs(),
            endpoint: None,
            api_token: None,
        }
    }
}

fn default_scheduler_backend() -> SchedulerBackend {
    SchedulerBackend::Local
}

fn default_max_wait_secs() -> u64 {
    86_400
}

/// Blast loop configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BlastConfig {
    /// Delay between two consecutive sends of a blast.
    #[serde(default = "default_iteration_delay_secs")]
    pub iteration_delay_secs: u64,

    /// Sender number written into delivery audit records.
    #[serde(default)]
    pub source_number: String,
}

impl Default for BlastConfig {
    fn default() -> Self {
        Self {
            iteration_delay_secs: default_iteration_delay_secs(),
            source_number: String::new(),
        }
    }
}

fn default_iteration_delay_secs() -> u64 {
    1
}

/// Raw blast row source configuration. At most one of the two may be set.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    /// URL of a CSV export (e.g. a published spreadsheet).
    #[serde(default)]
    pub csv_url: Option<String>,

    /// Path of a local CSV file.
    #[serde(default)]
    pub csv_path: Option<String>,
}

/// Outbound message transport configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MessagingConfig {
    /// Messages endpoint of the WhatsApp gateway.
    #[serde(default = "default_messaging_api_url")]
    pub api_url: String,

    /// API key sent in the `Token` header.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Sending device identifier.
    #[serde(default)]
    pub device: String,

    /// Largest chunk, in UTF-8 bytes, sent in one request.
    #[serde(default = "default_max_message_len")]
    pub max_message_len: usize,

    /// Log messages instead of sending them.
    #[serde(default)]
    pub dry_run: bool,
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            api_url: default_messaging_api_url(),
            api_key: None,
            device: String::new(),
            max_message_len: default_max_message_len(),
            dry_run: false,
        }
    }
}

fn default_messaging_api_url() -> String {
    "https://api.wassenger.com/v1/messages".to_string()
}

fn default_max_message_len() -> usize {
    6000
}

/// External delivery log (form endpoint) configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Form endpoint receiving delivery reports. `None` logs reports instead.
    #[serde(default)]
    pub form_url: Option<String>,

    #[serde(default = "default_from_field")]
    pub from_field: String,

    #[serde(default = "default_to_field")]
    pub to_field: String,

    #[serde(default = "default_text_field")]
    pub text_field: String,

    #[serde(default = "default_status_code_field")]
    pub status_code_field: String,

    #[serde(default = "default_status_text_field")]
    pub status_text_field: String,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            form_url: None,
            from_field: default_from_field(),
            to_field: default_to_field(),
            text_field: default_text_field(),
            status_code_field: default_status_code_field(),
            status_text_field: default_status_text_field(),
        }
    }
}

fn default_from_field() -> String {
    "from".to_string()
}

fn default_to_field() -> String {
    "to".to_string()
}

fn default_text_field() -> String {
    "text".to_string()
}

fn default_status_code_field() -> String {
    "status_code".to_string()
}

fn default_status_text_field() -> String {
    "status_text".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callback_base_url_defaults_to_listener() {
        let server = ServerConfig::default();
        assert_eq!(server.callback_base_url(), "http://127.0.0.1:3000");
    }

    #[test]
    fn callback_base_url_trims_trailing_slash() {
        let server = ServerConfig {
            public_url: Some("https://volley.example.com/prod/".to_string()),
            ..ServerConfig::default()
        };
        assert_eq!(
            server.callback_base_url(),
            "https://volley.example.com/prod"
        );
    }

    #[test]
    fn scheduler_backend_parses_lowercase() {
        let config: VolleyConfig = toml::from_str(
            r#"
[scheduler]
backend = "http"
endpoint = "https://timers.example.com/executions"
"#,
        )
        .unwrap();
        assert_eq!(config.scheduler.backend, SchedulerBackend::Http);
        assert_eq!(config.scheduler.max_wait_secs, 86_400);
    }
}
