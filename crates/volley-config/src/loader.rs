// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading with Figment.
//!
//! Merge order (later overrides earlier): compiled defaults,
//! `/etc/volley/volley.toml`, `~/.config/volley/volley.toml`, `./volley.toml`,
//! then `VOLLEY_*` environment variables.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::VolleyConfig;
use crate::{CONFIG_FILE, SYSTEM_CONFIG_PATH};

/// Top-level sections, used to turn `VOLLEY_SECTION_KEY` into `section.key`.
const SECTIONS: &[&str] = &[
    "service",
    "server",
    "storage",
    "scheduler",
    "blast",
    "source",
    "messaging",
    "audit",
];

/// Load configuration from the standard hierarchy with env var overrides.
pub fn load_config() -> Result<VolleyConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<VolleyConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(VolleyConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from one explicit file with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<VolleyConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(VolleyConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// The unextracted Figment for the standard hierarchy.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(VolleyConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("volley").join(CONFIG_FILE))
                .unwrap_or_default(),
        ))
        .merge(Toml::file(CONFIG_FILE))
        .merge(env_provider())
}

/// `VOLLEY_*` provider mapping only the section prefix to a dot.
///
/// `Env::split("_")` would turn `VOLLEY_BLAST_SOURCE_NUMBER` into
/// `blast.source.number`; only the leading section name is split off here.
fn env_provider() -> Env {
    Env::prefixed("VOLLEY_").map(|key| env_key_to_path(key.as_str()).into())
}

/// Figment hands the mapper the key as written in the environment, so it is
/// lowercased before matching sections.
pub(crate) fn env_key_to_path(key: &str) -> String {
    let key = key.to_ascii_lowercase();
    SECTIONS
        .iter()
        .find_map(|section| {
            key.strip_prefix(section)
                .and_then(|rest| rest.strip_prefix('_'))
                .map(|field| format!("{section}.{field}"))
        })
        .unwrap_or(key)
}
