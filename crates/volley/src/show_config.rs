// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `volley config` command implementation.

use volley_config::VolleyConfig;
use volley_core::VolleyError;

const REDACTED: &str = "[redacted]";

/// Copy of `config` with every secret replaced.
pub fn redacted(config: &VolleyConfig) -> VolleyConfig {
    let mut config = config.clone();
    for secret in [
        &mut config.server.webhook_token,
        &mut config.scheduler.api_token,
        &mut config.messaging.api_key,
    ] {
        if secret.is_some() {
            *secret = Some(REDACTED.to_string());
        }
    }
    config
}

/// Print the effective configuration as TOML.
pub fn run_config(config: &VolleyConfig) -> Result<(), VolleyError> {
    let rendered = toml::to_string_pretty(&redacted(config))
        .map_err(|e| VolleyError::Internal(format!("failed to render configuration: {e}")))?;
    println!("# effective configuration (valid)");
    print!("{rendered}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secrets_are_redacted() {
        let mut config = VolleyConfig::default();
        config.server.webhook_token = Some("hook-secret".into());
        config.messaging.api_key = Some("wa-secret".into());

        let rendered = toml::to_string_pretty(&redacted(&config)).unwrap();
        assert!(!rendered.contains("hook-secret"));
        assert!(!rendered.contains("wa-secret"));
        assert!(rendered.contains(REDACTED));
    }

    #[test]
    fn unset_secrets_stay_unset() {
        let config = redacted(&VolleyConfig::default());
        assert!(config.scheduler.api_token.is_none());
    }

    #[test]
    fn rendered_config_loads_back() {
        let rendered = toml::to_string_pretty(&VolleyConfig::default()).unwrap();
        let reloaded = volley_config::load_config_from_str(&rendered).unwrap();
        assert_eq!(reloaded.server.port, 3000);
    }
}
