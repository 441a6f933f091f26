// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook token check for the blast trigger.
//!
//! The token travels in the URL path, so it is compared in constant time.
//! With no token configured every trigger is rejected (fail-closed).

use subtle::ConstantTimeEq;

#[derive(Clone, Default)]
pub struct AuthConfig {
    /// Expected path token. `None` rejects all triggers.
    pub webhook_token: Option<String>,
}

impl AuthConfig {
    pub fn new(webhook_token: Option<String>) -> Self {
        Self {
            webhook_token: webhook_token.filter(|t| !t.is_empty()),
        }
    }

    /// Returns true if `candidate` matches the configured token.
    pub fn verify(&self, candidate: &str) -> bool {
        match &self.webhook_token {
            Some(expected) => bool::from(candidate.as_bytes().ct_eq(expected.as_bytes())),
            None => {
                tracing::error!("no webhook token configured -- rejecting blast trigger");
                false
            }
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field(
                "webhook_token",
                &self.webhook_token.as_ref().map(|_| "[redacted]"),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_token_is_accepted() {
        let auth = AuthConfig::new(Some("secret-token".to_string()));
        assert!(auth.verify("secret-token"));
        assert!(!auth.verify("secret-tokem"));
        assert!(!auth.verify("secret"));
    }

    #[test]
    fn missing_or_empty_token_rejects_everything() {
        assert!(!AuthConfig::new(None).verify(""));
        assert!(!AuthConfig::new(Some(String::new())).verify(""));
    }

    #[test]
    fn debug_redacts_token() {
        let auth = AuthConfig::new(Some("secret-token".to_string()));
        let debug_output = format!("{auth:?}");
        assert!(!debug_output.contains("secret-token"));
        assert!(debug_output.contains("[redacted]"));
    }
}
