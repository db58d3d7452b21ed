//! Verifier configuration.
//!
//! The crate reads no environment variables of its own. Callers either
//! deserialize a `VerifierConfig` from their own config files or name the
//! variable that holds the secret via [`VerifierConfig::from_env`].

use serde::Deserialize;
use whsig_core::CryptoError;

use crate::secret::WebhookSecret;

/// Configuration for a [`WebhookVerifier`](crate::WebhookVerifier).
///
/// Custom `Debug` redacts the secret.
#[derive(Clone, Deserialize)]
pub struct VerifierConfig {
    /// Shared secret issued by the webhook sender.
    pub secret: WebhookSecret,
}

impl std::fmt::Debug for VerifierConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerifierConfig")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl VerifierConfig {
    /// Build a configuration from an already-loaded secret.
    pub fn new(secret: WebhookSecret) -> Self {
        Self { secret }
    }

    /// Load the secret from the environment variable named by `var`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingSecret` if the variable is unset or not
    /// valid Unicode, and `ConfigError::Secret` if it is empty.
    pub fn from_env(var: &str) -> Result<Self, ConfigError> {
        let raw = std::env::var(var).map_err(|_| ConfigError::MissingSecret(var.to_string()))?;
        let secret = WebhookSecret::new(raw)?;
        Ok(Self { secret })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("environment variable {0} is required")]
    MissingSecret(String),
    #[error("invalid webhook secret: {0}")]
    Secret(#[from] CryptoError),
}
