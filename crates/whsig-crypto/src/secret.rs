//! # Shared Webhook Secret
//!
//! `WebhookSecret` owns the HMAC key shared with the webhook sender.
//!
//! ## Security Invariant
//!
//! - Never empty: the only constructors reject an empty secret with
//!   `CryptoError::KeyError`, so the signer never runs with a blank key.
//! - Key bytes are zeroized on drop.
//! - Does not implement `Serialize` or `Display`; `Debug` prints
//!   `[REDACTED]`. The secret cannot end up in logs or responses by accident.

use serde::{Deserialize, Deserializer};
use whsig_core::CryptoError;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// The shared secret, kept as the UTF-8 bytes of the configured string.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct WebhookSecret(Vec<u8>);

impl WebhookSecret {
    /// Wrap a secret string.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::KeyError` if the secret is empty.
    pub fn new(secret: impl Into<String>) -> Result<Self, CryptoError> {
        let secret: String = secret.into();
        if secret.is_empty() {
            return Err(CryptoError::KeyError("webhook secret must not be empty".into()));
        }
        Ok(Self(secret.into_bytes()))
    }

    /// Raw key bytes for MAC initialization.
    pub fn expose_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for WebhookSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("WebhookSecret([REDACTED])")
    }
}

impl<'de> Deserialize<'de> for WebhookSecret {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut raw = String::deserialize(deserializer)?;
        let secret = Self::new(raw.as_str()).map_err(serde::de::Error::custom);
        raw.zeroize();
        secret
    }
}

impl std::str::FromStr for WebhookSecret {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_secret_rejected() {
        let err = WebhookSecret::new("").unwrap_err();
        assert!(matches!(err, CryptoError::KeyError(_)));
    }

    #[test]
    fn test_secret_bytes_are_utf8() {
        let secret = WebhookSecret::new("clé").unwrap();
        assert_eq!(secret.expose_bytes(), "clé".as_bytes());
    }

    #[test]
    fn test_debug_is_redacted() {
        let secret = WebhookSecret::new("super-secret-value").unwrap();
        let dbg = format!("{secret:?}");
        assert!(!dbg.contains("super-secret-value"));
        assert!(dbg.contains("[REDACTED]"));
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: WebhookSecret = serde_json::from_str(r#""abc""#).unwrap();
        assert_eq!(ok.expose_bytes(), b"abc");
        assert!(serde_json::from_str::<WebhookSecret>(r#""""#).is_err());
    }

    #[test]
    fn test_from_str() {
        let secret: WebhookSecret = "k".parse().unwrap();
        assert_eq!(secret.expose_bytes(), b"k");
        assert!("".parse::<WebhookSecret>().is_err());
    }
}
