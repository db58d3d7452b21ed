//! # Webhook Signature Verification
//!
//! Recomputes the signature of an inbound payload and compares it to the
//! one the sender supplied.
//!
//! ## Outcomes
//!
//! - `Ok(true)` — the signature matches.
//! - `Ok(false)` — a clean mismatch. This is the only "not verified" result.
//! - `Err(_)` — the payload or the secret was unusable. Never folded into
//!   `Ok(false)`.
//!
//! ## Timing
//!
//! The comparison runs over `subtle::ConstantTimeEq`, so its duration does
//! not depend on where the computed and received signatures first differ.
//! The received signature is compared as text, byte for byte, against the
//! lowercase hex rendering of the computed digest.

use serde::Serialize;
use subtle::ConstantTimeEq;
use whsig_core::{CryptoError, Payload, SigningString, WhsigError};

use crate::config::VerifierConfig;
use crate::secret::WebhookSecret;
use crate::signer::{compute_signature, compute_signature_hex, Signature};

/// Constant-time comparison of two byte strings.
///
/// When lengths differ, performs a dummy comparison so the mismatch path
/// costs the same as a full compare of `expected`.
pub fn constant_time_eq(provided: &[u8], expected: &[u8]) -> bool {
    if provided.len() != expected.len() {
        let _ = expected.ct_eq(expected);
        return false;
    }
    provided.ct_eq(expected).into()
}

/// Verify a received hex signature against a payload.
///
/// # Errors
///
/// Returns `CryptoError::MacInit` if the MAC cannot be keyed.
pub fn verify(
    payload: &Payload,
    received_signature: &str,
    secret: &WebhookSecret,
) -> Result<bool, CryptoError> {
    verify_signing_string(&SigningString::new(payload), received_signature, secret)
}

/// Verify a received hex signature against an already-canonicalized string.
pub fn verify_signing_string(
    signing: &SigningString,
    received_signature: &str,
    secret: &WebhookSecret,
) -> Result<bool, CryptoError> {
    let computed = compute_signature_hex(signing, secret)?;
    let matched = constant_time_eq(received_signature.as_bytes(), computed.as_bytes());
    tracing::debug!(
        signing_len = signing.len(),
        matched,
        "webhook signature checked"
    );
    Ok(matched)
}

/// Verify a received hex signature against any serializable payload.
///
/// # Errors
///
/// Returns `WhsigError::Canonicalization` if the value is not a valid
/// payload, and `WhsigError::Crypto` if the MAC cannot be keyed.
pub fn verify_serialize(
    obj: &impl Serialize,
    received_signature: &str,
    secret: &WebhookSecret,
) -> Result<bool, WhsigError> {
    let signing = SigningString::from_serialize(obj)?;
    Ok(verify_signing_string(&signing, received_signature, secret)?)
}

/// A verifier bound to one configured secret.
///
/// Holds no other state; share it freely across threads.
#[derive(Debug, Clone)]
pub struct WebhookVerifier {
    config: VerifierConfig,
}

impl WebhookVerifier {
    pub fn new(config: VerifierConfig) -> Self {
        Self { config }
    }

    /// Canonical text for a payload, for diagnostics.
    pub fn signing_string(&self, payload: &Payload) -> SigningString {
        SigningString::new(payload)
    }

    /// Sign a payload with the configured secret.
    pub fn sign(&self, payload: &Payload) -> Result<Signature, CryptoError> {
        compute_signature(&SigningString::new(payload), &self.config.secret)
    }

    /// Check a received signature against a payload.
    pub fn verify(&self, payload: &Payload, received_signature: &str) -> Result<bool, CryptoError> {
        verify(payload, received_signature, &self.config.secret)
    }

    /// Check a received signature against a decoded JSON document.
    pub fn verify_json(
        &self,
        document: &serde_json::Value,
        received_signature: &str,
    ) -> Result<bool, WhsigError> {
        let payload = Payload::try_from(document)?;
        Ok(self.verify(&payload, received_signature)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use whsig_core::CanonicalizationError;

    fn secret() -> WebhookSecret {
        WebhookSecret::new("secret").unwrap()
    }

    fn vector_payload() -> Payload {
        Payload::try_from(json!({"a": {"b": 1, "c": null}, "d": [true, "  x  "]})).unwrap()
    }

    const VECTOR_SIG: &str = "75092a7dcd0e4f7db8b25947c9b44c61fc0d06bf24920ab040500ec49a714ccc";

    #[test]
    fn constant_time_eq_identical() {
        assert!(constant_time_eq(b"abc123", b"abc123"));
    }

    #[test]
    fn constant_time_eq_rejects_different() {
        assert!(!constant_time_eq(b"abc123", b"abc124"));
    }

    #[test]
    fn constant_time_eq_rejects_prefix() {
        assert!(!constant_time_eq(b"abc", b"abc123"));
    }

    #[test]
    fn constant_time_eq_rejects_empty() {
        assert!(!constant_time_eq(b"", b"abc123"));
    }

    #[test]
    fn verify_known_vector() {
        assert!(verify(&vector_payload(), VECTOR_SIG, &secret()).unwrap());
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        let other = WebhookSecret::new("not-the-secret").unwrap();
        assert!(!verify(&vector_payload(), VECTOR_SIG, &other).unwrap());
    }

    #[test]
    fn verify_rejects_uppercase_hex() {
        let upper = VECTOR_SIG.to_uppercase();
        assert!(!verify(&vector_payload(), &upper, &secret()).unwrap());
    }

    #[test]
    fn verify_rejects_truncated_and_empty() {
        assert!(!verify(&vector_payload(), &VECTOR_SIG[..63], &secret()).unwrap());
        assert!(!verify(&vector_payload(), "", &secret()).unwrap());
    }

    #[test]
    fn verify_ignores_key_order_and_whitespace() {
        let shuffled = Payload::try_from(json!({"d": [true, "x"], "a": {"c": null, "b": 1}})).unwrap();
        assert!(verify(&shuffled, VECTOR_SIG, &secret()).unwrap());
    }

    #[test]
    fn verify_detects_tampered_value() {
        let tampered = Payload::try_from(json!({"a": {"b": 2, "c": null}, "d": [true, "x"]})).unwrap();
        assert!(!verify(&tampered, VECTOR_SIG, &secret()).unwrap());
    }

    #[test]
    fn verify_serialize_invalid_payload_is_error_not_mismatch() {
        let err = verify_serialize(&json!(["not", "an", "object"]), VECTOR_SIG, &secret()).unwrap_err();
        assert!(matches!(
            err,
            WhsigError::Canonicalization(CanonicalizationError::InvalidPayload(_))
        ));
    }

    #[test]
    fn verify_serialize_accepts_structs() {
        #[derive(Serialize)]
        struct Inner {
            b: i32,
            c: Option<String>,
        }
        #[derive(Serialize)]
        struct Event {
            a: Inner,
            d: (bool, &'static str),
        }
        let event = Event {
            a: Inner { b: 1, c: None },
            d: (true, "  x  "),
        };
        assert!(verify_serialize(&event, VECTOR_SIG, &secret()).unwrap());
    }

    #[test]
    fn verifier_sign_then_verify() {
        let verifier = WebhookVerifier::new(VerifierConfig::new(secret()));
        let payload = vector_payload();
        let sig = verifier.sign(&payload).unwrap();
        assert_eq!(sig.to_hex(), VECTOR_SIG);
        assert!(verifier.verify(&payload, &sig.to_hex()).unwrap());
        assert_eq!(
            verifier.signing_string(&payload).as_str(),
            "a.b=1&d.0=true&d.1=x"
        );
    }

    #[test]
    fn verifier_verify_json_rejects_scalar_root() {
        let verifier = WebhookVerifier::new(VerifierConfig::new(secret()));
        let err = verifier.verify_json(&json!(42), VECTOR_SIG).unwrap_err();
        assert!(matches!(err, WhsigError::Canonicalization(_)));
    }

    #[test]
    fn verifier_debug_redacts_secret() {
        let key = WebhookSecret::new("hunter2-value").unwrap();
        let verifier = WebhookVerifier::new(VerifierConfig::new(key));
        let dbg = format!("{verifier:?}");
        assert!(!dbg.contains("hunter2-value"));
        assert!(dbg.contains("[REDACTED]"));
    }
}
