//! # HMAC-SHA256 Signature Computation
//!
//! Computes webhook signatures exclusively from `SigningString`, ensuring
//! that every MAC is taken over canonicalized text.
//!
//! ## Security Invariant
//!
//! The function signature `compute_signature(&SigningString, &WebhookSecret)`
//! makes it a compile error to MAC raw bytes or to pass a secret that was
//! never validated as non-empty.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use whsig_core::{CryptoError, Payload, SigningString};

use crate::secret::WebhookSecret;

type HmacSha256 = Hmac<Sha256>;

/// Length of a signature in bytes.
pub const SIGNATURE_LEN: usize = 32;

/// Length of a signature rendered as hex.
pub const SIGNATURE_HEX_LEN: usize = SIGNATURE_LEN * 2;

/// An HMAC-SHA256 digest over a signing string.
///
/// `==` is constant-time.
#[derive(Clone)]
pub struct Signature(pub [u8; SIGNATURE_LEN]);

impl PartialEq for Signature {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl Eq for Signature {}

impl std::hash::Hash for Signature {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl Signature {
    /// Return the raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LEN] {
        &self.0
    }

    /// Render the signature as a lowercase hex string (64 chars).
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Parse a signature from a 64-character hex string. Either case is
    /// accepted.
    pub fn from_hex(hex: &str) -> Result<Self, CryptoError> {
        if hex.len() != SIGNATURE_HEX_LEN {
            return Err(CryptoError::SignatureFormat(format!(
                "signature hex must be {SIGNATURE_HEX_LEN} chars, got {}",
                hex.len()
            )));
        }
        if let Some(pos) = hex.bytes().position(|b| !b.is_ascii_hexdigit()) {
            return Err(CryptoError::SignatureFormat(format!(
                "invalid hex character at position {pos}"
            )));
        }
        let mut bytes = [0u8; SIGNATURE_LEN];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).map_err(|e| {
                CryptoError::SignatureFormat(format!("invalid hex at position {}: {e}", i * 2))
            })?;
        }
        Ok(Self(bytes))
    }
}

impl std::fmt::Debug for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Signature({}...)", &self.to_hex()[..16])
    }
}

impl std::fmt::Display for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Compute the HMAC-SHA256 of a signing string keyed by the shared secret.
///
/// # Errors
///
/// Returns `CryptoError::MacInit` if the MAC cannot be keyed.
pub fn compute_signature(
    signing: &SigningString,
    secret: &WebhookSecret,
) -> Result<Signature, CryptoError> {
    let mut mac = HmacSha256::new_from_slice(secret.expose_bytes())
        .map_err(|e| CryptoError::MacInit(e.to_string()))?;
    mac.update(signing.as_bytes());
    let tag = mac.finalize().into_bytes();
    let mut bytes = [0u8; SIGNATURE_LEN];
    bytes.copy_from_slice(&tag);
    Ok(Signature(bytes))
}

/// Compute the signature as a 64-character lowercase hex string.
pub fn compute_signature_hex(
    signing: &SigningString,
    secret: &WebhookSecret,
) -> Result<String, CryptoError> {
    compute_signature(signing, secret).map(|sig| sig.to_hex())
}

/// Canonicalize a payload and sign it in one step.
pub fn sign_payload(payload: &Payload, secret: &WebhookSecret) -> Result<Signature, CryptoError> {
    compute_signature(&SigningString::new(payload), secret)
}
