//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error types used across the webhook signature crates. All
//! errors use `thiserror` for derive-based `Display` and `Error`
//! implementations.
//!
//! ## Design
//!
//! - A signature mismatch is **not** an error. Verification returns
//!   `Ok(false)` for a clean mismatch; every variant here is a distinct
//!   failure class that must never be reported as "not verified".
//! - Error messages never carry secret material. Payload errors name the
//!   offending value *kind*, not its contents.

use thiserror::Error;

/// Top-level error type for webhook signature verification.
#[derive(Error, Debug)]
pub enum WhsigError {
    /// The payload could not be canonicalized.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// The secret or the MAC primitive was unusable.
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),
}

/// Error while turning caller input into a canonical signing string.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// The input is not a JSON-like document this crate can represent:
    /// a non-object root, or a value the serializer could not express.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}

impl From<serde_json::Error> for CanonicalizationError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidPayload(err.to_string())
    }
}

/// Error in cryptographic operations.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// The shared secret is unusable (empty, or failed validation).
    #[error("key error: {0}")]
    KeyError(String),

    /// The HMAC primitive could not be initialized.
    #[error("mac initialization failed: {0}")]
    MacInit(String),

    /// A signature string was not 64 lowercase or uppercase hex characters.
    #[error("malformed signature: {0}")]
    SignatureFormat(String),
}
