//! # whsig-crypto — Webhook Signing and Verification
//!
//! Provides the cryptographic half of webhook signature checking:
//!
//! - **HMAC-SHA256** over `SigningString` (the only accepted input type,
//!   enforcing canonicalization correctness).
//! - **Constant-time comparison** of the computed and received signatures.
//! - **`WebhookSecret`**, a non-empty, zeroize-on-drop key that never
//!   prints.
//!
//! ## Crate Policy
//!
//! - Depends only on `whsig-core` internally.
//! - No mocking of cryptographic operations in tests. All tests use real
//!   canonicalization and real HMAC-SHA256.
//! - Secrets, signatures, and payload values are never logged.

pub mod config;
pub mod secret;
pub mod signer;
pub mod verify;

pub use config::{ConfigError, VerifierConfig};
pub use secret::WebhookSecret;
pub use signer::{compute_signature, compute_signature_hex, sign_payload, Signature};
pub use verify::{constant_time_eq, verify, verify_serialize, verify_signing_string, WebhookVerifier};
