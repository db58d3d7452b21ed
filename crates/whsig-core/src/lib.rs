//! # whsig-core — Payload Model and Canonical Signing Strings
//!
//! This crate is the leaf of the webhook signature workspace. It turns a
//! JSON-like webhook payload into the single, stable text that the sender
//! and receiver both MAC.
//!
//! ## Key Design Principles
//!
//! 1. **Tagged payload tree.** `Value` is a closed enum; every stage is an
//!    exhaustive `match`. Unsupported input is rejected once, at the
//!    `Payload` conversion boundary, with `InvalidPayload`.
//!
//! 2. **One type per stage.** `FlattenedEntries` → `CleanedEntries` →
//!    `SortedEntries` → `SigningString`. Document order lives only in the
//!    first two.
//!
//! 3. **`SigningString` newtype.** The signer in `whsig-crypto` accepts only
//!    `&SigningString`, whose inner text is private. Raw text cannot be
//!    signed by accident.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `whsig-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - Pure and synchronous: no I/O, no global state, safe to call from any
//!   number of threads.

pub mod canonical;
pub mod error;
pub mod payload;

// Re-export primary types for ergonomic imports.
pub use canonical::{
    clean, flatten, is_empty, is_signing_whitespace, serialize, signing_string, sort, CleanValue,
    CleanedEntries, FlattenedEntries, Scalar, SigningString, SortedEntries, NULL_LITERAL,
};
pub use error::{CanonicalizationError, CryptoError, WhsigError};
pub use payload::{Payload, Value};
