//! # Canonical Signing String — Flatten, Clean, Sort, Serialize
//!
//! This module defines `SigningString`, the sole input accepted by the HMAC
//! signer, and the four stages that produce it.
//!
//! ## Pipeline
//!
//! 1. **Flatten** — walk the payload in document order, emitting one entry
//!    per leaf keyed by its dotted path (`details.data.owners.0.name`).
//!    Empty objects and empty arrays contribute no entries.
//! 2. **Clean** — drop empty leaves (null, blank strings), remove ASCII
//!    whitespace (space, tab, LF, VT, FF, CR) from strings, render booleans as `true`/`false`.
//!    Numbers, including zero, are always kept.
//! 3. **Sort** — order entries by byte-wise comparison of their paths.
//! 4. **Serialize** — join `key=value` pairs with `&`. Nothing is quoted or
//!    escaped.
//!
//! Each stage has its own output type. Pre-sort document order is visible to
//! `flatten` and `clean` only; `serialize` accepts nothing but
//! `SortedEntries`, so insertion order can never reach the signing string.
//!
//! ## Security Invariant
//!
//! `SigningString` has a private inner field. The only ways to construct it
//! are [`serialize()`] and the pipeline helpers built on it, so a signature
//! can never be computed over text that skipped canonicalization.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Number;

use crate::error::CanonicalizationError;
use crate::payload::{Payload, Value};

/// Text used for a null leaf. Cleaning removes nulls, so this never reaches a
/// signing string; it appears only when inspecting flattened entries.
pub const NULL_LITERAL: &str = "null";

/// Separator between path segments.
pub const PATH_SEPARATOR: char = '.';

/// Separator between `key=value` pairs in the signing string.
pub const PAIR_SEPARATOR: &str = "&";

// ---------------------------------------------------------------------------
// Stage types
// ---------------------------------------------------------------------------

/// A leaf value produced by [`flatten()`]. Objects and arrays never appear
/// here.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

impl Scalar {
    /// The emptiness rule restricted to leaves. Booleans and numbers are
    /// never empty.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Null => leaf_is_empty(Leaf::Null),
            Self::String(s) => leaf_is_empty(Leaf::Text(s)),
            Self::Bool(_) | Self::Number(_) => leaf_is_empty(Leaf::Other),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str(NULL_LITERAL),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

/// Output of [`flatten()`]: dotted path to leaf, in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlattenedEntries(IndexMap<String, Scalar>);

impl FlattenedEntries {
    pub fn get(&self, path: &str) -> Option<&Scalar> {
        self.0.get(path)
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Scalar> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A leaf that survived cleaning. Strings are whitespace-free and booleans
/// have become text; a null cannot be represented.
#[derive(Debug, Clone, PartialEq)]
pub enum CleanValue {
    Text(String),
    Number(Number),
}

impl fmt::Display for CleanValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

/// Output of [`clean()`]: non-empty entries, still in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanedEntries(IndexMap<String, CleanValue>);

impl CleanedEntries {
    pub fn get(&self, path: &str) -> Option<&CleanValue> {
        self.0.get(path)
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, CleanValue> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Output of [`sort()`]: entries in byte-wise path order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SortedEntries(Vec<(String, CleanValue)>);

impl SortedEntries {
    pub fn iter(&self) -> std::slice::Iter<'_, (String, CleanValue)> {
        self.0.iter()
    }

    /// Paths in signing order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The exact text that gets MAC'd: sorted `key=value` pairs joined by `&`.
///
/// # Invariants
///
/// - Produced only by [`serialize()`] or the helpers that call it.
/// - Identical for any two payloads that differ only in key order or in
///   whitespace inside string values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SigningString(String);

impl SigningString {
    /// Run the full pipeline over a payload.
    pub fn new(payload: &Payload) -> Self {
        signing_string(payload)
    }

    /// Run the full pipeline over any serializable value.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError::InvalidPayload` if the value cannot be
    /// represented as a payload (see [`Payload::from_serialize`]).
    pub fn from_serialize(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let payload = Payload::from_serialize(obj)?;
        Ok(signing_string(&payload))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Access the bytes for MAC computation.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when every leaf of the payload was empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for SigningString {
    fn as_ref(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

// ---------------------------------------------------------------------------
// Stages
// ---------------------------------------------------------------------------

/// Flatten a payload into dotted-path leaf entries.
///
/// `parent` prefixes every path; `None` (or an empty string) means the
/// payload is the document root. Array elements contribute their index as a
/// path segment. A path produced twice keeps its first position and takes
/// the later value.
pub fn flatten(payload: &Payload, parent: Option<&str>) -> FlattenedEntries {
    let mut out = IndexMap::new();
    flatten_object(payload, parent, &mut out);
    FlattenedEntries(out)
}

fn flatten_object(payload: &Payload, parent: Option<&str>, out: &mut IndexMap<String, Scalar>) {
    let parent = parent.filter(|p| !p.is_empty());
    for (key, value) in payload {
        let path = match parent {
            Some(p) => format!("{p}{PATH_SEPARATOR}{key}"),
            None => key.clone(),
        };
        flatten_value(value, path, out);
    }
}

fn flatten_value(value: &Value, path: String, out: &mut IndexMap<String, Scalar>) {
    match value {
        Value::Object(nested) => flatten_object(nested, Some(path.as_str()), out),
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                flatten_value(item, format!("{path}{PATH_SEPARATOR}{index}"), out);
            }
        }
        Value::Null => {
            out.insert(path, Scalar::Null);
        }
        Value::Bool(b) => {
            out.insert(path, Scalar::Bool(*b));
        }
        Value::Number(n) => {
            out.insert(path, Scalar::Number(n.clone()));
        }
        Value::String(s) => {
            out.insert(path, Scalar::String(s.clone()));
        }
    }
}

/// The emptiness predicate.
///
/// - `null` is empty.
/// - A string is empty when nothing but whitespace remains.
/// - Booleans and numbers (zero included) are never empty.
/// - An object or array is empty when all of its members are, recursively.
///   `flatten` never emits these; they are handled for completeness.
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => leaf_is_empty(Leaf::Null),
        Value::String(s) => leaf_is_empty(Leaf::Text(s)),
        Value::Bool(_) | Value::Number(_) => leaf_is_empty(Leaf::Other),
        Value::Object(nested) => nested.iter().all(|(_, v)| is_empty(v)),
        Value::Array(items) => items.iter().all(is_empty),
    }
}

/// Drop empty entries, strip whitespace from strings, stringify booleans.
pub fn clean(flattened: &FlattenedEntries) -> CleanedEntries {
    let cleaned = flattened
        .iter()
        .filter_map(|(key, scalar)| clean_scalar(scalar).map(|v| (key.clone(), v)))
        .collect();
    CleanedEntries(cleaned)
}

fn clean_scalar(scalar: &Scalar) -> Option<CleanValue> {
    if scalar.is_empty() {
        return None;
    }
    match scalar {
        Scalar::Null => None,
        Scalar::Bool(b) => Some(CleanValue::Text(b.to_string())),
        Scalar::Number(n) => Some(CleanValue::Number(n.clone())),
        Scalar::String(s) => Some(CleanValue::Text(strip_whitespace(s))),
    }
}

/// Order entries by byte-wise comparison of their paths.
pub fn sort(cleaned: &CleanedEntries) -> SortedEntries {
    let mut entries: Vec<(String, CleanValue)> = cleaned
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    entries.sort_by(|(a, _), (b, _)| a.as_bytes().cmp(b.as_bytes()));
    SortedEntries(entries)
}

/// Render sorted entries as `key=value` pairs joined by `&`.
pub fn serialize(sorted: &SortedEntries) -> SigningString {
    let pairs: Vec<String> = sorted.iter().map(|(k, v)| format!("{k}={v}")).collect();
    SigningString(pairs.join(PAIR_SEPARATOR))
}

/// The full flatten → clean → sort → serialize pipeline.
pub fn signing_string(payload: &Payload) -> SigningString {
    let flattened = flatten(payload, None);
    let cleaned = clean(&flattened);
    let sorted = sort(&cleaned);
    tracing::trace!(
        leaves = flattened.len(),
        kept = sorted.len(),
        "canonicalized webhook payload"
    );
    serialize(&sorted)
}

/// Borrowed view of a leaf, as seen by the emptiness rule.
enum Leaf<'a> {
    Null,
    Text(&'a str),
    Other,
}

/// The single emptiness rule shared by [`is_empty()`] and
/// [`Scalar::is_empty`].
fn leaf_is_empty(leaf: Leaf<'_>) -> bool {
    match leaf {
        Leaf::Null => true,
        Leaf::Text(s) => s.chars().all(is_signing_whitespace),
        Leaf::Other => false,
    }
}

/// ASCII whitespace as matched by a byte-oriented `\s`: space, tab, LF, VT,
/// FF, CR. Unicode spaces such as NBSP are content, not whitespace.
pub fn is_signing_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c')
}

fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !is_signing_whitespace(*c)).collect()
}
