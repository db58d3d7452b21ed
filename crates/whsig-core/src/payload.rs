//! # Payload Model — Tagged JSON-Like Document Tree
//!
//! Defines `Payload`, the insertion-ordered root mapping of a webhook event,
//! and `Value`, the closed set of node variants it may contain.
//!
//! ## Boundary Invariant
//!
//! Every value inside a `Payload` is one of the six `Value` variants, so the
//! canonicalization stages are exhaustive `match`es with no fallback arm.
//! Anything that cannot be expressed as a `Value` is rejected here, at the
//! conversion boundary, with `CanonicalizationError::InvalidPayload`.
//!
//! Object keys keep document order (`IndexMap`, and `serde_json` is built
//! with `preserve_order`). Flattening walks that order; sorting later
//! discards it.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Number;

use crate::error::CanonicalizationError;

/// A single node in a webhook payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// JSON `null`.
    Null,
    /// JSON `true` / `false`.
    Bool(bool),
    /// A finite JSON number. `serde_json::Number` cannot hold NaN or infinity.
    Number(Number),
    /// A JSON string.
    String(String),
    /// A nested mapping.
    Object(Payload),
    /// An ordered sequence.
    Array(Vec<Value>),
}

impl Value {
    /// Short name of the variant, used in error messages instead of contents.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Object(_) => "object",
            Self::Array(_) => "array",
        }
    }

    /// Build a number value from a float. Returns `None` for NaN or infinity.
    pub fn from_f64(f: f64) -> Option<Self> {
        Number::from_f64(f).map(Self::Number)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(n),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::Array(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(map) => Self::Object(Payload::from_json_map(map)),
        }
    }
}

impl From<&serde_json::Value> for Value {
    fn from(value: &serde_json::Value) -> Self {
        Self::from(value.clone())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Self::Number(n.into())
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(n.into())
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Self::Number(n)
    }
}

impl From<Payload> for Value {
    fn from(p: Payload) -> Self {
        Self::Object(p)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::Array(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Null, Into::into)
    }
}

/// The root of a webhook event: an insertion-ordered mapping from string
/// keys to [`Value`]s.
///
/// Canonicalization only ever borrows a `Payload`; derived structures are
/// built fresh and the caller's document is never mutated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Payload(IndexMap<String, Value>);

impl Payload {
    /// Create an empty payload.
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Insert a key. Re-inserting an existing key replaces its value and
    /// keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Look up a top-level key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Number of top-level keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the payload has no keys.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.0.iter()
    }

    /// Build a payload from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError::InvalidPayload` if serialization fails
    /// (for example a map with non-string keys) or if the value does not
    /// serialize to a JSON object.
    pub fn from_serialize(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        Self::try_from(value)
    }

    fn from_json_map(map: serde_json::Map<String, serde_json::Value>) -> Self {
        map.into_iter().map(|(k, v)| (k, Value::from(v))).collect()
    }
}

impl TryFrom<serde_json::Value> for Payload {
    type Error = CanonicalizationError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        match value {
            serde_json::Value::Object(map) => Ok(Self::from_json_map(map)),
            other => Err(CanonicalizationError::InvalidPayload(format!(
                "root must be an object, got {}",
                json_kind(&other)
            ))),
        }
    }
}

impl TryFrom<&serde_json::Value> for Payload {
    type Error = CanonicalizationError;

    fn try_from(value: &serde_json::Value) -> Result<Self, Self::Error> {
        match value {
            serde_json::Value::Object(map) => Ok(Self::from_json_map(map.clone())),
            other => Err(CanonicalizationError::InvalidPayload(format!(
                "root must be an object, got {}",
                json_kind(other)
            ))),
        }
    }
}

/// Variant name of an unconverted JSON value.
fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Payload {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<'a> IntoIterator for &'a Payload {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn test_try_from_object_keeps_document_order() {
        let payload = Payload::try_from(json!({"z": 1, "a": 2, "m": 3})).unwrap();
        let keys: Vec<&str> = payload.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_try_from_rejects_non_object_root() {
        for root in [json!([1, 2]), json!("x"), json!(null), json!(3), json!(true)] {
            let err = Payload::try_from(&root).unwrap_err();
            let CanonicalizationError::InvalidPayload(msg) = err;
            assert!(msg.starts_with("root must be an object"), "{msg}");
        }
    }

    #[test]
    fn test_from_serialize_struct() {
        #[derive(Serialize)]
        struct Event {
            id: &'static str,
            attempt: u32,
        }
        let payload = Payload::from_serialize(&Event {
            id: "evt_1",
            attempt: 2,
        })
        .unwrap();
        assert_eq!(payload.get("id"), Some(&Value::String("evt_1".into())));
        assert_eq!(payload.get("attempt"), Some(&Value::from(2i64)));
    }

    #[test]
    fn test_from_serialize_non_string_keys_rejected() {
        let mut map = HashMap::new();
        map.insert((1, 2), "tuple key");
        let err = Payload::from_serialize(&map).unwrap_err();
        assert!(matches!(err, CanonicalizationError::InvalidPayload(_)));
    }

    #[test]
    fn test_rejected_root_names_kind() {
        let root = json!([1, 2, 3]);
        let CanonicalizationError::InvalidPayload(msg) = Payload::try_from(&root).unwrap_err();
        assert_eq!(msg, "root must be an object, got array");
        for (value, kind) in [(json!(null), "null"), (json!(1), "number"), (json!("s"), "string")] {
            assert_eq!(json_kind(&value), kind);
            assert_eq!(json_kind(&value), Value::from(&value).kind());
        }
    }

    #[test]
    fn test_reinsert_keeps_position() {
        let mut payload = Payload::new();
        payload.insert("a", 1i64);
        payload.insert("b", 2i64);
        let previous = payload.insert("a", 3i64);
        assert_eq!(previous, Some(Value::from(1i64)));
        let entries: Vec<(&str, &Value)> = payload.iter().map(|(k, v)| (k.as_str(), v)).collect();
        assert_eq!(
            entries,
            vec![("a", &Value::from(3i64)), ("b", &Value::from(2i64))]
        );
    }

    #[test]
    fn test_value_kinds() {
        assert_eq!(Value::Null.kind(), "null");
        assert_eq!(Value::from(true).kind(), "bool");
        assert_eq!(Value::from(0i64).kind(), "number");
        assert_eq!(Value::from("s").kind(), "string");
        assert_eq!(Value::Object(Payload::new()).kind(), "object");
        assert_eq!(Value::Array(vec![]).kind(), "array");
    }

    #[test]
    fn test_from_f64_rejects_non_finite() {
        assert!(Value::from_f64(f64::NAN).is_none());
        assert!(Value::from_f64(f64::INFINITY).is_none());
        assert_eq!(Value::from_f64(51.5).map(|v| v.kind()), Some("number"));
    }

    #[test]
    fn test_option_none_is_null() {
        let missing: Option<&str> = None;
        assert_eq!(Value::from(missing), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::from("x"));
    }
}
