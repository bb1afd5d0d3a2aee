//! Dynamic document value type.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A dynamic value stored inside a document.
///
/// `Value` mirrors the JSON data model with integers and floating
/// numbers kept apart: `25` decodes as `Int(25)`, `25.0` as
/// `Float(25.0)`, and the two never compare equal. Equality is
/// structural throughout; ordering exists only through the index
/// key encoding in [`crate::index`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Signed integer (full i64 range).
    Int(i64),
    /// IEEE-754 double-precision number.
    Float(f64),
    /// UTF-8 string.
    String(String),
    /// Array of values.
    Array(Vec<Value>),
    /// Nested mapping from field name to value.
    Object(BTreeMap<String, Value>),
}

impl Value {
    /// Returns the kind of this value as a static name.
    ///
    /// Used in error messages and type-mismatch checks.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    /// Returns true for null, boolean, number, and string values.
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        !matches!(self, Value::Array(_) | Value::Object(_))
    }

    /// Returns the string content if this is a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(fields) => Value::Object(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Int(i) => serde_json::Value::from(i),
            Value::Float(f) => {
                serde_json::Number::from_f64(f).map_or(serde_json::Value::Null, serde_json::Value::Number)
            }
            Value::String(s) => serde_json::Value::String(s),
            Value::Array(items) => {
                serde_json::Value::Array(items.into_iter().map(serde_json::Value::from).collect())
            }
            Value::Object(fields) => serde_json::Value::Object(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_roundtrip() {
        let json = json!({
            "name": "Alice",
            "age": 25,
            "score": 9.5,
            "active": true,
            "tags": ["a", "b"],
            "address": { "city": "London" },
            "extra": null
        });

        let value = Value::from(json.clone());
        let back = serde_json::Value::from(value);
        assert_eq!(back, json);
    }

    #[test]
    fn integers_and_floats_are_distinct() {
        assert_eq!(Value::from(json!(25)), Value::Int(25));
        assert_eq!(Value::from(json!(25.5)), Value::Float(25.5));
        assert_ne!(Value::Int(25), Value::Float(25.0));
    }

    #[test]
    fn equality_is_structural() {
        let a = Value::from(json!({ "x": [1, 2], "y": "z" }));
        let b = Value::from(json!({ "y": "z", "x": [1, 2] }));
        assert_eq!(a, b);

        let c = Value::from(json!({ "x": [2, 1], "y": "z" }));
        assert_ne!(a, c);
    }

    #[test]
    fn serde_untagged_decode() {
        let value: Value = serde_json::from_str("42").unwrap();
        assert_eq!(value, Value::Int(42));

        let value: Value = serde_json::from_str("4.5").unwrap();
        assert_eq!(value, Value::Float(4.5));

        let value: Value = serde_json::from_str("null").unwrap();
        assert_eq!(value, Value::Null);
    }

    #[test]
    fn kind_names() {
        assert_eq!(Value::Null.kind(), "null");
        assert_eq!(Value::Array(vec![]).kind(), "array");
        assert_eq!(Value::Object(BTreeMap::new()).kind(), "object");
        assert!(Value::Int(1).is_scalar());
        assert!(!Value::Array(vec![]).is_scalar());
    }
}
