//! Document type: a field-to-value mapping with a reserved id.

use crate::error::{CoreError, CoreResult};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reserved field carrying the engine-assigned document id.
pub const ID_FIELD: &str = "_id";

/// A self-describing record: a mapping from field name to [`Value`].
///
/// Every persisted document carries a reserved `_id` string field,
/// assigned by the engine on insert and unique within its collection.
/// A document arriving in an insert payload may carry `_id` already;
/// the engine overwrites it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(BTreeMap<String, Value>);

impl Document {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a document from JSON source.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MalformedInput`] when the source is not
    /// valid JSON or not a JSON object.
    pub fn parse(source: &str) -> CoreResult<Self> {
        let json: serde_json::Value = serde_json::from_str(source)
            .map_err(|e| CoreError::malformed_input(format!("invalid JSON: {e}")))?;
        Self::from_json(json)
    }

    /// Builds a document from a decoded JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MalformedInput`] when the value is not an object.
    pub fn from_json(json: serde_json::Value) -> CoreResult<Self> {
        match Value::from(json) {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(CoreError::malformed_input(format!(
                "document must be a JSON object, got {}",
                other.kind()
            ))),
        }
    }

    /// Converts the document back into a JSON value.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::from(Value::Object(self.0.clone()))
    }

    /// Returns the value of a field, if present.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Sets a field, returning the previous value if any.
    pub fn insert(&mut self, field: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(field.into(), value)
    }

    /// Returns the document id, if assigned.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        match self.0.get(ID_FIELD) {
            Some(Value::String(id)) => Some(id),
            _ => None,
        }
    }

    /// Stamps the document id, overwriting any existing one.
    pub fn set_id(&mut self, id: impl Into<String>) {
        self.0.insert(ID_FIELD.to_string(), Value::String(id.into()));
    }

    /// Iterates over (field, value) pairs.
    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Number of fields, including `_id` when present.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when the document has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Value)> for Document {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
