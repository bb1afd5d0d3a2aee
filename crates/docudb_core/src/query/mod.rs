//! Query parsing and evaluation.
//!
//! A query is a JSON object. Top-level keys are either field names
//! carrying a predicate, or the logical operators `$and` / `$or`
//! carrying arrays of nested condition objects. A predicate is a
//! literal (implicit equality) or a mapping of comparators:
//! `$eq`, `$gt`, `$gte`, `$lt`, `$lte`, `$in`, `$like`.
//!
//! ```text
//! { "age": 25 }
//! { "age": { "$gt": 30 } }
//! { "$or": [ { "city": "Paris" }, { "age": { "$lte": 22 } } ] }
//! ```

mod matcher;

use crate::document::Document;
use crate::error::{CoreError, CoreResult};
use crate::value::Value;
use std::collections::BTreeMap;

/// A parsed query: the top-level condition mapping.
///
/// No validation happens beyond the JSON-object shape; unknown
/// comparators simply never match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    conditions: BTreeMap<String, Value>,
}

impl Query {
    /// The empty query, which matches every document.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parses a query from JSON source.
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

    /// Builds a query from a decoded JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MalformedInput`] when the value is not an object.
    pub fn from_json(json: serde_json::Value) -> CoreResult<Self> {
        match Value::from(json) {
            Value::Object(conditions) => Ok(Self { conditions }),
            other => Err(CoreError::malformed_input(format!(
                "query must be a JSON object, got {}",
                other.kind()
            ))),
        }
    }

    /// The top-level condition mapping.
    #[must_use]
    pub fn conditions(&self) -> &BTreeMap<String, Value> {
        &self.conditions
    }

    /// Decides whether the document satisfies every top-level condition.
    #[must_use]
    pub fn matches(&self, doc: &Document) -> bool {
        matcher::matches(&self.conditions, doc)
    }
}
