//! Property-based test generators using proptest.

use docudb_core::{Document, Value};
use proptest::prelude::*;

/// Strategy for scalar values that can be encoded as index keys.
///
/// Floats are finite and negative zero is normalized away so that
/// numeric comparison and encoded-byte comparison agree everywhere.
pub fn indexable_value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        finite_float_strategy().prop_map(Value::Float),
        "[a-zA-Z0-9 _-]{0,24}".prop_map(Value::String),
    ]
}

/// Strategy for finite, non-negative-zero floats.
pub fn finite_float_strategy() -> impl Strategy<Value = f64> {
    any::<f64>()
        .prop_filter("finite floats only", |f| f.is_finite())
        .prop_map(|f| if f == 0.0 { 0.0 } else { f })
}

/// Strategy for arbitrary document values, containers included.
pub fn value_strategy() -> impl Strategy<Value = Value> {
    indexable_value_strategy().prop_recursive(3, 24, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,8}", inner, 0..4).prop_map(Value::Object),
        ]
    })
}

/// Strategy for documents with a handful of named fields.
///
/// Field names avoid the reserved `_id`, which the engine assigns.
pub fn document_strategy() -> impl Strategy<Value = Document> {
    prop::collection::btree_map("[a-z][a-z0-9]{0,7}", value_strategy(), 1..6)
        .prop_map(|fields| fields.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn indexable_values_encode(value in indexable_value_strategy()) {
            docudb_core::encode_key(&value).unwrap();
        }

        #[test]
        fn documents_never_carry_an_id(doc in document_strategy()) {
            prop_assert!(doc.id().is_none());
        }
    }
}
