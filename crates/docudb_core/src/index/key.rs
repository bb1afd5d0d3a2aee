//! Total-order byte encoding for index keys.
//!
//! Each encoded key starts with a one-byte type tag, so values of
//! different kinds group by kind before comparing by content:
//!
//! ```text
//! null=0  false=1  true=2  integer=3  float=4  string=5
//! ```
//!
//! Integers and floats are massaged so that lexicographic byte
//! comparison equals numeric comparison; strings carry their raw UTF-8
//! bytes with no length prefix, so equal prefixes sort by length.
//! Arrays and mappings are not indexable.

use crate::error::{CoreError, CoreResult};
use crate::value::Value;

const TAG_NULL: u8 = 0;
const TAG_FALSE: u8 = 1;
const TAG_TRUE: u8 = 2;
const TAG_INT: u8 = 3;
const TAG_FLOAT: u8 = 4;
const TAG_STRING: u8 = 5;

/// Returns sentinel keys bracketing every encoded key of the value's
/// kind, for kinds with a defined order (integer, float, string).
///
/// The lower sentinel is the bare tag byte, which sorts at or before
/// every key of that kind; the upper sentinel is the next tag byte,
/// which sorts after all of them. Used by the planner to keep range
/// probes inside one kind.
pub(crate) fn kind_bounds(value: &Value) -> Option<(Vec<u8>, Vec<u8>)> {
    let tag = match value {
        Value::Int(_) => TAG_INT,
        Value::Float(_) => TAG_FLOAT,
        Value::String(_) => TAG_STRING,
        _ => return None,
    };
    Some((vec![tag], vec![tag + 1]))
}

/// Encodes a scalar value as a total-order B+tree key.
///
/// # Errors
///
/// Returns [`CoreError::UnsupportedKey`] for arrays and objects.
pub fn encode_key(value: &Value) -> CoreResult<Vec<u8>> {
    match value {
        Value::Null => Ok(vec![TAG_NULL]),
        Value::Bool(false) => Ok(vec![TAG_FALSE]),
        Value::Bool(true) => Ok(vec![TAG_TRUE]),
        Value::Int(i) => {
            let mut key = Vec::with_capacity(9);
            key.push(TAG_INT);
            // Flipping the sign bit makes big-endian bytes sort numerically.
            key.extend_from_slice(&((*i as u64) ^ (1 << 63)).to_be_bytes());
            Ok(key)
        }
        Value::Float(f) => {
            let bits = f.to_bits();
            // Negative floats sort reversed in raw IEEE-754 bits: invert
            // all 64 bits for negatives, flip only the sign bit otherwise.
            let sortable = if bits & (1 << 63) != 0 {
                !bits
            } else {
                bits ^ (1 << 63)
            };
            let mut key = Vec::with_capacity(9);
            key.push(TAG_FLOAT);
            key.extend_from_slice(&sortable.to_be_bytes());
            Ok(key)
        }
        Value::String(s) => {
            let mut key = Vec::with_capacity(1 + s.len());
            key.push(TAG_STRING);
            key.extend_from_slice(s.as_bytes());
            Ok(key)
        }
        Value::Array(_) | Value::Object(_) => Err(CoreError::UnsupportedKey {
            kind: value.kind(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enc(value: Value) -> Vec<u8> {
        encode_key(&value).unwrap()
    }

    #[test]
    fn integer_order_matches_numeric_order() {
        let values = [i64::MIN, -1_000_000, -1, 0, 1, 42, 1_000_000, i64::MAX];
        for pair in values.windows(2) {
            assert!(
                enc(Value::Int(pair[0])) < enc(Value::Int(pair[1])),
                "{} should encode below {}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn float_order_matches_numeric_order() {
        let values = [-1.0e9, -2.5, -0.1, 0.0, 0.1, 1.5, 2.5, 1.0e9];
        for pair in values.windows(2) {
            assert!(
                enc(Value::Float(pair[0])) < enc(Value::Float(pair[1])),
                "{} should encode below {}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn string_order_is_lexicographic() {
        assert!(enc("apple".into()) < enc("banana".into()));
        assert!(enc("app".into()) < enc("apple".into()));
        assert!(enc("".into()) < enc("a".into()));
    }

    #[test]
    fn type_tags_partition_kinds() {
        // null < false < true < any int < any float < any string
        assert!(enc(Value::Null) < enc(Value::Bool(false)));
        assert!(enc(Value::Bool(false)) < enc(Value::Bool(true)));
        assert!(enc(Value::Bool(true)) < enc(Value::Int(i64::MIN)));
        assert!(enc(Value::Int(i64::MAX)) < enc(Value::Float(f64::MIN)));
        assert!(enc(Value::Float(f64::MAX)) < enc("".into()));
    }

    #[test]
    fn encoding_is_stable() {
        assert_eq!(enc(Value::Int(25)), enc(Value::Int(25)));
        assert_eq!(enc(Value::Null), vec![0]);
        assert_eq!(enc(Value::Bool(true)), vec![2]);
    }

    #[test]
    fn containers_are_rejected() {
        let err = encode_key(&Value::Array(vec![Value::Int(1)])).unwrap_err();
        assert!(matches!(err, CoreError::UnsupportedKey { kind: "array" }));

        let err = encode_key(&Value::Object(Default::default())).unwrap_err();
        assert!(matches!(err, CoreError::UnsupportedKey { kind: "object" }));
    }
}
