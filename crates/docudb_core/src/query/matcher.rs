//! Condition evaluation against documents.

use crate::document::Document;
use crate::value::Value;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Evaluates a condition mapping: every entry must hold (implicit AND).
pub(crate) fn matches(conditions: &BTreeMap<String, Value>, doc: &Document) -> bool {
    conditions.iter().all(|(key, predicate)| match key.as_str() {
        "$and" => sub_conditions(predicate).is_some_and(|subs| {
            subs.into_iter().all(|conditions| matches(conditions, doc))
        }),
        "$or" => sub_conditions(predicate).is_some_and(|subs| {
            subs.into_iter().any(|conditions| matches(conditions, doc))
        }),
        // Unknown logical operators never match.
        _ if key.starts_with('$') => false,
        field => match_field(doc.get(field), predicate),
    })
}

/// Extracts the condition objects under a logical operator.
fn sub_conditions(value: &Value) -> Option<Vec<&BTreeMap<String, Value>>> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Object(conditions) => Some(conditions),
                _ => None,
            })
            .collect(),
        _ => None,
    }
}

/// Evaluates one field predicate against the (possibly absent) value.
fn match_field(value: Option<&Value>, predicate: &Value) -> bool {
    match predicate {
        Value::Object(ops) if is_comparator_object(ops) => ops
            .iter()
            .all(|(op, operand)| apply_comparator(value, op, operand)),
        literal => match value {
            Some(value) => value == literal,
            None => false,
        },
    }
}

/// A non-empty mapping whose keys all start with `$` is a comparator
/// set; anything else is a literal compared for deep equality.
fn is_comparator_object(ops: &BTreeMap<String, Value>) -> bool {
    !ops.is_empty() && ops.keys().all(|op| op.starts_with('$'))
}

fn apply_comparator(value: Option<&Value>, op: &str, operand: &Value) -> bool {
    match op {
        "$eq" => match value {
            Some(value) => value == operand,
            // An absent field satisfies equality with null only.
            None => matches!(operand, Value::Null),
        },
        "$gt" => compare(value, operand) == Some(Ordering::Greater),
        "$gte" => matches!(
            compare(value, operand),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        "$lt" => compare(value, operand) == Some(Ordering::Less),
        "$lte" => matches!(
            compare(value, operand),
            Some(Ordering::Less | Ordering::Equal)
        ),
        "$in" => match (value, operand) {
            (Some(value), Value::Array(candidates)) => candidates.contains(value),
            _ => false,
        },
        "$like" => match (value, operand) {
            (Some(Value::String(text)), Value::String(pattern)) => like_match(text, pattern),
            _ => false,
        },
        _ => false,
    }
}

/// Orders two values of the same kind; mismatched kinds (and absent
/// fields) do not compare, which makes the enclosing predicate false.
fn compare(value: Option<&Value>, operand: &Value) -> Option<Ordering> {
    match (value?, operand) {
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// SQL-style pattern match, anchored at both ends.
///
/// `%` matches any run of characters (possibly empty), `_` exactly one.
fn like_match(text: &str, pattern: &str) -> bool {
    let text: Vec<char> = text.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();

    let mut ti = 0;
    let mut pi = 0;
    // Last `%` seen: position after it, and the text position to retry from.
    let mut backtrack: Option<(usize, usize)> = None;

    while ti < text.len() {
        if pi < pattern.len() && (pattern[pi] == '_' || pattern[pi] == text[ti]) {
            ti += 1;
            pi += 1;
        } else if pi < pattern.len() && pattern[pi] == '%' {
            backtrack = Some((pi + 1, ti));
            pi += 1;
        } else if let Some((after_percent, from)) = backtrack {
            // Let the last `%` swallow one more character and retry.
            pi = after_percent;
            ti = from + 1;
            backtrack = Some((after_percent, from + 1));
        } else {
            return false;
        }
    }

    while pi < pattern.len() && pattern[pi] == '%' {
        pi += 1;
    }
    pi == pattern.len()
}
