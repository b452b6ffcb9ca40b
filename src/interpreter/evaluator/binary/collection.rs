use std::collections::BTreeMap;

use crate::interpreter::value::core::Value;

/// Merges two mappings. Entries present on both sides with equal values are
/// kept once; on a conflicting key the right-hand value wins.
///
/// # Example
/// ```
/// use std::collections::BTreeMap;
///
/// use quip::interpreter::{evaluator::binary::collection::union, value::core::Value};
///
/// let left = BTreeMap::from([("a".to_string(), Value::Int(1)),
///                            ("b".to_string(), Value::Int(2))]);
/// let right = BTreeMap::from([("b".to_string(), Value::Int(3))]);
///
/// let merged = union(left, right);
/// assert_eq!(merged.get("b"), Some(&Value::Int(3)));
/// assert_eq!(merged.len(), 2);
/// ```
#[must_use]
pub fn union(mut left: BTreeMap<String, Value>,
             right: BTreeMap<String, Value>)
             -> BTreeMap<String, Value> {
    left.extend(right);
    left
}

/// Removes from `left` every element structurally equal to one in `excluded`.
///
/// Order and duplicates of the kept elements are preserved.
#[must_use]
pub fn list_difference(left: Vec<Value>, excluded: &[Value]) -> Vec<Value> {
    left.into_iter()
        .filter(|value| !excluded.contains(value))
        .collect()
}

/// Removes from `left` every entry whose key and value both appear in `right`.
#[must_use]
pub fn map_difference(left: BTreeMap<String, Value>,
                      right: &BTreeMap<String, Value>)
                      -> BTreeMap<String, Value> {
    left.into_iter()
        .filter(|(key, value)| right.get(key) != Some(value))
        .collect()
}
