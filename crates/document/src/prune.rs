//! Bottom-up empty-value pruning.
//!
//! A value is empty when it is an empty string, or an object that is
//! empty or whose every field resolves empty. Children are resolved
//! before their parent is judged, so removals cascade upward in a
//! single pass. Arrays shed empty elements but are never judged empty
//! themselves.
use serde_json::{Map, Value};

/// Prunes a value, returning `None` when the value itself is empty and
/// must be removed from its parent.
pub fn prune_empty(value: Value) -> Option<Value> {
    match value {
        Value::String(s) if s.is_empty() => None,
        Value::Object(fields) => {
            let kept: Map<String, Value> = fields
                .into_iter()
                .filter_map(|(key, field)| prune_empty(field).map(|v| (key, v)))
                .collect();
            if kept.is_empty() {
                None
            } else {
                Some(Value::Object(kept))
            }
        }
        Value::Array(items) => Some(Value::Array(
            items.into_iter().filter_map(prune_empty).collect(),
        )),
        other => Some(other),
    }
}

/// Prunes below the root but keeps the root itself, however hollow it
/// ends up. A plain query that prunes to nothing becomes the match-all
/// `{}` rather than disappearing.
pub(crate) fn prune_root(value: Value) -> Value {
    match value {
        Value::Object(fields) => Value::Object(
            fields
                .into_iter()
                .filter_map(|(key, field)| prune_empty(field).map(|v| (key, v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(
            items.into_iter().filter_map(prune_empty).collect(),
        ),
        other => other,
    }
}
