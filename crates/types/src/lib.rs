//! Foundation types shared across the quill query templating crates.
//!
//! This crate holds the small vocabulary every other crate speaks:
//! the parameter map a query is rendered against, the placeholder
//! syntax used to reference parameters from templated text, and the
//! query kinds the engine can assemble.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// The name→value mapping a template is rendered against.
///
/// Supplied fresh per render call and never mutated by the engine;
/// values may be scalars or nested documents.
pub type ParameterMap = HashMap<String, Value>;

/// The reserved prefix that marks a parameter reference, both in
/// templated text (`"#name"` string scalars) and inside condition
/// expressions (`#a > #b`).
pub const PLACEHOLDER_PREFIX: char = '#';

/// Returns the parameter name of a placeholder token, or `None` if the
/// token is not placeholder-shaped.
///
/// A token is placeholder-shaped when it is the prefix character
/// followed by a non-empty name. Whether the name actually resolves is
/// up to the caller's `ParameterMap`.
pub fn placeholder_name(token: &str) -> Option<&str> {
    token
        .strip_prefix(PLACEHOLDER_PREFIX)
        .filter(|name| !name.is_empty())
}

/// The two shapes of query this engine renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryKind {
    /// A single query document.
    Plain,
    /// An ordered array of aggregation stage documents.
    Aggregation,
}
