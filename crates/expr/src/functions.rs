//! Defines the registry and built-in implementations for the functions
//! available to the reflective evaluator.
use crate::value::coerce_string;
use serde_json::{Value, json};
use std::collections::HashMap;

/// The signature for a custom expression function implementation.
///
/// Functions are total: bad arguments produce null or false rather than
/// aborting the render.
pub type ExprFunction = fn(args: Vec<Value>) -> Value;

/// A registry to hold all available functions for the reflective
/// evaluator.
pub struct FunctionRegistry {
    functions: HashMap<String, ExprFunction>,
}

impl FunctionRegistry {
    /// Creates a new, empty function registry.
    pub fn new() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    /// Registers a new function.
    pub fn register(&mut self, name: &str, func: ExprFunction) {
        self.functions.insert(name.to_lowercase(), func);
    }

    /// Finds a function by name (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&ExprFunction> {
        self.functions.get(&name.to_lowercase())
    }
}

// --- Built-in Function Implementations ---

fn upper(args: Vec<Value>) -> Value {
    args.first()
        .and_then(|v| v.as_str())
        .map(|s| s.to_uppercase().into())
        .unwrap_or(Value::Null)
}

fn lower(args: Vec<Value>) -> Value {
    args.first()
        .and_then(|v| v.as_str())
        .map(|s| s.to_lowercase().into())
        .unwrap_or(Value::Null)
}

fn concat(args: Vec<Value>) -> Value {
    args.iter().map(coerce_string).collect::<String>().into()
}

fn contains(args: Vec<Value>) -> Value {
    let haystack = args.first().and_then(|v| v.as_str());
    let needle = args.get(1).and_then(|v| v.as_str());
    match (haystack, needle) {
        (Some(h), Some(n)) => h.contains(n).into(),
        _ => false.into(),
    }
}

fn count(args: Vec<Value>) -> Value {
    args.first()
        .and_then(|v| v.as_array())
        .map(|arr| json!(arr.len()))
        .unwrap_or(json!(0))
}

fn exists(args: Vec<Value>) -> Value {
    json!(args.first().is_some_and(|v| !v.is_null()))
}

fn len(args: Vec<Value>) -> Value {
    match args.first() {
        Some(Value::String(s)) => json!(s.chars().count()),
        Some(Value::Array(a)) => json!(a.len()),
        Some(Value::Object(o)) => json!(o.len()),
        _ => json!(0),
    }
}

impl Default for FunctionRegistry {
    /// Creates a new registry populated with all built-in functions.
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register("upper", upper);
        registry.register("lower", lower);
        registry.register("concat", concat);
        registry.register("contains", contains);
        registry.register("count", count);
        registry.register("exists", exists);
        registry.register("len", len);
        registry
    }
}
