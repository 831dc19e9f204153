//! The richer, reflective evaluator variant.
use crate::ExpressionEvaluator;
use crate::ast::Expr;
use crate::error::ExpressionError;
use crate::eval::Interp;
use crate::functions::FunctionRegistry;
use crate::parser::parse_reflective;
use quill_types::ParameterMap;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Evaluates conditions under the reflective grammar: everything the
/// simple variant has, plus arithmetic, navigation paths into
/// structured parameter values (`#user.address.city`, `#items[0]`) and
/// a case-insensitive registry of built-in functions.
///
/// Absent-parameter semantics: a missing parameter or a dead-end path
/// resolves to null, and null in boolean position coerces to false
/// (truthiness: null→false, number→nonzero, string/container→nonempty).
///
/// The instance keeps a parsed-expression cache behind a mutex. The
/// lock is scoped to the cache lookup inside a single `evaluate` call
/// and never held across evaluation, so one instance is safe to share
/// between concurrent renders.
pub struct ReflectiveEvaluator {
    functions: FunctionRegistry,
    cache: Mutex<HashMap<String, Arc<Expr>>>,
}

impl ReflectiveEvaluator {
    /// Creates an evaluator with the built-in function set.
    pub fn new() -> Self {
        Self::with_functions(FunctionRegistry::default())
    }

    /// Creates an evaluator with a caller-assembled function registry.
    pub fn with_functions(functions: FunctionRegistry) -> Self {
        Self {
            functions,
            cache: Mutex::new(HashMap::new()),
        }
    }

    fn parsed(&self, expression: &str) -> Result<Arc<Expr>, ExpressionError> {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(ast) = cache.get(expression) {
            return Ok(Arc::clone(ast));
        }
        let ast = Arc::new(parse_reflective(expression)?);
        cache.insert(expression.to_string(), Arc::clone(&ast));
        Ok(ast)
    }
}

impl Default for ReflectiveEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpressionEvaluator for ReflectiveEvaluator {
    fn evaluate(&self, expression: &str, parameters: &ParameterMap) -> Result<bool, ExpressionError> {
        let trimmed = expression.trim();
        if trimmed.is_empty() {
            return Err(ExpressionError::Blank);
        }
        let ast = self.parsed(trimmed)?;
        Interp {
            expression: trimmed,
            parameters,
            functions: Some(&self.functions),
            strict_bool: false,
        }
        .eval_condition(&ast)
    }
}
