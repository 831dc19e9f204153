//! Pluggable boolean condition evaluators for query templates.
//!
//! A template's conditional branches carry condition strings that are
//! evaluated against the render call's parameters. This crate defines
//! the single capability all evaluators share — boolean evaluation
//! against named parameters — and two interchangeable grammars behind
//! it. Callers select a variant by configuration, not by concrete type.

pub mod ast;
pub mod error;
mod eval;
pub mod functions;
mod parser;
pub mod reflective;
pub mod simple;
mod value;

use quill_types::ParameterMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// --- Public API ---
pub use ast::{BinaryOp, Expr, ParamRef, PathSegment, UnaryOp};
pub use error::ExpressionError;
pub use functions::{ExprFunction, FunctionRegistry};
pub use parser::{parse_reflective, parse_simple};
pub use reflective::ReflectiveEvaluator;
pub use simple::SimpleEvaluator;

/// The single capability an evaluator variant provides.
///
/// Implementations must be safe for concurrent invocation from
/// multiple renders: either inherently reentrant, or serializing
/// internally with a lock scoped to the single `evaluate` call. The
/// constraint is never pushed onto callers.
pub trait ExpressionEvaluator: Send + Sync {
    /// Evaluates a condition string against the active parameters.
    ///
    /// Fails when the expression is blank, does not parse under this
    /// variant's grammar, or does not produce a boolean under this
    /// variant's coercion rules.
    fn evaluate(&self, expression: &str, parameters: &ParameterMap) -> Result<bool, ExpressionError>;
}

/// Configuration-selectable evaluator variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvaluatorKind {
    /// [`SimpleEvaluator`]: comparisons and logic only, strict booleans.
    #[default]
    Simple,
    /// [`ReflectiveEvaluator`]: arithmetic, paths, functions, truthiness.
    Reflective,
}

/// Builds the shared evaluator instance for a configured variant.
pub fn evaluator_for(kind: EvaluatorKind) -> Arc<dyn ExpressionEvaluator> {
    match kind {
        EvaluatorKind::Simple => Arc::new(SimpleEvaluator::new()),
        EvaluatorKind::Reflective => Arc::new(ReflectiveEvaluator::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn variants_agree_on_plain_comparisons() {
        let p: ParameterMap = [("a".to_string(), json!(2)), ("b".to_string(), json!(1))]
            .into_iter()
            .collect();
        for kind in [EvaluatorKind::Simple, EvaluatorKind::Reflective] {
            let evaluator = evaluator_for(kind);
            assert!(evaluator.evaluate("#a > #b", &p).unwrap(), "{kind:?}");
            assert!(!evaluator.evaluate("#a < #b", &p).unwrap(), "{kind:?}");
            assert!(evaluator.evaluate("#a == 2 && #b == 1", &p).unwrap(), "{kind:?}");
        }
    }

    #[test]
    fn variants_differ_on_null_in_boolean_position() {
        let p = ParameterMap::new();
        assert!(matches!(
            evaluator_for(EvaluatorKind::Simple).evaluate("#missing", &p),
            Err(ExpressionError::NotBoolean { .. })
        ));
        assert_eq!(
            evaluator_for(EvaluatorKind::Reflective)
                .evaluate("#missing", &p)
                .unwrap(),
            false
        );
    }

    #[test]
    fn kind_deserializes_from_configuration() {
        let kind: EvaluatorKind = serde_json::from_str("\"reflective\"").unwrap();
        assert_eq!(kind, EvaluatorKind::Reflective);
    }
}
