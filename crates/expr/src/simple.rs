//! The lightweight general-purpose evaluator variant.
use crate::ExpressionEvaluator;
use crate::error::ExpressionError;
use crate::eval::Interp;
use crate::parser::parse_simple;
use quill_types::ParameterMap;

/// Evaluates conditions under the simple grammar: literals, bare
/// `#name` parameter references, comparisons, `&&`/`||`/`!` and
/// parentheses. No arithmetic, navigation paths or function calls.
///
/// Absent-parameter semantics: a referenced parameter missing from the
/// map resolves to null. Ordering comparisons against null are false;
/// `== null` / `!= null` test null-ness. A null (or any non-boolean)
/// in boolean position is a [`ExpressionError::NotBoolean`] error
/// rather than silently false.
///
/// Stateless: every call parses the expression afresh, so the instance
/// is inherently reentrant and can be shared across renders.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimpleEvaluator;

impl SimpleEvaluator {
    pub fn new() -> Self {
        Self
    }
}

impl ExpressionEvaluator for SimpleEvaluator {
    fn evaluate(&self, expression: &str, parameters: &ParameterMap) -> Result<bool, ExpressionError> {
        let trimmed = expression.trim();
        if trimmed.is_empty() {
            return Err(ExpressionError::Blank);
        }
        let ast = parse_simple(trimmed)?;
        Interp {
            expression: trimmed,
            parameters,
            functions: None,
            strict_bool: true,
        }
        .eval_condition(&ast)
    }
}
