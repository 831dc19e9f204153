use quill_expr::ExpressionError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TemplateError {
    /// A branch condition failed to evaluate; the whole render aborts.
    #[error("condition '{expression}' at template node {node} failed: {source}")]
    Condition {
        node: usize,
        expression: String,
        source: ExpressionError,
    },
}
