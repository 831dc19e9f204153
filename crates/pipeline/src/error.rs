use quill_document::DocumentError;
use quill_expr::ExpressionError;
use thiserror::Error;

/// A `fragment` entry that does not conform to the expected
/// two-element `[condition, body]` shape.
#[derive(Error, Debug)]
pub enum FragmentError {
    #[error("fragment value must be a two-element [condition, body] array, got {got}")]
    NotAPair { got: String },

    #[error("malformed fragment clause: {detail}")]
    Shape { detail: String },
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("aggregation template is not a stage array")]
    NotAnArray,

    #[error(transparent)]
    Fragment(#[from] FragmentError),

    #[error(transparent)]
    Expression(#[from] ExpressionError),

    #[error(transparent)]
    Document(#[from] DocumentError),
}
