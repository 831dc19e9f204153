// src/error.rs
//! Defines the unified error type for all engine operations.

use thiserror::Error;

/// The main error enum for all high-level operations within the engine.
///
/// Every error propagates to the immediate caller of the render/build
/// entry point; nothing is retried or swallowed inside the core, and a
/// failed render produces no document.
#[derive(Error, Debug)]
pub enum QuillError {
    #[error("expression error: {0}")]
    Expression(#[from] quill_expr::ExpressionError),

    #[error("template rendering error: {0}")]
    Template(#[from] quill_template::TemplateError),

    #[error("document parsing error: {0}")]
    Document(#[from] quill_document::DocumentError),

    #[error("pipeline assembly error: {0}")]
    Pipeline(#[from] quill_pipeline::PipelineError),
}
