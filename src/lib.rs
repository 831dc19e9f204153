//! # quill
//!
//! A query templating and document-assembly engine for MongoDB-style
//! stores. Applications declare queries — plain and
//! aggregation-pipeline — as parameterized, conditionally-assembled
//! templates; at request time a template renders against a name→value
//! parameter map into a concrete query document or stage array, ready
//! for execution.
//!
//! The crate is a pure in-memory transformation library:
//! - **template**: the conditional-text AST and its interpreter
//! - **expr**: pluggable boolean-expression evaluators
//! - **document**: parameter substitution and empty-value pruning over
//!   relaxed extended JSON
//! - **pipeline**: aggregation fragment injection and stage assembly
//!
//! Loading declarative definitions, talking to the store, and mapping
//! documents onto domain objects are collaborators' concerns; errors
//! propagate to the caller uncaught, with no retry or logging on their
//! behalf.

// Re-export engine crates
pub use quill_document as document;
pub use quill_expr as expr;
pub use quill_pipeline as pipeline;
pub use quill_template as template;
pub use quill_types as types;

mod definition;
mod engine;
mod error;

// Re-export commonly used types from member crates
pub use quill_expr::{EvaluatorKind, ExpressionError, ExpressionEvaluator, evaluator_for};
pub use quill_template::{
    ConditionNode, IfElseNode, Template, TemplateError, TemplateNode, TextNode,
};
pub use quill_types::{ParameterMap, PLACEHOLDER_PREFIX, QueryKind};

// Re-export from internal modules
pub use definition::QueryDefinition;
pub use engine::{DEFAULT_FALLBACK_QUERY, EngineConfig, QueryEngine, RenderedQuery};
pub use error::QuillError;
