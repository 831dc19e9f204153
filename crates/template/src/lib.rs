//! Conditional-text template AST and interpreter.
//!
//! A query template is an ordered sequence of literal-text and
//! conditional nodes. Rendering folds the sequence into a single
//! templated query string, consulting a pluggable expression evaluator
//! to pick exactly one branch per conditional construct.

pub mod ast;
pub mod error;
pub mod render;

pub use ast::{
    ConditionNode, IfElseBuilder, IfElseNode, Template, TemplateNode, TextNode,
};
pub use error::TemplateError;
pub use render::render;
