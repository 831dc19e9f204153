//! The engine facade: configuration, rendering and document assembly.

use crate::definition::QueryDefinition;
use crate::error::QuillError;
use log::debug;
use quill_expr::{EvaluatorKind, ExpressionEvaluator, evaluator_for};
use quill_template::Template;
use quill_types::{ParameterMap, QueryKind};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// The engine-wide default for aggregations that prune to nothing: a
/// single no-op match stage.
pub const DEFAULT_FALLBACK_QUERY: &str = r#"{ "$match": {} }"#;

/// Configuration for building a [`QueryEngine`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Which expression-evaluator variant condition strings run under.
    pub evaluator: EvaluatorKind,
    /// Fallback plain-query text; [`DEFAULT_FALLBACK_QUERY`] when unset.
    pub fallback_query: Option<String>,
}

/// The result of executing a query definition.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderedQuery {
    /// A plain query document.
    Document(Value),
    /// An aggregation pipeline; always at least one stage.
    Pipeline(Vec<Value>),
}

/// Renders query templates into concrete documents and pipelines.
///
/// The engine's only long-lived state is the shared evaluator
/// instance, so one engine serves concurrent renders from independent
/// caller threads; every render allocates its own document trees,
/// owned by the caller after return.
pub struct QueryEngine {
    evaluator: Arc<dyn ExpressionEvaluator>,
    fallback_query: String,
}

impl QueryEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            evaluator: evaluator_for(config.evaluator),
            fallback_query: config
                .fallback_query
                .unwrap_or_else(|| DEFAULT_FALLBACK_QUERY.to_string()),
        }
    }

    /// Builds an engine around a caller-provided evaluator instance,
    /// for variants beyond the built-in kinds.
    pub fn with_evaluator(
        evaluator: Arc<dyn ExpressionEvaluator>,
        fallback_query: Option<String>,
    ) -> Self {
        Self {
            evaluator,
            fallback_query: fallback_query.unwrap_or_else(|| DEFAULT_FALLBACK_QUERY.to_string()),
        }
    }

    /// Renders a template into its templated query string, resolving
    /// conditional branches against the parameters.
    pub fn render(
        &self,
        template: &Template,
        parameters: &ParameterMap,
    ) -> Result<String, QuillError> {
        Ok(quill_template::render(
            template,
            parameters,
            self.evaluator.as_ref(),
        )?)
    }

    /// Parses templated text into a plain query document, substituting
    /// placeholders and optionally pruning empty clauses.
    pub fn build_document(
        &self,
        text: &str,
        parameters: &ParameterMap,
        escape_empty: bool,
    ) -> Result<Value, QuillError> {
        Ok(quill_document::parse(text, parameters, escape_empty)?)
    }

    /// Assembles aggregation-shaped templated text into a stage array,
    /// resolving fragments first. Never returns an empty pipeline.
    pub fn build_pipeline(
        &self,
        text: &str,
        parameters: &ParameterMap,
        escape_empty: bool,
    ) -> Result<Vec<Value>, QuillError> {
        Ok(quill_pipeline::assemble_pipeline(
            text,
            parameters,
            escape_empty,
            &self.fallback_query,
            self.evaluator.as_ref(),
        )?)
    }

    /// Renders and assembles a full query definition: template to
    /// text, then text to document or pipeline according to the
    /// definition's kind.
    pub fn execute(
        &self,
        definition: &QueryDefinition,
        parameters: &ParameterMap,
    ) -> Result<RenderedQuery, QuillError> {
        let text = self.render(&definition.template, parameters)?;
        debug!(
            "query '{}' rendered to {} bytes of templated text",
            definition.name,
            text.len()
        );
        match definition.kind {
            QueryKind::Plain => Ok(RenderedQuery::Document(self.build_document(
                &text,
                parameters,
                definition.escape_empty,
            )?)),
            QueryKind::Aggregation => {
                let fallback = definition
                    .fallback
                    .as_deref()
                    .unwrap_or(&self.fallback_query);
                let pipeline = quill_pipeline::assemble_pipeline(
                    &text,
                    parameters,
                    definition.escape_empty,
                    fallback,
                    self.evaluator.as_ref(),
                )?;
                debug!(
                    "query '{}' assembled into {} pipeline stages",
                    definition.name,
                    pipeline.len()
                );
                Ok(RenderedQuery::Pipeline(pipeline))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.evaluator, EvaluatorKind::Simple);
        assert_eq!(config.fallback_query, None);
    }

    #[test]
    fn config_selects_variant_by_name() {
        let config: EngineConfig =
            serde_json::from_str(r#"{ "evaluator": "reflective" }"#).unwrap();
        assert_eq!(config.evaluator, EvaluatorKind::Reflective);
    }
}
