//! Pipeline assembly: fragment injection, per-stage parsing, and the
//! never-empty fallback.
use crate::error::PipelineError;
use crate::inject::inject_fragments;
use log::debug;
use quill_expr::ExpressionEvaluator;
use quill_types::ParameterMap;
use serde_json::Value;

/// Builds the final stage array from aggregation-shaped templated
/// text: fragments are resolved first, then every surviving stage goes
/// through substitution and (optionally) empty pruning.
///
/// A stage that prunes away entirely is dropped. A pipeline left with
/// zero stages falls back to the caller-supplied `fallback` query text
/// as its single stage — execution always sees at least one stage.
pub fn assemble_pipeline(
    text: &str,
    parameters: &ParameterMap,
    escape_empty: bool,
    fallback: &str,
    evaluator: &dyn ExpressionEvaluator,
) -> Result<Vec<Value>, PipelineError> {
    let injected = inject_fragments(text, parameters, evaluator)?;
    let rewrapped = format!("[{injected}]");
    let stages = match quill_document::parse(&rewrapped, parameters, escape_empty)? {
        Value::Array(stages) => stages,
        _ => return Err(PipelineError::NotAnArray),
    };
    if stages.is_empty() {
        debug!("pipeline pruned to zero stages, using fallback query");
        let stage = quill_document::parse(fallback, parameters, false)?;
        return Ok(vec![stage]);
    }
    Ok(stages)
}
