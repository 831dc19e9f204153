//! The fragment injector.
//!
//! Aggregation templates may carry fragment entries among their
//! stages: stage-shaped objects whose reserved `fragment` key holds a
//! `[condition, body]` pair. Injection resolves every fragment at the
//! text level, before any stage is parsed for real: a fragment whose
//! condition holds is replaced by its raw body text at the same
//! position; one that does not hold vanishes. Ordinary stages pass
//! through unchanged.
use crate::error::{FragmentError, PipelineError};
use log::trace;
use quill_expr::ExpressionEvaluator;
use quill_types::ParameterMap;
use serde_json::Value;

/// The reserved key marking a fragment entry.
pub const FRAGMENT_KEY: &str = "fragment";
/// The key carrying the condition string inside a fragment's first clause.
pub const CONDITION_KEY: &str = "condition";
/// The key carrying the raw stage text inside a fragment's second clause.
pub const BODY_KEY: &str = "body";

/// Expands or drops every fragment in aggregation-shaped templated
/// text, returning the comma-joined sequence of surviving stage texts,
/// still unparsed. Relative stage order is preserved.
pub fn inject_fragments(
    text: &str,
    parameters: &ParameterMap,
    evaluator: &dyn ExpressionEvaluator,
) -> Result<String, PipelineError> {
    // Structural parse only: substitution and pruning happen later,
    // when each stage is parsed for real.
    let document = quill_document::parse(text, &ParameterMap::new(), false)?;
    let stages = document.as_array().ok_or(PipelineError::NotAnArray)?;

    let mut parts: Vec<String> = Vec::with_capacity(stages.len());
    for stage in stages {
        match fragment_value(stage)? {
            Some(fragment) => {
                let (condition, body) = fragment_clauses(fragment)?;
                if evaluator.evaluate(condition, parameters)? {
                    trace!("fragment condition '{condition}' held, splicing body");
                    parts.push(body.to_string());
                } else {
                    trace!("fragment condition '{condition}' did not hold, dropping");
                }
            }
            None => parts.push(quill_document::to_text(stage)?),
        }
    }
    Ok(parts.join(","))
}

/// A stage is fragment-shaped when it is an object exposing the
/// reserved key. The key must then stand alone; a fragment with
/// sibling fields is malformed, not a pass-through stage.
fn fragment_value(stage: &Value) -> Result<Option<&Value>, FragmentError> {
    let Some(object) = stage.as_object() else {
        return Ok(None);
    };
    match object.get(FRAGMENT_KEY) {
        Some(fragment) if object.len() == 1 => Ok(Some(fragment)),
        Some(_) => Err(FragmentError::Shape {
            detail: "fragment stage must carry only the 'fragment' field".to_string(),
        }),
        None => Ok(None),
    }
}

/// Validates the `[condition, body]` shape and pulls out both strings.
fn fragment_clauses(fragment: &Value) -> Result<(&str, &str), FragmentError> {
    let pair = fragment.as_array().ok_or_else(|| FragmentError::NotAPair {
        got: kind_of(fragment).to_string(),
    })?;
    if pair.len() != 2 {
        return Err(FragmentError::NotAPair {
            got: format!("an array of {} elements", pair.len()),
        });
    }
    let condition = clause_string(&pair[0], CONDITION_KEY)?;
    let body = clause_string(&pair[1], BODY_KEY)?;
    Ok((condition, body))
}

fn clause_string<'v>(clause: &'v Value, key: &str) -> Result<&'v str, FragmentError> {
    let object = clause.as_object().ok_or_else(|| FragmentError::Shape {
        detail: format!("{key} clause must be an object, got {}", kind_of(clause)),
    })?;
    if object.len() != 1 {
        return Err(FragmentError::Shape {
            detail: format!("{key} clause must carry exactly the '{key}' field"),
        });
    }
    object
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| FragmentError::Shape {
            detail: format!("{key} clause must carry a string '{key}' field"),
        })
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
