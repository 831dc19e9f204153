//! Relaxed extended-JSON document parsing with placeholder
//! substitution and empty-value pruning.
//!
//! Templated query text comes out of the template interpreter as a
//! string; this crate turns it into a document tree, splicing
//! parameter values over `#name` placeholders and, per-template,
//! pruning empty clauses so optional filter fields disappear instead
//! of matching the empty string.

pub mod encode;
pub mod error;
mod parser;
mod prune;

use serde_json::Value;

pub use encode::{ScalarEncoder, install_scalar_encoder};
pub use error::DocumentError;
pub use parser::parse;
pub use prune::prune_empty;

/// Serializes a document back to text. Used for pass-through stages in
/// pipeline assembly and for round-trip checks.
pub fn to_text(value: &Value) -> Result<String, DocumentError> {
    Ok(serde_json::to_string(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_types::ParameterMap;
    use serde_json::json;

    fn test_encoder(value: &Value) -> Option<Value> {
        // Coerces marker strings the way an application would render an
        // enum by name.
        let s = value.as_str()?;
        s.strip_prefix("enum:").map(|name| json!(name.to_uppercase()))
    }

    #[test]
    fn install_is_idempotent() {
        install_scalar_encoder(test_encoder);
        // A second install never wins.
        assert!(!install_scalar_encoder(test_encoder));
    }

    #[test]
    fn installed_encoder_applies_to_substituted_scalars() {
        install_scalar_encoder(test_encoder);
        let params: ParameterMap =
            [("status".to_string(), json!("enum:open"))].into_iter().collect();
        let doc = parse(r##"{"status": "#status"}"##, &params, false).unwrap();
        assert_eq!(doc, json!({ "status": "OPEN" }));
    }

    #[test]
    fn encoder_does_not_touch_literal_text() {
        install_scalar_encoder(test_encoder);
        // Only spliced parameter values go through the hook.
        let doc = parse(r#"{"status": "enum:open"}"#, &ParameterMap::new(), false).unwrap();
        assert_eq!(doc, json!({ "status": "enum:open" }));
    }

    #[test]
    fn round_trip_through_to_text() {
        let original = json!({ "a": [1, 2.5, "x"], "b": { "c": null } });
        let text = to_text(&original).unwrap();
        assert_eq!(parse(&text, &ParameterMap::new(), false).unwrap(), original);
    }
}
