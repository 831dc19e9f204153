//! Parsed query definitions.
//!
//! Definitions arrive from a definition-loading collaborator that has
//! already parsed a declarative source into a template AST; this core
//! never reads declaration files itself.

use quill_template::Template;
use quill_types::QueryKind;
use serde::{Deserialize, Serialize};

/// A named, fully parsed query ready to be executed against parameter
/// maps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryDefinition {
    pub name: String,
    pub kind: QueryKind,
    /// Enables empty-value pruning of the built document(s).
    #[serde(default)]
    pub escape_empty: bool,
    pub template: Template,
    /// Per-definition override of the engine's fallback query text,
    /// used when an aggregation prunes down to zero stages.
    #[serde(default)]
    pub fallback: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_from_loader_output() {
        let json = r##"{
            "name": "open-orders",
            "kind": "aggregation",
            "escapeEmpty": true,
            "template": [
                { "type": "Text", "literal": "[{\"$match\": {\"status\": \"#status\"}}]" }
            ]
        }"##;
        let definition: QueryDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(definition.name, "open-orders");
        assert_eq!(definition.kind, QueryKind::Aggregation);
        assert!(definition.escape_empty);
        assert_eq!(definition.template.len(), 1);
        assert_eq!(definition.fallback, None);
    }
}
