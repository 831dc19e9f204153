//! Defines the template AST: literal text and conditional branches.
//!
//! Nodes are plain data. A definition-loading collaborator builds them
//! from a declarative source; rendering lives in [`crate::render`].
use serde::{Deserialize, Serialize};

/// Opaque literal content, emitted verbatim when visited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextNode {
    pub literal: String,
}

impl TextNode {
    pub fn new(literal: impl Into<String>) -> Self {
        Self {
            literal: literal.into(),
        }
    }
}

/// Literal content emitted only if `expression` evaluates true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionNode {
    pub expression: String,
    pub literal: String,
}

impl ConditionNode {
    pub fn new(expression: impl Into<String>, literal: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            literal: literal.into(),
        }
    }
}

/// A composite of which exactly one branch contributes output: the if
/// branch, the first matching else-if branch in declared order, or the
/// optional else branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IfElseNode {
    pub if_branch: ConditionNode,
    #[serde(default)]
    pub else_if_branches: Vec<ConditionNode>,
    #[serde(default)]
    pub else_branch: Option<TextNode>,
}

impl IfElseNode {
    /// Starts a builder. The if branch is mandatory; else-if branches
    /// accumulate in declared order; at most one else branch.
    pub fn builder(if_branch: ConditionNode) -> IfElseBuilder {
        IfElseBuilder {
            if_branch,
            else_if_branches: Vec::new(),
            else_branch: None,
        }
    }
}

/// Builder for an [`IfElseNode`].
#[derive(Debug, Clone)]
pub struct IfElseBuilder {
    if_branch: ConditionNode,
    else_if_branches: Vec<ConditionNode>,
    else_branch: Option<TextNode>,
}

impl IfElseBuilder {
    /// Appends an else-if branch; declaration order is evaluation order.
    pub fn else_if(mut self, branch: ConditionNode) -> Self {
        self.else_if_branches.push(branch);
        self
    }

    /// Sets the else branch.
    pub fn otherwise(mut self, text: TextNode) -> Self {
        self.else_branch = Some(text);
        self
    }

    pub fn build(self) -> IfElseNode {
        IfElseNode {
            if_branch: self.if_branch,
            else_if_branches: self.else_if_branches,
            else_branch: self.else_branch,
        }
    }
}

/// A single node of a query template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TemplateNode {
    Text(TextNode),
    Condition(ConditionNode),
    IfElse(IfElseNode),
}

impl TemplateNode {
    pub fn text(literal: impl Into<String>) -> Self {
        TemplateNode::Text(TextNode::new(literal))
    }

    pub fn condition(expression: impl Into<String>, literal: impl Into<String>) -> Self {
        TemplateNode::Condition(ConditionNode::new(expression, literal))
    }
}

impl From<IfElseNode> for TemplateNode {
    fn from(node: IfElseNode) -> Self {
        TemplateNode::IfElse(node)
    }
}

/// An ordered sequence of template nodes. Building with zero nodes is
/// legal and renders to an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Template {
    nodes: Vec<TemplateNode>,
}

impl Template {
    pub fn new(nodes: impl IntoIterator<Item = TemplateNode>) -> Self {
        Self {
            nodes: nodes.into_iter().collect(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[TemplateNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl FromIterator<TemplateNode> for Template {
    fn from_iter<I: IntoIterator<Item = TemplateNode>>(iter: I) -> Self {
        Self::new(iter)
    }
}
