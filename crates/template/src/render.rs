//! The template interpreter: folds a template and a parameter map into
//! the templated query string.
use crate::ast::{ConditionNode, IfElseNode, Template, TemplateNode};
use crate::error::TemplateError;
use log::trace;
use quill_expr::ExpressionEvaluator;
use quill_types::ParameterMap;

/// Renders a template against the given parameters, selecting exactly
/// one branch per if/else node.
///
/// Rendering is a pure function of the template, the parameters and the
/// evaluator's semantics. Any expression error aborts the whole render;
/// there is no partial output.
pub fn render(
    template: &Template,
    parameters: &ParameterMap,
    evaluator: &dyn ExpressionEvaluator,
) -> Result<String, TemplateError> {
    let mut out = String::new();
    for (index, node) in template.nodes().iter().enumerate() {
        match node {
            TemplateNode::Text(text) => out.push_str(&text.literal),
            TemplateNode::Condition(branch) => {
                if holds(branch, parameters, evaluator, index)? {
                    out.push_str(&branch.literal);
                }
            }
            TemplateNode::IfElse(node) => {
                if let Some(literal) = select_branch(node, parameters, evaluator, index)? {
                    out.push_str(literal);
                }
            }
        }
    }
    Ok(out)
}

/// Picks the contributing branch of an if/else node: the if branch,
/// the first true else-if in declared order, the else branch, or none.
fn select_branch<'t>(
    node: &'t IfElseNode,
    parameters: &ParameterMap,
    evaluator: &dyn ExpressionEvaluator,
    index: usize,
) -> Result<Option<&'t str>, TemplateError> {
    if holds(&node.if_branch, parameters, evaluator, index)? {
        trace!("node {index}: if branch selected");
        return Ok(Some(&node.if_branch.literal));
    }
    for branch in &node.else_if_branches {
        if holds(branch, parameters, evaluator, index)? {
            trace!("node {index}: else-if '{}' selected", branch.expression);
            return Ok(Some(&branch.literal));
        }
    }
    Ok(node.else_branch.as_ref().map(|text| {
        trace!("node {index}: else branch selected");
        text.literal.as_str()
    }))
}

fn holds(
    branch: &ConditionNode,
    parameters: &ParameterMap,
    evaluator: &dyn ExpressionEvaluator,
    index: usize,
) -> Result<bool, TemplateError> {
    evaluator
        .evaluate(&branch.expression, parameters)
        .map_err(|source| TemplateError::Condition {
            node: index,
            expression: branch.expression.clone(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{IfElseNode, TextNode};
    use quill_expr::SimpleEvaluator;
    use serde_json::json;

    fn params(pairs: &[(&str, serde_json::Value)]) -> ParameterMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn gt_lt_template(with_else: bool) -> Template {
        let mut builder = IfElseNode::builder(ConditionNode::new("#a>#b", "a gt b"))
            .else_if(ConditionNode::new("#a<#b", "a lt b"));
        if with_else {
            builder = builder.otherwise(TextNode::new("a eq b"));
        }
        Template::new([
            TemplateNode::text("start,"),
            TemplateNode::from(builder.build()),
            TemplateNode::text("end"),
        ])
    }

    #[test]
    fn literal_only_template_ignores_parameters() {
        let template = Template::new([
            TemplateNode::text("{\"find\":"),
            TemplateNode::text("\"orders\"}"),
        ]);
        let evaluator = SimpleEvaluator::new();
        let empty = ParameterMap::new();
        let loaded = params(&[("a", json!(1))]);
        assert_eq!(render(&template, &empty, &evaluator).unwrap(), "{\"find\":\"orders\"}");
        assert_eq!(render(&template, &loaded, &evaluator).unwrap(), "{\"find\":\"orders\"}");
    }

    #[test]
    fn empty_template_renders_empty_string() {
        let evaluator = SimpleEvaluator::new();
        assert_eq!(
            render(&Template::empty(), &ParameterMap::new(), &evaluator).unwrap(),
            ""
        );
    }

    #[test]
    fn if_branch_wins() {
        let evaluator = SimpleEvaluator::new();
        let rendered = render(&gt_lt_template(true), &params(&[("a", json!(2)), ("b", json!(1))]), &evaluator)
            .unwrap();
        assert_eq!(rendered, "start,a gt bend");
    }

    #[test]
    fn else_if_branch_wins() {
        let evaluator = SimpleEvaluator::new();
        let rendered = render(&gt_lt_template(true), &params(&[("a", json!(0)), ("b", json!(1))]), &evaluator)
            .unwrap();
        assert_eq!(rendered, "start,a lt bend");
    }

    #[test]
    fn else_branch_wins_when_nothing_matches() {
        let evaluator = SimpleEvaluator::new();
        let rendered = render(&gt_lt_template(true), &params(&[("a", json!(1)), ("b", json!(1))]), &evaluator)
            .unwrap();
        assert_eq!(rendered, "start,a eq bend");
    }

    #[test]
    fn no_else_contributes_empty_string() {
        let evaluator = SimpleEvaluator::new();
        let rendered = render(&gt_lt_template(false), &params(&[("a", json!(1)), ("b", json!(1))]), &evaluator)
            .unwrap();
        // Adjacent literals stay exactly as written, no separator is
        // inserted or removed.
        assert_eq!(rendered, "start,end");
    }

    #[test]
    fn standalone_condition_contributes_iff_true() {
        let template = Template::new([
            TemplateNode::text("a"),
            TemplateNode::condition("#flag == true", "-included-"),
            TemplateNode::text("z"),
        ]);
        let evaluator = SimpleEvaluator::new();
        assert_eq!(
            render(&template, &params(&[("flag", json!(true))]), &evaluator).unwrap(),
            "a-included-z"
        );
        assert_eq!(
            render(&template, &params(&[("flag", json!(false))]), &evaluator).unwrap(),
            "az"
        );
    }

    #[test]
    fn expression_error_aborts_render_and_names_the_node() {
        let template = Template::new([
            TemplateNode::text("start,"),
            TemplateNode::condition("#a >", "broken"),
        ]);
        let evaluator = SimpleEvaluator::new();
        let err = render(&template, &ParameterMap::new(), &evaluator).unwrap_err();
        let TemplateError::Condition { node, expression, .. } = err;
        assert_eq!(node, 1);
        assert_eq!(expression, "#a >");
    }

    #[test]
    fn short_circuits_on_first_true_branch() {
        // The later branch is malformed; it must never be evaluated
        // once an earlier branch matched.
        let node = IfElseNode::builder(ConditionNode::new("#a == 1", "one"))
            .else_if(ConditionNode::new("#a >", "broken"))
            .build();
        let template = Template::new([TemplateNode::from(node)]);
        let evaluator = SimpleEvaluator::new();
        assert_eq!(
            render(&template, &params(&[("a", json!(1))]), &evaluator).unwrap(),
            "one"
        );
    }
}
