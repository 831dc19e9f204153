//! Pins the per-variant expression semantics that materially change
//! rendered output, especially around parameters that are absent from
//! the map.

mod common;

use common::{init_logging, params};
use quill::{EvaluatorKind, ExpressionError, ParameterMap, evaluator_for};
use serde_json::json;

#[test]
fn absent_parameter_compares_as_null_in_both_variants() {
    init_logging();
    let p = ParameterMap::new();
    for kind in [EvaluatorKind::Simple, EvaluatorKind::Reflective] {
        let evaluator = evaluator_for(kind);
        assert!(!evaluator.evaluate("#missing > 0", &p).unwrap(), "{kind:?}");
        assert!(!evaluator.evaluate("#missing < 0", &p).unwrap(), "{kind:?}");
        assert!(evaluator.evaluate("#missing == null", &p).unwrap(), "{kind:?}");
    }
}

#[test]
fn bare_absent_parameter_splits_the_variants() {
    let p = ParameterMap::new();

    // The simple variant refuses a non-boolean in boolean position.
    assert!(matches!(
        evaluator_for(EvaluatorKind::Simple).evaluate("#missing", &p),
        Err(ExpressionError::NotBoolean { .. })
    ));

    // The reflective variant coerces null to false.
    assert!(!evaluator_for(EvaluatorKind::Reflective)
        .evaluate("#missing", &p)
        .unwrap());
}

#[test]
fn blank_expressions_are_rejected_by_both_variants() {
    for kind in [EvaluatorKind::Simple, EvaluatorKind::Reflective] {
        assert!(matches!(
            evaluator_for(kind).evaluate("  ", &ParameterMap::new()),
            Err(ExpressionError::Blank)
        ));
    }
}

#[test]
fn reflective_grammar_is_a_superset() {
    let p = params(&[(
        "order",
        json!({ "lines": [ { "qty": 3 } ], "customer": "Acme" }),
    )]);
    let reflective = evaluator_for(EvaluatorKind::Reflective);
    assert!(reflective.evaluate("#order.lines[0].qty * 2 == 6", &p).unwrap());
    assert!(reflective.evaluate("contains(lower(#order.customer), 'acme')", &p).unwrap());

    // The same expressions fail to parse under the simple grammar.
    let simple = evaluator_for(EvaluatorKind::Simple);
    for expression in ["#order.lines[0].qty * 2 == 6", "contains(#order.customer, 'x')"] {
        assert!(matches!(
            simple.evaluate(expression, &p),
            Err(ExpressionError::Parse { .. })
        ));
    }
}

#[test]
fn non_boolean_results_are_errors_in_the_simple_variant() {
    let p = params(&[("n", json!(7)), ("s", json!("text"))]);
    let simple = evaluator_for(EvaluatorKind::Simple);
    for expression in ["#n", "#s", "'literal'", "3.5"] {
        assert!(
            matches!(
                simple.evaluate(expression, &p),
                Err(ExpressionError::NotBoolean { .. })
            ),
            "expected NotBoolean for {expression:?}"
        );
    }
}

#[test]
fn reflective_truthiness_is_documented_behavior() {
    let p = params(&[("n", json!(7)), ("zero", json!(0)), ("s", json!("text"))]);
    let reflective = evaluator_for(EvaluatorKind::Reflective);
    assert!(reflective.evaluate("#n", &p).unwrap());
    assert!(!reflective.evaluate("#zero", &p).unwrap());
    assert!(reflective.evaluate("#s", &p).unwrap());
}
