//! End-to-end tests for creating, evaluating and combining rules

use rulekit_core::parser::ParseError;
use rulekit_core::{
    combine_rules, create_rule, evaluate_rule, AttributeWhitelist, ComparisonOp, EngineConfig,
    Error, LogicalOp, Node, PerformanceImpact, Record, RuleEngine,
};
use serde_json::json;

fn whitelist() -> AttributeWhitelist {
    AttributeWhitelist::new(["age", "department", "salary", "experience"])
}

fn record(value: serde_json::Value) -> Record {
    serde_json::from_value(value).unwrap()
}

#[test]
fn test_create_and_evaluate() {
    let rule = create_rule("age > 30 AND department = 'Sales'", &whitelist()).unwrap();

    assert!(evaluate_rule(&rule, &record(json!({"age": 35, "department": "Sales"}))).unwrap());
    assert!(!evaluate_rule(&rule, &record(json!({"age": 25, "department": "Sales"}))).unwrap());
}

#[test]
fn test_combine_and_evaluate() {
    let rule = combine_rules(&["age > 30", "department = 'Sales'"], &whitelist()).unwrap();

    assert!(evaluate_rule(&rule, &record(json!({"age": 35, "department": "Sales"}))).unwrap());
    assert!(!evaluate_rule(&rule, &record(json!({"age": 25, "department": "Sales"}))).unwrap());
}

#[test]
fn test_incomplete_rule_is_syntax_error() {
    assert!(matches!(
        create_rule("age >", &whitelist()),
        Err(Error::Syntax(_))
    ));
}

#[test]
fn test_unclosed_paren_is_syntax_error() {
    match create_rule("(age > 30 AND department = 'Sales'", &whitelist()) {
        Err(Error::Syntax(ParseError::UnexpectedEof { expected })) => {
            assert_eq!(expected, "closing parenthesis")
        }
        other => panic!("Expected syntax error, got {:?}", other),
    }
}

#[test]
fn test_missing_field_names_field() {
    let rule = create_rule("age > 30", &whitelist()).unwrap();
    match evaluate_rule(&rule, &record(json!({"department": "Sales"}))) {
        Err(Error::MissingField { field }) => assert_eq!(field, "age"),
        other => panic!("Expected missing field, got {:?}", other),
    }
}

#[test]
fn test_parsing_is_deterministic() {
    let text = "((age > 30 AND department = 'Sales') OR (age < 25 AND department = 'Marketing')) AND (salary > 50000 OR experience > 5)";
    let first = create_rule(text, &whitelist()).unwrap();
    let second = create_rule(text, &whitelist()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_connectives_fold_left() {
    let rule = create_rule("age > 1 AND salary > 2 OR experience > 3", &whitelist()).unwrap();
    let expected = Node::or(
        Node::and(
            Node::comparison("age", ComparisonOp::Gt, 1),
            Node::comparison("salary", ComparisonOp::Gt, 2),
        ),
        Node::comparison("experience", ComparisonOp::Gt, 3),
    );
    assert_eq!(rule, expected);

    // Same precedence: the OR is not grouped first
    let data = record(json!({"age": 0, "salary": 0, "experience": 5}));
    assert!(evaluate_rule(&rule, &data).unwrap());
    let data = record(json!({"age": 0, "salary": 5, "experience": 0}));
    assert!(!evaluate_rule(&rule, &data).unwrap());
}

#[test]
fn test_short_circuit_skips_missing_fields() {
    let and_rule = create_rule("age > 30 AND department = 'Sales'", &whitelist()).unwrap();
    assert!(!evaluate_rule(&and_rule, &record(json!({"age": 20}))).unwrap());

    let or_rule = create_rule("age > 30 OR department = 'Sales'", &whitelist()).unwrap();
    assert!(evaluate_rule(&or_rule, &record(json!({"age": 40}))).unwrap());
}

#[test]
fn test_combine_single_rule_is_identity() {
    let text = "age > 30 OR salary < 1000";
    assert_eq!(
        combine_rules(&[text], &whitelist()).unwrap(),
        create_rule(text, &whitelist()).unwrap()
    );
}

#[test]
fn test_combine_nothing() {
    let empty: Vec<String> = Vec::new();
    assert!(matches!(combine_rules(&empty, &whitelist()), Err(Error::EmptyInput)));
}

#[test]
fn test_whitelist_enforced() {
    match create_rule("age > 30 AND bonus > 100", &whitelist()) {
        Err(Error::UnknownAttribute { field }) => assert_eq!(field, "bonus"),
        other => panic!("Expected unknown attribute, got {:?}", other),
    }
    let custom = AttributeWhitelist::new(["bonus"]);
    assert!(create_rule("bonus > 100", &custom).is_ok());
}

#[test]
fn test_stray_character_rejected_unless_lenient() {
    assert!(matches!(
        create_rule("age > 30 ;", &whitelist()),
        Err(Error::Syntax(ParseError::UnexpectedCharacter(';')))
    ));

    let engine = RuleEngine::new(EngineConfig {
        lenient_tokens: true,
        ..EngineConfig::default()
    });
    let rule = engine.create_rule("age > 30 ;").unwrap();
    assert_eq!(rule, Node::comparison("age", ComparisonOp::Gt, 30));
}

#[test]
fn test_numeric_literals() {
    assert!(matches!(
        create_rule("salary > 1.2.3", &whitelist()),
        Err(Error::Syntax(ParseError::InvalidLiteral(_)))
    ));
    assert_eq!(
        create_rule("salary > 3.5", &whitelist()).unwrap(),
        Node::comparison("salary", ComparisonOp::Gt, 3.5)
    );
}

#[test]
fn test_long_flat_rules_are_not_nesting() {
    let chain = (0..1000)
        .map(|i| format!("salary > {}", i))
        .collect::<Vec<_>>()
        .join(" AND ");
    let rule = create_rule(&chain, &whitelist()).unwrap();
    assert!(evaluate_rule(&rule, &record(json!({"salary": 1000}))).unwrap());

    let rules: Vec<String> = (0..300).map(|i| format!("age > {}", i)).collect();
    let combined = combine_rules(&rules, &whitelist()).unwrap();
    assert_eq!(combined.comparison_count(), 300);
    assert!(evaluate_rule(&combined, &record(json!({"age": 300}))).unwrap());
    assert!(!evaluate_rule(&combined, &record(json!({"age": 5}))).unwrap());
}

#[test]
fn test_overflowing_float_literal_rejected() {
    let text = format!("salary > {}.0", "1".repeat(400));
    assert!(matches!(
        create_rule(&text, &whitelist()),
        Err(Error::Syntax(ParseError::InvalidLiteral(_)))
    ));
}

#[test]
fn test_type_mismatch() {
    let rule = create_rule("department > 30", &whitelist()).unwrap();
    assert!(matches!(
        evaluate_rule(&rule, &record(json!({"department": "Sales"}))),
        Err(Error::TypeMismatch { .. })
    ));
}

#[test]
fn test_json_floats_and_ints_compare() {
    let rule = create_rule("salary >= 50000 AND experience < 2.5", &whitelist()).unwrap();
    let data = record(json!({"salary": 50000.0, "experience": 2}));
    assert!(evaluate_rule(&rule, &data).unwrap());
}

#[test]
fn test_ast_serializes_as_tagged_json() {
    let rule = create_rule("age > 30 OR department = 'Sales'", &whitelist()).unwrap();
    let value = serde_json::to_value(&rule).unwrap();
    assert_eq!(value["type"], "operator");
    assert_eq!(value["op"], "OR");
    assert_eq!(value["left"]["type"], "comparison");

    let back: Node = serde_json::from_value(value).unwrap();
    assert_eq!(back, rule);
    assert!(matches!(back, Node::Operator { op: LogicalOp::Or, .. }));
}

#[test]
fn test_engine_lint() {
    let engine = RuleEngine::default();
    let report = engine.lint("age > 30 AND bonus > 1 AND age > 30");
    assert!(!report.is_valid);
    assert_eq!(report.errors, vec!["Invalid attribute: bonus"]);
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.performance_impact, PerformanceImpact::Low);
}
