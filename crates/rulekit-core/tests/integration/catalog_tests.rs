//! Integration tests for the rule catalog lifecycle and its analytics

use rulekit_core::{
    EngineConfig, Error, NewRule, Record, RuleCatalog, RuleEngine, RuleId, RuleUpdate,
};
use serde_json::json;
use std::sync::Arc;

fn record(value: serde_json::Value) -> Record {
    serde_json::from_value(value).unwrap()
}

#[test]
fn test_rule_lifecycle() {
    let catalog = RuleCatalog::default();

    let created = catalog
        .create(NewRule::new("senior sales", "age > 30 AND department = 'Sales'"))
        .unwrap();
    assert_eq!(created.version, 1);
    assert_eq!(catalog.list().len(), 1);

    let updated = catalog
        .update(
            created.id,
            RuleUpdate {
                description: Some("Sales staff over 30".to_string()),
                ..RuleUpdate::default()
            },
        )
        .unwrap();
    assert_eq!(updated.version, 2);
    assert_eq!(updated.created_at, created.created_at);
    assert_eq!(updated.description, "Sales staff over 30");

    let data = record(json!({"age": 35, "department": "Sales"}));
    assert!(catalog.evaluate(created.id, &data).unwrap());

    catalog.delete(created.id).unwrap();
    assert!(matches!(catalog.get(created.id), Err(Error::RuleNotFound(_))));
    assert!(matches!(catalog.delete(created.id), Err(Error::RuleNotFound(_))));
}

#[test]
fn test_update_rejects_invalid_rule_text() {
    let catalog = RuleCatalog::default();
    let rule = catalog.create(NewRule::new("seniors", "age > 30")).unwrap();

    let result = catalog.update(
        rule.id,
        RuleUpdate {
            rule_string: Some("bonus > 30".to_string()),
            ..RuleUpdate::default()
        },
    );
    assert!(matches!(result, Err(Error::UnknownAttribute { .. })));
    assert_eq!(catalog.get(rule.id).unwrap(), rule);
}

#[test]
fn test_catalog_uses_engine_whitelist() {
    let engine = RuleEngine::new(EngineConfig::from_json_str(r#"{"attributes": ["height"]}"#).unwrap());
    let catalog = RuleCatalog::new(Arc::new(engine));

    assert!(catalog.create(NewRule::new("tall", "height > 180")).is_ok());
    assert!(catalog.create(NewRule::new("old", "age > 30")).is_err());
}

#[test]
fn test_combine_by_ids() {
    let catalog = RuleCatalog::default();
    let seniors = catalog.create(NewRule::new("seniors", "age > 30")).unwrap();
    let sales = catalog.create(NewRule::new("sales", "department = 'Sales'")).unwrap();

    let combined = catalog.combine(&[seniors.id, sales.id]).unwrap();
    assert_eq!(combined.to_string(), "(age > 30 AND department = 'Sales')");

    assert!(matches!(
        catalog.combine(&[seniors.id, RuleId(99)]),
        Err(Error::RuleNotFound(RuleId(99)))
    ));
}

#[test]
fn test_analytics_after_evaluations() {
    let catalog = RuleCatalog::default();
    let rule = catalog.create(NewRule::new("seniors", "age > 30")).unwrap();

    for age in [20, 31, 45, 60] {
        catalog.evaluate(rule.id, &record(json!({ "age": age }))).unwrap();
    }

    let report = catalog.report(rule.id).unwrap();
    assert_eq!(report.evaluation_count, 4);
    assert_eq!(report.true_results, 3);
    assert_eq!(report.false_results, 1);
    assert_eq!(report.success_rate, 0.75);
    assert!(report.average_execution_time_ms >= 0.0);
    assert!(report.last_evaluated.is_some());

    assert_eq!(catalog.analytics().all_reports().len(), 1);
    assert!(matches!(catalog.report(RuleId(99)), Err(Error::RuleNotFound(_))));
}

#[test]
fn test_rule_serializes_to_json() {
    let catalog = RuleCatalog::default();
    let rule = catalog
        .create(NewRule::new("seniors", "age > 30").with_description("Older staff"))
        .unwrap();

    let value = serde_json::to_value(&rule).unwrap();
    assert_eq!(value["id"], 1);
    assert_eq!(value["rule_string"], "age > 30");
    assert_eq!(value["version"], 1);
    assert_eq!(value["active"], true);

    let new_rule: NewRule =
        serde_json::from_value(json!({"name": "sales", "rule_string": "department = 'Sales'"}))
            .unwrap();
    assert_eq!(new_rule.description, "");
}

#[test]
fn test_concurrent_creates_get_unique_ids() {
    let catalog = Arc::new(RuleCatalog::default());
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let catalog = catalog.clone();
            std::thread::spawn(move || {
                catalog
                    .create(NewRule::new(format!("rule {}", i), format!("age > {}", i)))
                    .unwrap()
                    .id
            })
        })
        .collect();

    let mut ids: Vec<RuleId> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 8);
    assert_eq!(catalog.len(), 8);
}
