//! Integration tests for loading engine configuration

use rulekit_core::{EngineConfig, Error, RuleEngine};
use std::io::Write;

#[test]
fn test_config_from_file() {
    let path = std::env::temp_dir().join(format!("rulekit-config-{}.json", std::process::id()));
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, r#"{{"attributes": ["age", "height"], "max_depth": 8}}"#).unwrap();
    drop(file);

    let config = EngineConfig::from_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(config.max_depth, 8);
    let engine = RuleEngine::new(config);
    assert!(engine.create_rule("height > 180 AND age > 30").is_ok());
    assert!(matches!(
        engine.create_rule("salary > 1"),
        Err(Error::UnknownAttribute { .. })
    ));
}

#[test]
fn test_invalid_config_file() {
    assert!(matches!(
        EngineConfig::from_json_str("{not json"),
        Err(Error::Json(_))
    ));
    assert!(matches!(
        EngineConfig::from_json_str(r#"{"max_depth": 0}"#),
        Err(Error::Config(_))
    ));
}

#[test]
fn test_default_config_round_trips_through_json() {
    let json = serde_json::to_string(&EngineConfig::default()).unwrap();
    assert_eq!(EngineConfig::from_json_str(&json).unwrap(), EngineConfig::default());
}
