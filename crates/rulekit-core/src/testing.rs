//! Test utilities and helper functions for rule engine tests
//!
//! Shared fixtures built around the employee schema used throughout the
//! test suites: `age`, `department`, `salary`, `experience`.

use crate::record::{Record, Value};
use crate::validator::AttributeWhitelist;

/// The four-attribute employee schema
pub const EMPLOYEE_ATTRIBUTES: [&str; 4] = crate::config::DEFAULT_ATTRIBUTES;

/// A rule exercising nesting, both connectives and every attribute
pub const COMPLEX_RULE: &str = "((age > 30 AND department = 'Sales') OR (age < 25 AND department = 'Marketing')) AND (salary > 50000 OR experience > 5)";

/// Whitelist for the employee schema
pub fn employee_whitelist() -> AttributeWhitelist {
    AttributeWhitelist::new(EMPLOYEE_ATTRIBUTES)
}

/// Build a record from field/value pairs, e.g.
/// `record([("age", 35.into()), ("department", "Sales".into())])`
pub fn record<const N: usize>(pairs: [(&str, Value); N]) -> Record {
    pairs
        .into_iter()
        .map(|(field, value)| (field.to_string(), value))
        .collect()
}

/// Build a complete employee record
pub fn employee_record(age: i64, department: &str, salary: i64, experience: i64) -> Record {
    record([
        ("age", Value::Int(age)),
        ("department", Value::from(department)),
        ("salary", Value::Int(salary)),
        ("experience", Value::Int(experience)),
    ])
}
