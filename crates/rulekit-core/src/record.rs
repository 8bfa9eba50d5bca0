//! Record values and field lookup

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

/// A record: field name to value
pub type Record = HashMap<String, Value>;

/// Record values (typed)
///
/// Deserializes untagged from JSON scalars, so `{"age": 35, "department":
/// "Sales"}` reads directly into a [`Record`]. JSON integers become `Int`,
/// other numbers `Float`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Float(f64),
    String(String),
    Bool(bool),
}

impl Value {
    /// Get the type name
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "Int",
            Value::Float(_) => "Float",
            Value::String(_) => "String",
            Value::Bool(_) => "Bool",
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// Field lookup used by the evaluator
pub trait RecordLookup {
    /// Value stored under `field`, if any
    fn lookup(&self, field: &str) -> Option<&Value>;
}

impl<S: BuildHasher> RecordLookup for HashMap<String, Value, S> {
    fn lookup(&self, field: &str) -> Option<&Value> {
        self.get(field)
    }
}

impl RecordLookup for BTreeMap<String, Value> {
    fn lookup(&self, field: &str) -> Option<&Value> {
        self.get(field)
    }
}
