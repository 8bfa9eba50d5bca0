//! Rule engine for boolean predicates over records
//!
//! Rules are written in a small text language such as
//! `age > 30 AND department = 'Sales'`, parsed once into an immutable AST,
//! validated against a whitelist of attribute names and then evaluated
//! against any number of records.
//!
//! ```
//! use rulekit_core::{create_rule, evaluate_rule, AttributeWhitelist, Record, Value};
//!
//! let whitelist = AttributeWhitelist::new(["age", "department"]);
//! let rule = create_rule("age > 30 AND department = 'Sales'", &whitelist).unwrap();
//!
//! let mut record = Record::new();
//! record.insert("age".to_string(), Value::Int(35));
//! record.insert("department".to_string(), Value::from("Sales"));
//! assert!(evaluate_rule(&rule, &record).unwrap());
//! ```

pub mod analytics;
pub mod ast;
pub mod catalog;
pub mod combiner;
pub mod config;
pub mod engine;
pub mod evaluator;
pub mod lint;
pub mod parser;
pub mod record;
pub mod validator;

// Test utilities (available in tests and when used as a dependency with the testing feature)
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use analytics::{AnalyticsReport, RuleAnalytics};
pub use ast::{ComparisonOp, Literal, LogicalOp, Node};
pub use catalog::{NewRule, Rule, RuleCatalog, RuleId, RuleUpdate};
pub use config::EngineConfig;
pub use engine::{combine_rules, create_rule, evaluate_rule, RuleEngine};
pub use lint::{LintReport, PerformanceImpact};
pub use parser::{parse, ParseError};
pub use record::{Record, RecordLookup, Value};
pub use validator::AttributeWhitelist;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Syntax error: {0}")]
    Syntax(#[from] ParseError),

    #[error("Invalid attribute: {field}")]
    UnknownAttribute { field: String },

    #[error("Field {field} not found in data")]
    MissingField { field: String },

    #[error("Cannot compare {value_type} value of field {field} with {literal_type} literal using {op}")]
    TypeMismatch {
        field: String,
        op: ComparisonOp,
        value_type: &'static str,
        literal_type: &'static str,
    },

    #[error("No rules provided to combine")]
    EmptyInput,

    #[error("Rule not found: {0}")]
    RuleNotFound(RuleId),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Stable classification of [`Error`] for callers mapping errors to
/// responses or exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Syntax,
    UnknownAttribute,
    MissingField,
    TypeMismatch,
    EmptyInput,
    NotFound,
    Config,
    Io,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Syntax(_) => ErrorKind::Syntax,
            Error::UnknownAttribute { .. } => ErrorKind::UnknownAttribute,
            Error::MissingField { .. } => ErrorKind::MissingField,
            Error::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            Error::EmptyInput => ErrorKind::EmptyInput,
            Error::RuleNotFound(_) => ErrorKind::NotFound,
            Error::Config(_) | Error::Json(_) => ErrorKind::Config,
            Error::Io(_) => ErrorKind::Io,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
