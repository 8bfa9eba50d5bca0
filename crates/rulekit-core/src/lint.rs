//! Rule linting
//!
//! Unlike rule creation, linting never fails: problems are collected into a
//! [`LintReport`] so an editor or API can show all of them at once.

use crate::ast::nodes::{ComparisonOp, Literal, LogicalOp, Node};
use crate::ast::visitor::Visitor;
use crate::parser::{parse_with, ParseOptions};
use crate::validator::AttributeWhitelist;
use crate::Error;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::warn;

/// Depth above which a rule is flagged as hard to read
pub const DEEP_NESTING_THRESHOLD: usize = 8;

/// Estimated evaluation cost of a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerformanceImpact {
    Low,
    Medium,
    High,
    /// The rule did not parse
    Unknown,
}

impl PerformanceImpact {
    /// Classify by number of comparisons and logical operators
    pub fn classify(comparisons: usize, operators: usize) -> Self {
        if comparisons > 5 || operators > 4 {
            PerformanceImpact::High
        } else if comparisons > 3 || operators > 2 {
            PerformanceImpact::Medium
        } else {
            PerformanceImpact::Low
        }
    }
}

/// Result of linting one rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub performance_impact: PerformanceImpact,
}

#[derive(Default)]
struct RuleShape {
    operators: usize,
    comparisons: usize,
    fields: Vec<String>,
    conditions: Vec<String>,
}

impl Visitor for RuleShape {
    fn visit_operator(&mut self, _op: LogicalOp, left: &Node, right: &Node) {
        self.operators += 1;
        self.visit_node(left);
        self.visit_node(right);
    }

    fn visit_comparison(&mut self, field: &str, op: ComparisonOp, value: &Literal) {
        self.comparisons += 1;
        self.fields.push(field.to_string());
        self.conditions.push(format!("{} {} {}", field, op, value));
    }
}

/// Lint a rule string against a whitelist
pub fn lint(text: &str, whitelist: &AttributeWhitelist, options: ParseOptions) -> LintReport {
    let node = match parse_with(text, options) {
        Ok(node) => node,
        Err(e) => {
            let report = LintReport {
                is_valid: false,
                errors: vec![Error::from(e).to_string()],
                warnings: Vec::new(),
                performance_impact: PerformanceImpact::Unknown,
            };
            warn!(rule = text, errors = ?report.errors, "rule rejected by lint");
            return report;
        }
    };

    let mut shape = RuleShape::default();
    shape.visit_node(&node);

    let mut errors = Vec::new();
    let mut reported = HashSet::new();
    for field in &shape.fields {
        if !whitelist.contains(field) && reported.insert(field.as_str()) {
            errors.push(
                Error::UnknownAttribute {
                    field: field.clone(),
                }
                .to_string(),
            );
        }
    }

    let mut warnings = Vec::new();
    let performance_impact = PerformanceImpact::classify(shape.comparisons, shape.operators);
    if performance_impact == PerformanceImpact::High {
        warnings.push("Rule may have performance implications".to_string());
    }

    let mut seen = HashSet::new();
    let mut redundant = Vec::new();
    for condition in &shape.conditions {
        if !seen.insert(condition.as_str()) {
            redundant.push(condition.as_str());
        }
    }
    if !redundant.is_empty() {
        warnings.push(format!(
            "Rule contains potentially redundant conditions: {}",
            redundant.join(", ")
        ));
    }

    let depth = node.depth();
    if depth > DEEP_NESTING_THRESHOLD {
        warnings.push(format!("Rule is nested {} levels deep", depth));
    }

    let report = LintReport {
        is_valid: errors.is_empty(),
        errors,
        warnings,
        performance_impact,
    };
    if !report.is_valid {
        warn!(rule = text, errors = ?report.errors, "rule rejected by lint");
    }
    report
}
