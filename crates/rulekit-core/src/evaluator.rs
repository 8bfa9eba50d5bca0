//! Tree evaluator
//!
//! Walks a rule tree against a record. Evaluation is a pure function of its
//! two inputs: there is no evaluator state, so one tree can be evaluated from
//! many threads at once.

use crate::ast::nodes::{ComparisonOp, Literal, LogicalOp, Node};
use crate::record::{RecordLookup, Value};
use crate::{Error, Result};
use tracing::trace;

/// Evaluate `node` against `record`.
///
/// `AND` skips its right operand when the left is false and `OR` skips it when
/// the left is true, so a field that is only referenced on a skipped branch
/// may be absent from the record.
pub fn evaluate<R: RecordLookup + ?Sized>(node: &Node, record: &R) -> Result<bool> {
    // Chains fold left, so the left spine is walked with an explicit stack
    // and only right operands recurse.
    let mut pending = Vec::new();
    let mut current = node;
    let mut result = loop {
        match current {
            Node::Operator { op, left, right } => {
                pending.push((*op, right.as_ref()));
                current = left;
            }
            Node::Comparison { field, op, value } => {
                break evaluate_comparison(field, *op, value, record)?;
            }
        }
    };
    for (op, right) in pending.into_iter().rev() {
        result = match (op, result) {
            (LogicalOp::And, false) => false,
            (LogicalOp::Or, true) => true,
            _ => evaluate(right, record)?,
        };
    }
    Ok(result)
}

fn evaluate_comparison<R: RecordLookup + ?Sized>(
    field: &str,
    op: ComparisonOp,
    value: &Literal,
    record: &R,
) -> Result<bool> {
    let actual = record.lookup(field).ok_or_else(|| Error::MissingField {
        field: field.to_string(),
    })?;
    let result = compare(field, actual, op, value)?;
    trace!(field = %field, op = %op, result, "comparison evaluated");
    Ok(result)
}

/// Compare a record value with a literal.
///
/// Integers and floats compare numerically with each other, strings compare
/// lexicographically with strings. Every other pairing is a type mismatch,
/// for equality as well as ordering.
pub fn compare(field: &str, actual: &Value, op: ComparisonOp, expected: &Literal) -> Result<bool> {
    let result = match (actual, expected) {
        (Value::Int(a), Literal::Int(b)) => op.apply(a, b),
        (Value::Int(a), Literal::Float(b)) => op.apply(&(*a as f64), b),
        (Value::Float(a), Literal::Int(b)) => op.apply(a, &(*b as f64)),
        (Value::Float(a), Literal::Float(b)) => op.apply(a, b),
        (Value::String(a), Literal::String(b)) => op.apply(a.as_str(), b.as_str()),
        _ => {
            return Err(Error::TypeMismatch {
                field: field.to_string(),
                op,
                value_type: actual.type_name(),
                literal_type: expected.type_name(),
            })
        }
    };
    Ok(result)
}
