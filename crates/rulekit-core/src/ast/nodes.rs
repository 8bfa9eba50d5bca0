//! AST node definitions

use serde::{Deserialize, Serialize};
use std::fmt;

/// A node of a parsed rule.
///
/// Every leaf is a [`Node::Comparison`]; every inner node is a
/// [`Node::Operator`] owning exactly two children. Trees are built once by the
/// parser and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    /// Logical combination of two sub-predicates
    Operator {
        op: LogicalOp,
        left: Box<Node>,
        right: Box<Node>,
    },

    /// Leaf predicate comparing a record field with a literal
    Comparison {
        field: String,
        op: ComparisonOp,
        value: Literal,
    },
}

impl Node {
    /// Create an operator node
    pub fn operator(op: LogicalOp, left: Node, right: Node) -> Self {
        Self::Operator {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Create a logical AND
    pub fn and(left: Node, right: Node) -> Self {
        Self::operator(LogicalOp::And, left, right)
    }

    /// Create a logical OR
    pub fn or(left: Node, right: Node) -> Self {
        Self::operator(LogicalOp::Or, left, right)
    }

    /// Create a comparison leaf
    pub fn comparison(field: impl Into<String>, op: ComparisonOp, value: impl Into<Literal>) -> Self {
        Self::Comparison {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    /// Height of the tree; a single comparison has depth 1
    pub fn depth(&self) -> usize {
        match self {
            Node::Operator { left, right, .. } => 1 + left.depth().max(right.depth()),
            Node::Comparison { .. } => 1,
        }
    }

    /// Number of comparison leaves
    pub fn comparison_count(&self) -> usize {
        match self {
            Node::Operator { left, right, .. } => {
                left.comparison_count() + right.comparison_count()
            }
            Node::Comparison { .. } => 1,
        }
    }

    /// Field names referenced by the tree, in pre-order, duplicates kept
    pub fn fields(&self) -> Vec<&str> {
        let mut fields = Vec::new();
        self.collect_fields(&mut fields);
        fields
    }

    fn collect_fields<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Node::Operator { left, right, .. } => {
                left.collect_fields(out);
                right.collect_fields(out);
            }
            Node::Comparison { field, .. } => out.push(field),
        }
    }
}

/// Renders the canonical rule text. Every operator node is parenthesized, so
/// re-parsing the output yields a structurally equal tree.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Operator { op, left, right } => write!(f, "({} {} {})", left, op, right),
            Node::Comparison { field, op, value } => write!(f, "{} {} {}", field, op, value),
        }
    }
}

/// A literal on the right-hand side of a comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Int(i64),
    Float(f64),
    String(String),
}

impl Literal {
    /// Get the type name
    pub fn type_name(&self) -> &'static str {
        match self {
            Literal::Int(_) => "Int",
            Literal::Float(_) => "Float",
            Literal::String(_) => "String",
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(n) => write!(f, "{}", n),
            Literal::Float(n) => {
                // Keep the decimal point so the text lexes back as a float
                let text = n.to_string();
                if text.contains('.') {
                    write!(f, "{}", text)
                } else {
                    write!(f, "{}.0", text)
                }
            }
            Literal::String(s) => write!(f, "'{}'", s),
        }
    }
}

impl From<i64> for Literal {
    fn from(n: i64) -> Self {
        Literal::Int(n)
    }
}

impl From<i32> for Literal {
    fn from(n: i32) -> Self {
        Literal::Int(i64::from(n))
    }
}

impl From<f64> for Literal {
    fn from(n: f64) -> Self {
        Literal::Float(n)
    }
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Literal::String(s.to_string())
    }
}

impl From<String> for Literal {
    fn from(s: String) -> Self {
        Literal::String(s)
    }
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonOp {
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">=")]
    GtEq,
    #[serde(rename = "<=")]
    LtEq,
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "!=")]
    Neq,
}

impl ComparisonOp {
    /// Apply the operator to two ordered values
    pub fn apply<T: PartialOrd + ?Sized>(self, a: &T, b: &T) -> bool {
        match self {
            ComparisonOp::Gt => a > b,
            ComparisonOp::Lt => a < b,
            ComparisonOp::GtEq => a >= b,
            ComparisonOp::LtEq => a <= b,
            ComparisonOp::Eq => a == b,
            ComparisonOp::Neq => a != b,
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComparisonOp::Gt => write!(f, ">"),
            ComparisonOp::Lt => write!(f, "<"),
            ComparisonOp::GtEq => write!(f, ">="),
            ComparisonOp::LtEq => write!(f, "<="),
            ComparisonOp::Eq => write!(f, "="),
            ComparisonOp::Neq => write!(f, "!="),
        }
    }
}

/// Logical operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogicalOp {
    And,
    Or,
}

impl fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalOp::And => write!(f, "AND"),
            LogicalOp::Or => write!(f, "OR"),
        }
    }
}
