//! Abstract Syntax Tree (AST) for rules
//!
//! The AST is the parsed, immutable form of a rule string.

pub mod nodes;
pub mod visitor;

pub use nodes::{ComparisonOp, Literal, LogicalOp, Node};
pub use visitor::{walk_node, Visitor};
