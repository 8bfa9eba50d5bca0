//! Visitor pattern for traversing the AST

use super::nodes::{ComparisonOp, Literal, LogicalOp, Node};

/// Read-only visitor over a rule tree.
///
/// The default methods walk the tree in pre-order, left child before right.
pub trait Visitor: Sized {
    /// Visit any node
    fn visit_node(&mut self, node: &Node) {
        walk_node(self, node);
    }

    /// Visit an operator node
    fn visit_operator(&mut self, _op: LogicalOp, left: &Node, right: &Node) {
        self.visit_node(left);
        self.visit_node(right);
    }

    /// Visit a comparison leaf
    fn visit_comparison(&mut self, _field: &str, _op: ComparisonOp, _value: &Literal) {
        // Leaf node, no children
    }
}

/// Walk a node
pub fn walk_node<V: Visitor>(visitor: &mut V, node: &Node) {
    match node {
        Node::Operator { op, left, right } => visitor.visit_operator(*op, left, right),
        Node::Comparison { field, op, value } => visitor.visit_comparison(field, *op, value),
    }
}
