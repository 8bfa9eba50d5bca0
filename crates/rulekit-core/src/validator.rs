//! Attribute validation
//!
//! Checks a parsed rule against the set of field names it is allowed to
//! reference. Runs once when a rule is created, never during evaluation.

use crate::ast::nodes::{ComparisonOp, Literal, LogicalOp, Node};
use crate::ast::visitor::Visitor;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Set of field names a rule may reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeWhitelist {
    attributes: BTreeSet<String>,
}

impl AttributeWhitelist {
    /// Create a whitelist from attribute names
    pub fn new<I, S>(attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            attributes: attributes.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a comma-separated list such as `age, department`
    pub fn from_comma_separated(list: &str) -> Self {
        Self::new(
            list.split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty()),
        )
    }

    /// Check whether `field` may be referenced
    pub fn contains(&self, field: &str) -> bool {
        self.attributes.contains(field)
    }

    /// Allowed names in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for AttributeWhitelist {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Finds the first field, in pre-order, that the whitelist does not allow
struct UnknownAttributeFinder<'a> {
    whitelist: &'a AttributeWhitelist,
    first_unknown: Option<String>,
}

impl Visitor for UnknownAttributeFinder<'_> {
    fn visit_operator(&mut self, _op: LogicalOp, left: &Node, right: &Node) {
        self.visit_node(left);
        if self.first_unknown.is_none() {
            self.visit_node(right);
        }
    }

    fn visit_comparison(&mut self, field: &str, _op: ComparisonOp, _value: &Literal) {
        if self.first_unknown.is_none() && !self.whitelist.contains(field) {
            self.first_unknown = Some(field.to_string());
        }
    }
}

/// Reject the rule if it references a field outside `whitelist`.
///
/// The error names the first offending field in a pre-order, left-to-right
/// walk. The tree is not modified.
pub fn validate(node: &Node, whitelist: &AttributeWhitelist) -> Result<()> {
    let mut finder = UnknownAttributeFinder {
        whitelist,
        first_unknown: None,
    };
    finder.visit_node(node);

    match finder.first_unknown {
        Some(field) => Err(Error::UnknownAttribute { field }),
        None => Ok(()),
    }
}
