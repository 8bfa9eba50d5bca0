//! Rule combination
//!
//! Several rule strings become one tree by conjunction. The rules are joined
//! textually as `(r1) AND (r2) AND ...` and the result goes through the
//! normal parse and validate pipeline, so a combined rule obeys exactly the
//! same limits as a hand-written one.

use crate::ast::nodes::Node;
use crate::engine::create_rule_with;
use crate::parser::ParseOptions;
use crate::validator::AttributeWhitelist;
use crate::{Error, Result};

/// Join rule strings into the conjunctive source text `(r1) AND (r2) ...`
pub fn combined_source<S: AsRef<str>>(rules: &[S]) -> String {
    rules
        .iter()
        .map(|rule| format!("({})", rule.as_ref()))
        .collect::<Vec<_>>()
        .join(" AND ")
}

/// Combine rule strings into one validated tree.
///
/// A single rule is parsed as-is, without added parentheses. Wrapping adds
/// one level of parenthesis nesting however many rules are combined.
pub fn combine<S: AsRef<str>>(
    rules: &[S],
    whitelist: &AttributeWhitelist,
    options: ParseOptions,
) -> Result<Node> {
    match rules {
        [] => Err(Error::EmptyInput),
        [single] => create_rule_with(single.as_ref(), whitelist, options),
        many => create_rule_with(&combined_source(many), whitelist, options),
    }
}
