//! Rule engine
//!
//! The free functions are the core pipeline: parse, validate, evaluate,
//! combine. [`RuleEngine`] bundles them with an [`EngineConfig`] and an
//! optional LRU cache of parsed rules keyed by rule text.

use crate::ast::nodes::Node;
use crate::combiner;
use crate::config::EngineConfig;
use crate::evaluator::evaluate;
use crate::lint::{self, LintReport};
use crate::parser::{parse_with, ParseOptions};
use crate::record::RecordLookup;
use crate::validator::{validate, AttributeWhitelist};
use crate::Result;
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tracing::debug;

/// Parse and validate a rule with default parser options
pub fn create_rule(text: &str, whitelist: &AttributeWhitelist) -> Result<Node> {
    create_rule_with(text, whitelist, ParseOptions::default())
}

/// Parse and validate a rule
pub fn create_rule_with(
    text: &str,
    whitelist: &AttributeWhitelist,
    options: ParseOptions,
) -> Result<Node> {
    let node = parse_with(text, options)?;
    validate(&node, whitelist)?;
    debug!(
        comparisons = node.comparison_count(),
        depth = node.depth(),
        "rule created"
    );
    Ok(node)
}

/// Evaluate a rule against a record
pub fn evaluate_rule<R: RecordLookup + ?Sized>(node: &Node, record: &R) -> Result<bool> {
    evaluate(node, record)
}

/// Combine rule strings into one conjunctive rule
pub fn combine_rules<S: AsRef<str>>(rules: &[S], whitelist: &AttributeWhitelist) -> Result<Node> {
    combiner::combine(rules, whitelist, ParseOptions::default())
}

/// Configured rule engine
///
/// Parsed rules are shared as `Arc<Node>`, so a cached rule can be evaluated
/// from many threads while the cache itself stays locked only for the lookup.
pub struct RuleEngine {
    config: EngineConfig,
    cache: Option<Mutex<LruCache<String, Arc<Node>>>>,
}

impl RuleEngine {
    pub fn new(config: EngineConfig) -> Self {
        let cache = NonZeroUsize::new(config.cache_capacity).map(|cap| Mutex::new(LruCache::new(cap)));
        Self { config, cache }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn whitelist(&self) -> &AttributeWhitelist {
        &self.config.attributes
    }

    /// Parse and validate a rule, bypassing the cache
    pub fn create_rule(&self, text: &str) -> Result<Node> {
        create_rule_with(text, &self.config.attributes, self.config.parse_options())
    }

    /// Parse and validate a rule, reusing an earlier result for the same text.
    ///
    /// Failures are not cached.
    pub fn parse_cached(&self, text: &str) -> Result<Arc<Node>> {
        let Some(cache) = &self.cache else {
            return self.create_rule(text).map(Arc::new);
        };

        if let Some(node) = cache.lock().get(text) {
            debug!(rule = text, "rule cache hit");
            return Ok(node.clone());
        }

        let node = Arc::new(self.create_rule(text)?);
        cache.lock().put(text.to_string(), node.clone());
        debug!(rule = text, "rule cached");
        Ok(node)
    }

    pub fn evaluate_rule<R: RecordLookup + ?Sized>(&self, node: &Node, record: &R) -> Result<bool> {
        evaluate(node, record)
    }

    /// Parse (through the cache) and evaluate in one step
    pub fn evaluate_text<R: RecordLookup + ?Sized>(&self, text: &str, record: &R) -> Result<bool> {
        let node = self.parse_cached(text)?;
        evaluate(&node, record)
    }

    pub fn combine_rules<S: AsRef<str>>(&self, rules: &[S]) -> Result<Node> {
        combiner::combine(rules, &self.config.attributes, self.config.parse_options())
    }

    /// Analyze a rule without failing on invalid input
    pub fn lint(&self, text: &str) -> LintReport {
        lint::lint(text, &self.config.attributes, self.config.parse_options())
    }

    /// Number of cached rules
    pub fn cache_len(&self) -> usize {
        self.cache.as_ref().map_or(0, |cache| cache.lock().len())
    }

    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.lock().clear();
        }
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
