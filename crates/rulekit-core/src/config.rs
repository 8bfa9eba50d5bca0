//! Engine configuration
//!
//! Loaded from JSON (every field optional) and optionally overridden from the
//! environment:
//!
//! | variable                 | field            |
//! |--------------------------|------------------|
//! | `RULEKIT_ATTRIBUTES`     | `attributes` (comma-separated) |
//! | `RULEKIT_MAX_DEPTH`      | `max_depth`      |
//! | `RULEKIT_LENIENT_TOKENS` | `lenient_tokens` |
//! | `RULEKIT_CACHE_CAPACITY` | `cache_capacity` |

use crate::parser::{ParseOptions, DEFAULT_MAX_DEPTH};
use crate::validator::AttributeWhitelist;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Attributes allowed when no configuration says otherwise
pub const DEFAULT_ATTRIBUTES: [&str; 4] = ["age", "department", "salary", "experience"];

/// Largest accepted `max_depth`; deeper nesting would risk exhausting the
/// parser's stack
pub const MAX_DEPTH_LIMIT: usize = 512;

/// Default number of parsed rules kept by the engine cache
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

/// Rule engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Field names rules may reference
    pub attributes: AttributeWhitelist,
    /// Maximum parenthesis nesting, at most [`MAX_DEPTH_LIMIT`]
    pub max_depth: usize,
    /// Drop unrecognized characters instead of rejecting the rule
    pub lenient_tokens: bool,
    /// Parsed rules cached by source text; 0 disables the cache
    pub cache_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            attributes: AttributeWhitelist::new(DEFAULT_ATTRIBUTES),
            max_depth: DEFAULT_MAX_DEPTH,
            lenient_tokens: false,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl EngineConfig {
    /// Create a default configuration with a different whitelist
    pub fn with_attributes(attributes: AttributeWhitelist) -> Self {
        Self {
            attributes,
            ..Self::default()
        }
    }

    /// Parse a JSON configuration document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Apply `RULEKIT_*` overrides from the process environment
    pub fn apply_env(self) -> Result<Self> {
        self.apply_env_from(|name| std::env::var(name).ok())
    }

    /// Apply `RULEKIT_*` overrides from an arbitrary lookup
    pub fn apply_env_from<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(list) = lookup("RULEKIT_ATTRIBUTES") {
            self.attributes = AttributeWhitelist::from_comma_separated(&list);
        }
        if let Some(raw) = lookup("RULEKIT_MAX_DEPTH") {
            self.max_depth = parse_var("RULEKIT_MAX_DEPTH", &raw)?;
        }
        if let Some(raw) = lookup("RULEKIT_LENIENT_TOKENS") {
            self.lenient_tokens = parse_var("RULEKIT_LENIENT_TOKENS", &raw)?;
        }
        if let Some(raw) = lookup("RULEKIT_CACHE_CAPACITY") {
            self.cache_capacity = parse_var("RULEKIT_CACHE_CAPACITY", &raw)?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Check invariants the engine relies on
    pub fn validate(&self) -> Result<()> {
        if self.attributes.is_empty() {
            return Err(Error::Config("attribute whitelist is empty".to_string()));
        }
        if self.max_depth == 0 {
            return Err(Error::Config("max_depth must be at least 1".to_string()));
        }
        if self.max_depth > MAX_DEPTH_LIMIT {
            return Err(Error::Config(format!(
                "max_depth must be at most {}, got {}",
                MAX_DEPTH_LIMIT, self.max_depth
            )));
        }
        Ok(())
    }

    /// Parser settings derived from this configuration
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            max_depth: self.max_depth,
            lenient_tokens: self.lenient_tokens,
        }
    }
}

fn parse_var<T: FromStr>(name: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| Error::Config(format!("invalid value for {}: {:?}", name, raw)))
}
