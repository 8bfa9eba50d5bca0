//! In-memory rule catalog
//!
//! Named, versioned rules with create / get / list / update / delete,
//! evaluation by id and combination by ids. Every rule text is validated by
//! the engine before it is stored, so a stored rule always parses.

use crate::analytics::{AnalyticsReport, RuleAnalytics};
use crate::ast::nodes::Node;
use crate::engine::RuleEngine;
use crate::record::RecordLookup;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// Catalog-assigned rule identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleId(pub u64);

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Input for [`RuleCatalog::create`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRule {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub rule_string: String,
}

impl NewRule {
    pub fn new(name: impl Into<String>, rule_string: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            rule_string: rule_string.into(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Partial update; `None` fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub rule_string: Option<String>,
    pub active: Option<bool>,
}

/// A stored rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub id: RuleId,
    pub name: String,
    pub description: String,
    pub rule_string: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Starts at 1, incremented by every update
    pub version: u32,
    /// Informational flag; inactive rules still evaluate
    pub active: bool,
}

/// Thread-safe rule catalog backed by a [`RuleEngine`]
pub struct RuleCatalog {
    engine: Arc<RuleEngine>,
    rules: DashMap<RuleId, Rule>,
    next_id: AtomicU64,
    analytics: RuleAnalytics,
}

impl RuleCatalog {
    pub fn new(engine: Arc<RuleEngine>) -> Self {
        Self {
            engine,
            rules: DashMap::new(),
            next_id: AtomicU64::new(1),
            analytics: RuleAnalytics::new(),
        }
    }

    pub fn engine(&self) -> &RuleEngine {
        &self.engine
    }

    /// Validate and store a new rule
    pub fn create(&self, new_rule: NewRule) -> Result<Rule> {
        self.engine.parse_cached(&new_rule.rule_string)?;

        let id = RuleId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let now = Utc::now();
        let rule = Rule {
            id,
            name: new_rule.name,
            description: new_rule.description,
            rule_string: new_rule.rule_string,
            created_at: now,
            updated_at: now,
            version: 1,
            active: true,
        };
        self.rules.insert(id, rule.clone());
        info!(rule_id = %id, name = %rule.name, "rule created");
        Ok(rule)
    }

    pub fn get(&self, id: RuleId) -> Result<Rule> {
        self.rules
            .get(&id)
            .map(|rule| rule.value().clone())
            .ok_or(Error::RuleNotFound(id))
    }

    /// All rules ordered by id
    pub fn list(&self) -> Vec<Rule> {
        let mut rules: Vec<Rule> = self.rules.iter().map(|entry| entry.value().clone()).collect();
        rules.sort_by_key(|rule| rule.id);
        rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Apply a partial update and bump the version.
    ///
    /// A new rule text is validated first; on failure the stored rule is
    /// left untouched.
    pub fn update(&self, id: RuleId, update: RuleUpdate) -> Result<Rule> {
        if let Some(text) = &update.rule_string {
            self.engine.parse_cached(text)?;
        }

        let mut entry = self.rules.get_mut(&id).ok_or(Error::RuleNotFound(id))?;
        let rule = entry.value_mut();
        if let Some(name) = update.name {
            rule.name = name;
        }
        if let Some(description) = update.description {
            rule.description = description;
        }
        if let Some(rule_string) = update.rule_string {
            rule.rule_string = rule_string;
        }
        if let Some(active) = update.active {
            rule.active = active;
        }
        rule.version += 1;
        rule.updated_at = Utc::now();

        info!(rule_id = %id, version = rule.version, "rule updated");
        Ok(rule.clone())
    }

    /// Remove a rule and its statistics
    pub fn delete(&self, id: RuleId) -> Result<Rule> {
        let (_, rule) = self.rules.remove(&id).ok_or(Error::RuleNotFound(id))?;
        self.analytics.forget(id);
        info!(rule_id = %id, "rule deleted");
        Ok(rule)
    }

    /// Evaluate a stored rule. Successful evaluations are tracked in the
    /// catalog's analytics.
    pub fn evaluate<R: RecordLookup + ?Sized>(&self, id: RuleId, record: &R) -> Result<bool> {
        let text = self.get(id)?.rule_string;
        let node = self.engine.parse_cached(&text)?;

        let start = Instant::now();
        let result = self.engine.evaluate_rule(&node, record)?;
        self.analytics.track_evaluation(id, start.elapsed(), result);
        Ok(result)
    }

    /// Combine stored rules, in the given order, into one conjunctive rule
    pub fn combine(&self, ids: &[RuleId]) -> Result<Node> {
        let texts = ids
            .iter()
            .map(|id| self.get(*id).map(|rule| rule.rule_string))
            .collect::<Result<Vec<_>>>()?;
        self.engine.combine_rules(&texts)
    }

    pub fn analytics(&self) -> &RuleAnalytics {
        &self.analytics
    }

    pub fn report(&self, id: RuleId) -> Result<AnalyticsReport> {
        if !self.rules.contains_key(&id) {
            return Err(Error::RuleNotFound(id));
        }
        Ok(self.analytics.report(id))
    }
}

impl Default for RuleCatalog {
    fn default() -> Self {
        Self::new(Arc::new(RuleEngine::default()))
    }
}
