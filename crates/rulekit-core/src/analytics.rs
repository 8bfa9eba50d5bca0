//! Per-rule evaluation statistics

use crate::catalog::RuleId;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Counters for a single rule
#[derive(Debug, Default)]
pub struct UsageStats {
    /// Total number of evaluations
    pub eval_count: AtomicU64,
    /// Evaluations that returned true
    pub true_results: AtomicU64,
    /// Sum of evaluation latencies (nanoseconds)
    pub total_latency_ns: AtomicU64,
    pub last_evaluated: RwLock<Option<DateTime<Utc>>>,
}

impl UsageStats {
    pub fn record_evaluation(&self, latency: Duration, result: bool) {
        self.eval_count.fetch_add(1, Ordering::Relaxed);
        if result {
            self.true_results.fetch_add(1, Ordering::Relaxed);
        }
        let nanos = u64::try_from(latency.as_nanos()).unwrap_or(u64::MAX);
        self.total_latency_ns.fetch_add(nanos, Ordering::Relaxed);
        *self.last_evaluated.write() = Some(Utc::now());
    }

    pub fn avg_latency_ns(&self) -> u64 {
        let count = self.eval_count.load(Ordering::Relaxed);
        if count == 0 {
            return 0;
        }
        self.total_latency_ns.load(Ordering::Relaxed) / count
    }
}

/// Snapshot of a rule's statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsReport {
    pub rule_id: RuleId,
    pub evaluation_count: u64,
    pub true_results: u64,
    pub false_results: u64,
    /// Fraction of evaluations that returned true; 0 when never evaluated
    pub success_rate: f64,
    pub average_execution_time_ms: f64,
    pub last_evaluated: Option<DateTime<Utc>>,
}

/// Evaluation statistics keyed by rule
#[derive(Debug, Default)]
pub struct RuleAnalytics {
    stats: DashMap<RuleId, UsageStats>,
}

impl RuleAnalytics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one successful evaluation of `rule_id`
    pub fn track_evaluation(&self, rule_id: RuleId, latency: Duration, result: bool) {
        self.stats
            .entry(rule_id)
            .or_default()
            .record_evaluation(latency, result);
    }

    /// Report for one rule. A rule that was never evaluated reports zeros.
    pub fn report(&self, rule_id: RuleId) -> AnalyticsReport {
        match self.stats.get(&rule_id) {
            Some(stats) => build_report(rule_id, &stats),
            None => build_report(rule_id, &UsageStats::default()),
        }
    }

    /// Reports for every rule evaluated at least once, ordered by id
    pub fn all_reports(&self) -> Vec<AnalyticsReport> {
        let mut reports: Vec<_> = self
            .stats
            .iter()
            .map(|entry| build_report(*entry.key(), entry.value()))
            .collect();
        reports.sort_by_key(|report| report.rule_id);
        reports
    }

    /// Drop statistics for a rule
    pub fn forget(&self, rule_id: RuleId) {
        self.stats.remove(&rule_id);
    }
}

fn build_report(rule_id: RuleId, stats: &UsageStats) -> AnalyticsReport {
    // The counters are updated separately, so a concurrent evaluation can
    // make true_results run ahead of eval_count in a snapshot
    let true_results = stats.true_results.load(Ordering::Relaxed);
    let evaluation_count = stats.eval_count.load(Ordering::Relaxed);
    let true_results = true_results.min(evaluation_count);
    let success_rate = if evaluation_count == 0 {
        0.0
    } else {
        true_results as f64 / evaluation_count as f64
    };

    AnalyticsReport {
        rule_id,
        evaluation_count,
        true_results,
        false_results: evaluation_count.saturating_sub(true_results),
        success_rate,
        average_execution_time_ms: stats.avg_latency_ns() as f64 / 1_000_000.0,
        last_evaluated: *stats.last_evaluated.read(),
    }
}
