//! crates/promail_core/src/analytics.rs
//!
//! Read-only aggregation over the usage and visit logs. Everything here is
//! pure and recomputed per view; the logs are small and local, so there is
//! no caching layer.

use serde::Serialize;
use std::collections::HashSet;
use crate::domain::{UsageLogEntry, VisitLogEntry};

/// How many rows the top-N rankings keep by default.
pub const TOP_N: usize = 5;

/// One ranked row: a display label and its occurrence count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedCount {
    pub label: String,
    pub count: usize,
}

/// The derived statistics the analytics view presents.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageReport {
    pub total_visits: usize,
    pub total_generations: usize,
    pub unique_users: usize,
    pub top_combinations: Vec<RankedCount>,
    pub top_categories: Vec<RankedCount>,
}

impl UsageReport {
    pub fn build(usage: &[UsageLogEntry], visits: &[VisitLogEntry]) -> Self {
        Self {
            total_visits: visits.len(),
            total_generations: usage.len(),
            unique_users: unique_user_count(usage),
            top_combinations: top_combinations(usage, TOP_N),
            top_categories: top_categories(usage, TOP_N),
        }
    }
}

/// Ranks `language - tone` pairs by occurrence, descending. Ties keep the
/// order in which the pair was first encountered in the log.
pub fn top_combinations(usage: &[UsageLogEntry], n: usize) -> Vec<RankedCount> {
    rank(usage.iter().map(|e| format!("{} - {}", e.language, e.tone)), n)
}

/// Ranks categories by occurrence, with the same ordering rules as
/// [`top_combinations`].
pub fn top_categories(usage: &[UsageLogEntry], n: usize) -> Vec<RankedCount> {
    rank(usage.iter().map(|e| e.category.to_string()), n)
}

/// Counts distinct attributed emails across the usage log.
pub fn unique_user_count(usage: &[UsageLogEntry]) -> usize {
    usage
        .iter()
        .map(|e| e.email.as_str())
        .collect::<HashSet<_>>()
        .len()
}

fn rank(labels: impl Iterator<Item = String>, n: usize) -> Vec<RankedCount> {
    // Counts accumulate in first-encounter order; the stable sort below
    // then preserves that order among equal counts.
    let mut counts: Vec<RankedCount> = Vec::new();
    for label in labels {
        match counts.iter_mut().find(|row| row.label == label) {
            Some(row) => row.count += 1,
            None => counts.push(RankedCount { label, count: 1 }),
        }
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(n);
    counts
}
