//! Aggregation helpers shared by the per-domain summaries.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::time::days_between;

/// `numerator / denominator` as a whole percentage, rounded half away from
/// zero. A zero denominator yields 0.
#[must_use]
pub fn percent(numerator: usize, denominator: usize) -> u32 {
    if denominator == 0 {
        return 0;
    }
    #[allow(clippy::cast_precision_loss, reason = "record counts are small")]
    let ratio = numerator as f64 / denominator as f64 * 100.0;
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "ratio is a non-negative percentage"
    )]
    let rounded = ratio.round() as u32;
    rounded
}

/// Count records per key. Records for which `key` returns `None` are left
/// out of every bucket.
pub fn count_by<'a, T, I, F>(records: I, key: F) -> BTreeMap<String, usize>
where
    T: 'a,
    I: IntoIterator<Item = &'a T>,
    F: Fn(&T) -> Option<String>,
{
    let mut counts = BTreeMap::new();
    for record in records {
        if let Some(k) = key(record) {
            *counts.entry(k).or_insert(0) += 1;
        }
    }
    counts
}

/// `true` once at least `threshold_days` have elapsed since `since`.
#[must_use]
pub fn elapsed_at_least(since: DateTime<Utc>, now: DateTime<Utc>, threshold_days: i64) -> bool {
    #[allow(clippy::cast_precision_loss, reason = "day thresholds are small")]
    let threshold = threshold_days as f64;
    days_between(since, now) >= threshold
}

/// "Showing N of M" counter for filtered views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Showing {
    pub shown: usize,
    pub total: usize,
}

impl Showing {
    #[must_use]
    pub const fn new(shown: usize, total: usize) -> Self {
        Self { shown, total }
    }

    #[must_use]
    pub const fn is_filtered(&self) -> bool {
        self.shown != self.total
    }
}

impl std::fmt::Display for Showing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Showing {} of {}", self.shown, self.total)
    }
}
