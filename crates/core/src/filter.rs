//! Filter evaluator.
//!
//! A [`FilterSpec`] is an ordered list of per-field predicates plus an
//! optional free-text query. All active predicates are ANDed; the sentinel
//! predicate [`Predicate::Any`] and an empty query impose no constraint.

use std::ops::{Bound, RangeBounds};
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::is_sentinel;
use crate::error::{CoreError, Result};
use crate::record::{FieldKind, ListRecord};
use crate::time::parse_timestamp;

/// A resolved time window. Bounds are absolute instants, so evaluating the
/// window never consults a clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: Bound<DateTime<Utc>>,
    pub end: Bound<DateTime<Utc>>,
}

impl TimeRange {
    #[must_use]
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        (self.start, self.end).contains(&ts)
    }
}

/// Relative date window as selected in the UI, before resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateWindow {
    /// Strictly after now.
    Upcoming,
    /// Strictly before now.
    Past,
    /// From now through now + N days, both ends included.
    Next(u32),
    /// From now - N days (included) up to now (excluded).
    Last(u32),
}

impl DateWindow {
    #[must_use]
    pub fn resolve(self, now: DateTime<Utc>) -> TimeRange {
        match self {
            Self::Upcoming => TimeRange { start: Bound::Excluded(now), end: Bound::Unbounded },
            Self::Past => TimeRange { start: Bound::Unbounded, end: Bound::Excluded(now) },
            Self::Next(days) => TimeRange {
                start: Bound::Included(now),
                end: Bound::Included(now + Duration::days(i64::from(days))),
            },
            Self::Last(days) => TimeRange {
                start: Bound::Included(now - Duration::days(i64::from(days))),
                end: Bound::Excluded(now),
            },
        }
    }
}

impl FromStr for DateWindow {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        match s.as_str() {
            "upcoming" | "future" => return Ok(Self::Upcoming),
            "past" => return Ok(Self::Past),
            _ => {},
        }
        if let Some(days) = s.strip_prefix("next_") {
            return days.parse().map(Self::Next).map_err(|_| ());
        }
        if let Some(days) = s.strip_prefix("past_").or_else(|| s.strip_prefix("last_")) {
            return days.parse().map(Self::Last).map_err(|_| ());
        }
        Err(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "value", rename_all = "snake_case")]
pub enum Predicate {
    /// No constraint.
    Any,
    Equals(String),
    OneOf(Vec<String>),
    /// Keep records whose numeric field is `>=` the threshold.
    AtLeast(f64),
    /// Keep records whose numeric field is `<=` the ceiling.
    AtMost(f64),
    /// Inclusive on both ends.
    Between(f64, f64),
    Within(TimeRange),
    Flag(bool),
}

impl Predicate {
    /// Translate a raw UI selection for a field of the given kind.
    ///
    /// `now` anchors relative date windows.
    pub fn from_selection(
        kind: FieldKind,
        field: &str,
        raw: &str,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        if is_sentinel(raw) {
            return Ok(Self::Any);
        }
        let value = raw.trim();
        match kind {
            FieldKind::Category => Ok(Self::Equals(value.to_owned())),
            FieldKind::Labels => {
                let mut options: Vec<String> = value
                    .split(',')
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(str::to_owned)
                    .collect();
                match options.len() {
                    0 => Ok(Self::Any),
                    1 => Ok(Self::Equals(options.remove(0))),
                    _ => Ok(Self::OneOf(options)),
                }
            },
            FieldKind::Number | FieldKind::Ceiling => {
                if let Some((low, high)) = value.split_once("..") {
                    return number_range(field, value, low, high);
                }
                match value.parse::<f64>() {
                    Ok(limit) if limit.is_finite() => Ok(if kind == FieldKind::Ceiling {
                        Self::AtMost(limit)
                    } else {
                        Self::AtLeast(limit)
                    }),
                    _ => Err(CoreError::InvalidThreshold {
                        field: field.to_owned(),
                        value: value.to_owned(),
                    }),
                }
            },
            FieldKind::Time => {
                if let Ok(window) = value.parse::<DateWindow>() {
                    return Ok(Self::Within(window.resolve(now)));
                }
                match value.split_once("..") {
                    Some((start, end)) => time_range(field, value, start, end).map(Self::Within),
                    None => Err(CoreError::InvalidDateWindow {
                        field: field.to_owned(),
                        value: value.to_owned(),
                    }),
                }
            },
            FieldKind::Since => time_range(field, value, value, "").map(Self::Within),
            FieldKind::Until => time_range(field, value, "", value).map(Self::Within),
            FieldKind::Flag => match value.to_lowercase().as_str() {
                "true" | "yes" | "1" => Ok(Self::Flag(true)),
                "false" | "no" | "0" => Ok(Self::Flag(false)),
                _ => Err(CoreError::InvalidFlag {
                    field: field.to_owned(),
                    value: value.to_owned(),
                }),
            },
        }
    }

    #[must_use]
    pub const fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }

    fn matches<R: ListRecord>(&self, record: &R, field: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Equals(expected) => record.text(field).is_some_and(|v| v == expected),
            Self::OneOf(options) => {
                record.text(field).is_some_and(|v| options.iter().any(|o| o == v))
            },
            Self::AtLeast(threshold) => record.number(field).is_some_and(|v| v >= *threshold),
            Self::AtMost(ceiling) => record.number(field).is_some_and(|v| v <= *ceiling),
            Self::Between(low, high) => record.number(field).is_some_and(|v| (*low..=*high).contains(&v)),
            Self::Within(range) => record.timestamp(field).is_some_and(|ts| range.contains(ts)),
            Self::Flag(expected) => record.flag(field) == Some(*expected),
        }
    }
}

fn invalid_range(field: &str, value: &str) -> CoreError {
    CoreError::InvalidRange { field: field.to_owned(), value: value.to_owned() }
}

/// `low..high`, `low..` or `..high`; both ends inclusive.
fn number_range(field: &str, value: &str, low: &str, high: &str) -> Result<Predicate> {
    let parse = |side: &str| -> Result<Option<f64>> {
        let side = side.trim();
        if side.is_empty() {
            return Ok(None);
        }
        match side.parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(Some(n)),
            _ => Err(invalid_range(field, value)),
        }
    };
    match (parse(low)?, parse(high)?) {
        (Some(low), Some(high)) if low <= high => Ok(Predicate::Between(low, high)),
        (Some(low), None) => Ok(Predicate::AtLeast(low)),
        (None, Some(high)) => Ok(Predicate::AtMost(high)),
        _ => Err(invalid_range(field, value)),
    }
}

/// Absolute instants; a bare date means midnight UTC. Both ends inclusive.
fn time_range(field: &str, value: &str, start: &str, end: &str) -> Result<TimeRange> {
    let parse = |side: &str| -> Result<Bound<DateTime<Utc>>> {
        let side = side.trim();
        if side.is_empty() {
            return Ok(Bound::Unbounded);
        }
        parse_timestamp(side).map(Bound::Included).map_err(|_| invalid_range(field, value))
    };
    let range = TimeRange { start: parse(start)?, end: parse(end)? };
    match (range.start, range.end) {
        (Bound::Unbounded, Bound::Unbounded) => Err(invalid_range(field, value)),
        (Bound::Included(a), Bound::Included(b)) if a > b => Err(invalid_range(field, value)),
        _ => Ok(range),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldFilter {
    pub field: String,
    pub predicate: Predicate,
}

impl FieldFilter {
    pub fn new(field: impl Into<String>, predicate: Predicate) -> Self {
        Self { field: field.into(), predicate }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    #[serde(default)]
    pub filters: Vec<FieldFilter>,
    #[serde(default)]
    pub search: String,
}

impl FilterSpec {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the predicate for `field`, replacing an earlier one in place.
    #[must_use]
    pub fn set(mut self, field: impl Into<String>, predicate: Predicate) -> Self {
        let field = field.into();
        if let Some(existing) = self.filters.iter_mut().find(|f| f.field == field) {
            existing.predicate = predicate;
        } else {
            self.filters.push(FieldFilter { field, predicate });
        }
        self
    }

    /// Append a predicate without replacing earlier ones on the same field.
    #[must_use]
    pub fn and(mut self, filter: FieldFilter) -> Self {
        self.filters.push(filter);
        self
    }

    #[must_use]
    pub fn search(mut self, query: impl Into<String>) -> Self {
        self.search = query.into();
        self
    }

    /// `true` when filtering returns its input unchanged.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.search.trim().is_empty() && self.filters.iter().all(|f| f.predicate.is_any())
    }

    #[must_use]
    pub fn matches<R: ListRecord>(&self, record: &R) -> bool {
        self.filters.iter().all(|f| f.predicate.matches(record, &f.field))
            && matches_search(record, &self.search)
    }
}

/// Case-insensitive substring match over the record's searchable fields.
/// A blank query matches everything.
#[must_use]
pub fn matches_search<R: ListRecord>(record: &R, query: &str) -> bool {
    let query = query.trim();
    if query.is_empty() {
        return true;
    }
    let needle = query.to_lowercase();
    record.search_fields().into_iter().any(|field| field.to_lowercase().contains(&needle))
}

/// Keep the records that satisfy every active predicate, in input order.
pub fn filter<'a, R: ListRecord>(records: &'a [R], spec: &FilterSpec) -> Vec<&'a R> {
    if spec.is_identity() {
        return records.iter().collect();
    }
    records.iter().filter(|r| spec.matches(*r)).collect()
}
