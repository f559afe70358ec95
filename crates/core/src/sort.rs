//! Sort comparator selector.
//!
//! A [`SortKey`] names a user-selectable ordering. Each record reports the
//! value it sorts by through [`ListRecord::sort_value`]; records without a
//! value always sort after records with one, whatever the direction.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::error::CoreError;
use crate::record::ListRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum SortKey {
    #[default]
    Relevance,
    Followers,
    Engagement,
    IcpScore,
    Audience,
    Podcasts,
    Bookings,
    Results,
    Responses,
    PmfScore,
    Newest,
    Oldest,
    Updated,
    Soonest,
    Latest,
    Alphabetical,
    Platform,
}

impl SortKey {
    pub const ALL_VARIANTS: &'static [Self] = &[
        Self::Relevance,
        Self::Followers,
        Self::Engagement,
        Self::IcpScore,
        Self::Audience,
        Self::Podcasts,
        Self::Bookings,
        Self::Results,
        Self::Responses,
        Self::PmfScore,
        Self::Newest,
        Self::Oldest,
        Self::Updated,
        Self::Soonest,
        Self::Latest,
        Self::Alphabetical,
        Self::Platform,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match *self {
            Self::Relevance => "relevance",
            Self::Followers => "followers",
            Self::Engagement => "engagement",
            Self::IcpScore => "icp_score",
            Self::Audience => "audience",
            Self::Podcasts => "podcasts",
            Self::Bookings => "bookings",
            Self::Results => "results",
            Self::Responses => "responses",
            Self::PmfScore => "pmf_score",
            Self::Newest => "newest",
            Self::Oldest => "oldest",
            Self::Updated => "updated",
            Self::Soonest => "soonest",
            Self::Latest => "latest",
            Self::Alphabetical => "alphabetical",
            Self::Platform => "platform",
        }
    }

    /// Direction used when the user has not flipped the column.
    #[must_use]
    pub const fn default_direction(&self) -> SortDirection {
        match *self {
            Self::Oldest | Self::Soonest | Self::Alphabetical | Self::Platform => SortDirection::Ascending,
            _ => SortDirection::Descending,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Table column names and dropdown labels the pages use for a key.
const SORT_ALIASES: &[(&str, SortKey)] = &[
    ("score", SortKey::IcpScore),
    ("icp_alignment_score", SortKey::IcpScore),
    ("follower_count", SortKey::Followers),
    ("avg_engagement_rate", SortKey::Engagement),
    ("total_results", SortKey::Results),
    ("response_count", SortKey::Responses),
    ("most_responses", SortKey::Responses),
    ("highest_pmf", SortKey::PmfScore),
    ("created_at", SortKey::Newest),
    ("updated_at", SortKey::Updated),
    ("recently_updated", SortKey::Updated),
    ("name", SortKey::Alphabetical),
    ("full_name", SortKey::Alphabetical),
    ("title", SortKey::Alphabetical),
];

impl FromStr for SortKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        SORT_ALIASES
            .iter()
            .find(|(alias, _)| *alias == wanted)
            .map(|(_, key)| *key)
            .or_else(|| Self::ALL_VARIANTS.iter().copied().find(|k| k.as_str() == wanted))
            .ok_or_else(|| CoreError::UnknownSortKey(s.to_owned()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    #[serde(rename = "asc", alias = "ascending")]
    Ascending,
    #[serde(rename = "desc", alias = "descending")]
    Descending,
}

impl SortDirection {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match *self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }

    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    const fn apply(self, ord: Ordering) -> Ordering {
        match self {
            Self::Ascending => ord,
            Self::Descending => ord.reverse(),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            _ => Err(CoreError::UnknownSortDirection(s.to_owned())),
        }
    }
}

/// A record's value under some [`SortKey`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortValue<'a> {
    Number(f64),
    Time(DateTime<Utc>),
    Text(&'a str),
    /// Position in an ordinal table such as audience size.
    Rank(u8),
}

impl SortValue<'_> {
    /// Ascending comparison. Values of different variants compare equal.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Time(a), Self::Time(b)) => a.cmp(b),
            (Self::Text(a), Self::Text(b)) => locale_cmp(a, b),
            (Self::Rank(a), Self::Rank(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

/// Fold a string for collation: compatibility decomposition, combining marks
/// dropped, lowercased.
#[must_use]
pub fn collation_key(s: &str) -> String {
    s.nfkd().filter(|c| !is_combining_mark(*c)).flat_map(char::to_lowercase).collect()
}

/// Case- and accent-insensitive ordering with the raw string as tie-break,
/// so distinct strings never compare equal.
#[must_use]
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    collation_key(a).cmp(&collation_key(b)).then_with(|| a.cmp(b))
}

/// Comparator for `key` in `direction`. Stable sorts with it keep ties in
/// input order, and records without a value stay last either way.
pub fn comparator_for<R: ListRecord>(key: SortKey, direction: SortDirection) -> impl Fn(&R, &R) -> Ordering {
    move |a, b| match (a.sort_value(key), b.sort_value(key)) {
        (Some(x), Some(y)) => direction.apply(x.compare(&y)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable in-place sort of an already filtered view.
pub fn sort_records<R: ListRecord>(records: &mut [&R], key: SortKey, direction: SortDirection) {
    let cmp = comparator_for::<R>(key, direction);
    records.sort_by(|a, b| cmp(a, b));
}
