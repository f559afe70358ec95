//! Shared constants for ecco-view.
//!
//! Thresholds and sentinels used by more than one page live here.

/// Selection value meaning "no constraint" on categorical selects.
pub const SENTINEL_ALL: &str = "all";

/// Selection value meaning "no constraint" on score and size selects.
pub const SENTINEL_ANY: &str = "any";

/// A sent message without a reply needs a follow-up after this many days.
pub const FOLLOW_UP_THRESHOLD_DAYS: i64 = 7;

/// Leads at or above this relevance score count as high value.
pub const HIGH_VALUE_RELEVANCE: f64 = 8.0;

/// A survey needs this many responses before a PMF score can be computed.
pub const MIN_RESPONSES_FOR_SCORE: u32 = 5;

/// Sean Ellis score (percent "very disappointed") that counts as product-market fit.
pub const PMF_THRESHOLD_PERCENT: f64 = 40.0;

/// Page size used when the caller does not pick one.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Upper bound for any page size (matches the backend's `page_size` cap).
pub const MAX_PAGE_SIZE: usize = 1000;

/// Delay before an auto-saved field is sent to the backend.
pub const AUTO_SAVE_DELAY_MS: u64 = 500;

pub const SECONDS_PER_DAY: i64 = 86_400;

/// Returns `true` for values that impose no filter constraint.
#[must_use]
pub fn is_sentinel(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case(SENTINEL_ALL)
        || trimmed.eq_ignore_ascii_case(SENTINEL_ANY)
}
