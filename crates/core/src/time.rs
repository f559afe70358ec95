//! Timestamp parsing and day arithmetic.
//!
//! All instants are `DateTime<Utc>`. Backend timestamps without an offset are
//! read as UTC, and day counts are derived from the exact duration between two
//! instants, so results never depend on the host's local timezone.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::constants::SECONDS_PER_DAY;
use crate::error::{CoreError, Result};

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse an RFC 3339 timestamp, a naive ISO timestamp (taken as UTC) or a
/// bare `YYYY-MM-DD` date (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }
    Err(CoreError::InvalidTimestamp(raw.to_owned()))
}

/// Fractional days from `from` to `to` (negative when `to` is earlier).
#[must_use]
pub fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    let millis = to.signed_duration_since(from).num_milliseconds();
    #[allow(clippy::cast_precision_loss, reason = "day counts stay far below 2^52 ms")]
    let days = millis as f64 / (SECONDS_PER_DAY as f64 * 1000.0);
    days
}

/// Whole days elapsed since `then`, rounded down ("Sent 3 days ago").
#[must_use]
pub fn days_since(then: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    #[allow(clippy::cast_possible_truncation, reason = "floored day count")]
    let days = days_between(then, now).floor() as i64;
    days
}

/// Whole days until `then`, rounded up ("In 3 days").
#[must_use]
pub fn days_until(then: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    #[allow(clippy::cast_possible_truncation, reason = "ceiled day count")]
    let days = days_between(now, then).ceil() as i64;
    days
}

/// Serde adapters for backend timestamps.
pub mod serde_ts {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&ts.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_timestamp(&raw).map_err(serde::de::Error::custom)
    }

    /// Optional timestamps: `null`, a missing field and `""` all read as `None`.
    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            ts: &Option<DateTime<Utc>>,
            s: S,
        ) -> Result<S::Ok, S::Error> {
            match ts {
                Some(ts) => s.serialize_str(&ts.to_rfc3339()),
                None => s.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            d: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            match Option::<String>::deserialize(d)? {
                Some(raw) if !raw.trim().is_empty() => {
                    super::super::parse_timestamp(&raw).map(Some).map_err(serde::de::Error::custom)
                },
                _ => Ok(None),
            }
        }
    }
}
