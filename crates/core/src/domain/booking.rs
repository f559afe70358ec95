use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::export::Tabular;
use crate::filter::{DateWindow, FieldFilter, Predicate};
use crate::record::{FieldKind, ListRecord, RecordKind, Summarize};
use crate::sort::{SortKey, SortValue};
use crate::time::days_until;

label_enum! {
    /// Recording lifecycle, from first scheduling through publication.
    BookingStatus ("booking") {
        Scheduled => "scheduled",
        Confirmed => "confirmed",
        PrepInProgress => "prep_in_progress",
        ReadyToRecord => "ready_to_record",
        Recorded => "recorded",
        Editing => "editing",
        ScheduledToPublish => "scheduled_to_publish",
        Published => "published",
        Cancelled => "cancelled",
    }
}

impl BookingStatus {
    /// Statuses of a booking that has not been recorded yet.
    pub const PRE_RECORDING: &'static [Self] =
        &[Self::Scheduled, Self::Confirmed, Self::PrepInProgress, Self::ReadyToRecord];

    #[must_use]
    pub fn is_pre_recording(&self) -> bool {
        Self::PRE_RECORDING.contains(self)
    }

    /// Recorded but not yet published.
    #[must_use]
    pub const fn is_post_production(&self) -> bool {
        matches!(*self, Self::Recorded | Self::Editing | Self::ScheduledToPublish)
    }
}

fn scheduled() -> BookingStatus {
    BookingStatus::Scheduled
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    #[serde(default)]
    pub lead_id: String,
    /// Denormalized from the lead for display and search.
    #[serde(default)]
    pub podcast_name: String,
    #[serde(default)]
    pub host_name: String,
    #[serde(default)]
    pub episode_title: String,
    #[serde(default = "scheduled")]
    pub booking_status: BookingStatus,
    #[serde(default, with = "crate::time::serde_ts::option")]
    pub scheduled_recording_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recording_platform: Option<String>,
    #[serde(default, with = "crate::time::serde_ts::option")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Booking {
    /// Scheduled strictly after `now` and not yet recorded.
    #[must_use]
    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.booking_status.is_pre_recording()
            && self.scheduled_recording_date.is_some_and(|date| date > now)
    }
}

fn status_set(statuses: &[BookingStatus]) -> Predicate {
    Predicate::OneOf(statuses.iter().map(|s| s.as_str().to_owned()).collect())
}

impl ListRecord for Booking {
    const KIND: RecordKind = RecordKind::Booking;

    fn id(&self) -> &str {
        &self.id
    }

    fn text(&self, field: &str) -> Option<&str> {
        match field {
            "lead_id" => Some(&self.lead_id),
            "podcast_name" | "name" => Some(&self.podcast_name),
            "host_name" => Some(&self.host_name),
            "episode_title" => Some(&self.episode_title),
            "booking_status" | "status" => Some(self.booking_status.as_str()),
            "recording_platform" => self.recording_platform.as_deref(),
            _ => None,
        }
    }

    fn number(&self, field: &str) -> Option<f64> {
        match field {
            "duration_minutes" => self.duration_minutes.map(f64::from),
            _ => None,
        }
    }

    fn timestamp(&self, field: &str) -> Option<DateTime<Utc>> {
        match field {
            "scheduled_recording_date" | "date_range" | "date" => self.scheduled_recording_date,
            "created_at" => self.created_at,
            _ => None,
        }
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.podcast_name, &self.host_name, &self.episode_title]
    }

    fn sort_value(&self, key: SortKey) -> Option<SortValue<'_>> {
        match key {
            SortKey::Soonest | SortKey::Latest => self.scheduled_recording_date.map(SortValue::Time),
            SortKey::Newest | SortKey::Oldest => self.created_at.map(SortValue::Time),
            SortKey::Alphabetical => Some(SortValue::Text(&self.podcast_name)),
            _ => None,
        }
    }

    fn field_kind(field: &str) -> FieldKind {
        match field {
            "scheduled_recording_date" | "date_range" | "date" | "created_at" => FieldKind::Time,
            "duration_minutes" => FieldKind::Number,
            "booking_status" | "status" => FieldKind::Labels,
            _ => FieldKind::Category,
        }
    }

    fn tab_filters(tab: &str, now: DateTime<Utc>) -> Result<Vec<FieldFilter>> {
        let filters = match tab.trim().to_lowercase().as_str() {
            "" | "all" => Vec::new(),
            "upcoming" => vec![
                FieldFilter::new(
                    "scheduled_recording_date",
                    Predicate::Within(DateWindow::Upcoming.resolve(now)),
                ),
                FieldFilter::new("booking_status", status_set(BookingStatus::PRE_RECORDING)),
            ],
            "prep" => vec![FieldFilter::new(
                "booking_status",
                Predicate::Equals(BookingStatus::PrepInProgress.as_str().to_owned()),
            )],
            "recorded" => vec![FieldFilter::new(
                "booking_status",
                status_set(&[BookingStatus::Recorded, BookingStatus::Editing]),
            )],
            "published" => vec![FieldFilter::new(
                "booking_status",
                Predicate::Equals(BookingStatus::Published.as_str().to_owned()),
            )],
            _ => {
                return Err(CoreError::UnknownTab { kind: Self::KIND.as_str(), tab: tab.to_owned() });
            },
        };
        Ok(filters)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingStats {
    pub total: usize,
    pub upcoming: usize,
    /// Recorded, editing or scheduled to publish.
    pub recorded: usize,
    pub published: usize,
    /// Whole days (rounded up) until the earliest future recording; 0 when none.
    pub days_until_next: i64,
}

impl Summarize for Booking {
    type Stats = BookingStats;

    fn aggregate<'a, I>(records: I, now: DateTime<Utc>) -> BookingStats
    where
        I: IntoIterator<Item = &'a Self>,
        Self: 'a,
    {
        let mut stats = BookingStats::default();
        let mut next: Option<DateTime<Utc>> = None;
        for booking in records {
            stats.total += 1;
            if booking.is_upcoming(now) {
                stats.upcoming += 1;
            }
            if booking.booking_status.is_post_production() {
                stats.recorded += 1;
            }
            if booking.booking_status == BookingStatus::Published {
                stats.published += 1;
            }
            // Any future date counts here, whatever the status.
            if let Some(date) = booking.scheduled_recording_date.filter(|d| *d > now) {
                next = Some(next.map_or(date, |n| n.min(date)));
            }
        }
        stats.days_until_next = next.map_or(0, |date| days_until(date, now));
        stats
    }
}

impl Tabular for Booking {
    fn headers() -> &'static [&'static str] {
        &["Podcast", "Host", "Episode", "Status", "Recording Date", "Duration (min)"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.podcast_name.clone(),
            self.host_name.clone(),
            self.episode_title.clone(),
            self.booking_status.as_str().to_owned(),
            self.scheduled_recording_date.map(|d| d.to_rfc3339()).unwrap_or_default(),
            self.duration_minutes.map(|d| d.to_string()).unwrap_or_default(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::view::{ViewState, query};

    fn now() -> DateTime<Utc> {
        crate::time::parse_timestamp("2025-06-01T12:00:00Z").unwrap()
    }

    fn booking(id: &str, status: BookingStatus, offset_hours: Option<i64>) -> Booking {
        Booking {
            id: id.to_owned(),
            lead_id: format!("lead-{id}"),
            podcast_name: format!("Show {id}"),
            host_name: String::new(),
            episode_title: String::new(),
            booking_status: status,
            scheduled_recording_date: offset_hours.map(|h| now() + Duration::hours(h)),
            duration_minutes: Some(45),
            recording_platform: None,
            created_at: None,
        }
    }

    fn bookings() -> Vec<Booking> {
        vec![
            booking("b1", BookingStatus::Confirmed, Some(60)),
            booking("b2", BookingStatus::Recorded, Some(-48)),
            booking("b3", BookingStatus::PrepInProgress, Some(24 * 40)),
            booking("b4", BookingStatus::Published, Some(-24 * 20)),
            booking("b5", BookingStatus::Scheduled, Some(-5)),
            booking("b6", BookingStatus::ScheduledToPublish, None),
        ]
    }

    #[test]
    fn stats_match_card_definitions() {
        let stats = Booking::aggregate(&bookings(), now());
        assert_eq!(stats.total, 6);
        assert_eq!(stats.upcoming, 2);
        assert_eq!(stats.recorded, 2);
        assert_eq!(stats.published, 1);
        assert_eq!(stats.days_until_next, 3);
    }

    #[test]
    fn no_future_booking_means_zero_days() {
        let list = vec![booking("b1", BookingStatus::Recorded, Some(-1))];
        assert_eq!(Booking::aggregate(&list, now()).days_until_next, 0);
    }

    #[test]
    fn tabs_expand_into_predicates() {
        let list = bookings();
        let ids = |tab: &str| -> Vec<String> {
            let view = query(&list, &ViewState::new().tab(tab), now()).unwrap();
            view.items.iter().map(|b| b.id.clone()).collect()
        };
        assert_eq!(ids("upcoming"), vec!["b1", "b3"]);
        assert_eq!(ids("prep"), vec!["b3"]);
        assert_eq!(ids("recorded"), vec!["b2"]);
        assert_eq!(ids("published"), vec!["b4"]);
        assert_eq!(ids("all").len(), 6);
    }

    #[test]
    fn unknown_tab_is_rejected() {
        let list = bookings();
        let err = query(&list, &ViewState::new().tab("drafts"), now()).unwrap_err();
        assert!(matches!(err, CoreError::UnknownTab { kind: "booking", .. }));
    }

    #[test]
    fn date_range_windows() {
        let list = bookings();
        let next = query(&list, &ViewState::new().select("date_range", "next_30"), now()).unwrap();
        let ids: Vec<&str> = next.items.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["b1"]);

        let past = query(&list, &ViewState::new().select("date_range", "past_30"), now()).unwrap();
        let ids: Vec<&str> = past.items.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["b2", "b4", "b5"]);
    }

    #[test]
    fn soonest_and_latest_put_undated_last() {
        let list = bookings();
        let soonest = query(&list, &ViewState::new().sort(SortKey::Soonest), now()).unwrap();
        let ids: Vec<&str> = soonest.items.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["b4", "b2", "b5", "b1", "b3", "b6"]);

        let latest = query(&list, &ViewState::new().sort(SortKey::Latest), now()).unwrap();
        let ids: Vec<&str> = latest.items.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["b3", "b1", "b5", "b2", "b4", "b6"]);
    }

    #[test]
    fn naive_backend_dates_deserialize_as_utc() {
        let booking: Booking = serde_json::from_value(serde_json::json!({
            "id": "b9",
            "booking_status": "ready_to_record",
            "scheduled_recording_date": "2025-06-03T09:00:00",
            "actual_recording_date": null
        }))
        .unwrap();
        assert_eq!(booking.booking_status, BookingStatus::ReadyToRecord);
        assert_eq!(
            booking.scheduled_recording_date.unwrap().to_rfc3339(),
            "2025-06-03T09:00:00+00:00"
        );
        assert!(booking.is_upcoming(now()));
    }

    #[test]
    fn status_labels_parse_case_insensitively() {
        assert_eq!(" Confirmed ".parse::<BookingStatus>().unwrap(), BookingStatus::Confirmed);
        assert_eq!(
            "prep_in_progress".parse::<BookingStatus>().unwrap(),
            BookingStatus::PrepInProgress
        );
        let err = "cancelled-ish".parse::<BookingStatus>().unwrap_err();
        assert!(matches!(err, CoreError::InvalidStatus { kind: "booking", .. }));
    }
}
