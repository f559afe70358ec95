//! The capability set the list engine needs from a domain record.
//!
//! Field lookups are by name so that filter selections coming from the UI
//! (`"outreach_status" = "pitched"`) can be applied to any record type. A
//! lookup for a field the record does not have returns `None`, which the
//! engine treats as a non-match.

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::filter::FieldFilter;
use crate::sort::{SortKey, SortValue};

/// Which predicate family a field's UI selection maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Equality against one free-form label (platform, category). Commas
    /// are part of the label.
    Category,
    /// A multi-select over a fixed label set (status, priority):
    /// `"recorded,editing"` keeps either.
    Labels,
    /// `>=` threshold against a numeric score, or a `low..high` range.
    Number,
    /// `<=` ceiling (`max_followers`), or a `low..high` range.
    Ceiling,
    /// A date window (`next_30`, `upcoming`) or an absolute `from..to` range.
    Time,
    /// Instants at or after the given date (`date_from`).
    Since,
    /// Instants at or before the given date (`date_to`).
    Until,
    /// Boolean flag (`response_received`).
    Flag,
}

/// Static description of a record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Ambassador,
    PodcastLead,
    Campaign,
    Booking,
    OutreachMessage,
    LeadCampaign,
    Survey,
}

impl RecordKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match *self {
            Self::Ambassador => "ambassador",
            Self::PodcastLead => "podcast_lead",
            Self::Campaign => "campaign",
            Self::Booking => "booking",
            Self::OutreachMessage => "outreach_message",
            Self::LeadCampaign => "lead_campaign",
            Self::Survey => "survey",
        }
    }

    /// Capitalized singular label ("Podcast lead deleted").
    #[must_use]
    pub const fn singular_label(&self) -> &'static str {
        match *self {
            Self::Ambassador => "Ambassador",
            Self::PodcastLead => "Lead",
            Self::Campaign => "Campaign",
            Self::Booking => "Booking",
            Self::OutreachMessage => "Message",
            Self::LeadCampaign => "Campaign",
            Self::Survey => "Survey",
        }
    }

    /// Plural label used in notifications ("Failed to load podcast leads").
    #[must_use]
    pub const fn plural_label(&self) -> &'static str {
        match *self {
            Self::Ambassador => "ambassadors",
            Self::PodcastLead => "podcast leads",
            Self::Campaign => "campaigns",
            Self::Booking => "bookings",
            Self::OutreachMessage => "messages",
            Self::LeadCampaign => "lead campaigns",
            Self::Survey => "surveys",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub trait ListRecord {
    const KIND: RecordKind;

    /// Identifier, unique within a collection.
    fn id(&self) -> &str;

    /// Categorical or free-text field value.
    fn text(&self, field: &str) -> Option<&str>;

    fn number(&self, _field: &str) -> Option<f64> {
        None
    }

    fn timestamp(&self, _field: &str) -> Option<DateTime<Utc>> {
        None
    }

    fn flag(&self, _field: &str) -> Option<bool> {
        None
    }

    /// Fields the free-text search box matches against.
    fn search_fields(&self) -> Vec<&str>;

    /// Key used by the given sort mode, or `None` when this record has no
    /// value for it.
    fn sort_value(&self, key: SortKey) -> Option<SortValue<'_>>;

    /// Schema lookup for translating UI selections. Unknown fields default to
    /// categorical equality, which never matches a record lacking the field.
    fn field_kind(_field: &str) -> FieldKind {
        FieldKind::Category
    }

    /// Expand a page tab into predicates. `"all"` is always accepted.
    fn tab_filters(tab: &str, _now: DateTime<Utc>) -> Result<Vec<FieldFilter>> {
        if crate::constants::is_sentinel(tab) {
            Ok(Vec::new())
        } else {
            Err(crate::error::CoreError::UnknownTab {
                kind: Self::KIND.as_str(),
                tab: tab.to_owned(),
            })
        }
    }
}

/// Records that back a summary card row.
pub trait Summarize: ListRecord + Sized {
    type Stats;

    /// Pure aggregate over `records`; `now` feeds time-windowed flags.
    ///
    /// Accepts both the full collection (`&[Self]`) and a filtered view
    /// (`Vec<&Self>`).
    fn aggregate<'a, I>(records: I, now: DateTime<Utc>) -> Self::Stats
    where
        I: IntoIterator<Item = &'a Self>,
        Self: 'a;
}
