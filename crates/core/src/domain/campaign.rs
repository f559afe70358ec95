use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::export::Tabular;
use crate::record::{FieldKind, ListRecord, RecordKind, Summarize};
use crate::sort::{SortKey, SortValue};
use crate::stats::percent;

label_enum! {
    CampaignStatus ("campaign") {
        Active => "active",
        Paused => "paused",
        Completed => "completed",
        Archived => "archived",
    }
}

fn active() -> CampaignStatus {
    CampaignStatus::Active
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchCriteria {
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default)]
    pub use_icp_context: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub search_criteria: SearchCriteria,
    #[serde(default)]
    pub podcasts_found: u32,
    #[serde(default)]
    pub high_value_count: u32,
    #[serde(default)]
    pub outreach_sent: u32,
    #[serde(default)]
    pub responses_received: u32,
    #[serde(default)]
    pub bookings_confirmed: u32,
    #[serde(default = "active")]
    pub status: CampaignStatus,
    #[serde(default, with = "crate::time::serde_ts::option")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Campaign {
    /// Confirmed bookings per outreach sent, as a whole percentage.
    #[must_use]
    pub fn booking_rate(&self) -> u32 {
        percent(self.bookings_confirmed as usize, self.outreach_sent as usize)
    }
}

impl ListRecord for Campaign {
    const KIND: RecordKind = RecordKind::Campaign;

    fn id(&self) -> &str {
        &self.id
    }

    fn text(&self, field: &str) -> Option<&str> {
        match field {
            "name" => Some(&self.name),
            "status" => Some(self.status.as_str()),
            _ => None,
        }
    }

    fn number(&self, field: &str) -> Option<f64> {
        let value = match field {
            "podcasts_found" => self.podcasts_found,
            "high_value_count" => self.high_value_count,
            "outreach_sent" => self.outreach_sent,
            "responses_received" => self.responses_received,
            "bookings_confirmed" => self.bookings_confirmed,
            "booking_rate" => self.booking_rate(),
            _ => return None,
        };
        Some(f64::from(value))
    }

    fn timestamp(&self, field: &str) -> Option<DateTime<Utc>> {
        (field == "created_at").then_some(self.created_at).flatten()
    }

    fn search_fields(&self) -> Vec<&str> {
        std::iter::once(self.name.as_str())
            .chain(self.search_criteria.keywords.iter().map(String::as_str))
            .collect()
    }

    fn sort_value(&self, key: SortKey) -> Option<SortValue<'_>> {
        match key {
            SortKey::Podcasts => Some(SortValue::Number(f64::from(self.podcasts_found))),
            SortKey::Bookings => Some(SortValue::Number(f64::from(self.bookings_confirmed))),
            SortKey::Newest | SortKey::Oldest => self.created_at.map(SortValue::Time),
            SortKey::Alphabetical => Some(SortValue::Text(&self.name)),
            _ => None,
        }
    }

    fn field_kind(field: &str) -> FieldKind {
        match field {
            "podcasts_found" | "high_value_count" | "outreach_sent" | "responses_received"
            | "bookings_confirmed" | "booking_rate" => FieldKind::Number,
            "status" => FieldKind::Labels,
            "created_at" => FieldKind::Time,
            _ => FieldKind::Category,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignStats {
    pub all: usize,
    pub active: usize,
    pub paused: usize,
    pub completed: usize,
}

impl Summarize for Campaign {
    type Stats = CampaignStats;

    fn aggregate<'a, I>(records: I, _now: DateTime<Utc>) -> CampaignStats
    where
        I: IntoIterator<Item = &'a Self>,
        Self: 'a,
    {
        records.into_iter().fold(CampaignStats::default(), |mut stats, campaign| {
            stats.all += 1;
            match campaign.status {
                CampaignStatus::Active => stats.active += 1,
                CampaignStatus::Paused => stats.paused += 1,
                CampaignStatus::Completed => stats.completed += 1,
                _ => {},
            }
            stats
        })
    }
}

impl Tabular for Campaign {
    fn headers() -> &'static [&'static str] {
        &["Name", "Status", "Podcasts Found", "High Value", "Outreach Sent", "Responses", "Bookings", "Booking Rate"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.status.as_str().to_owned(),
            self.podcasts_found.to_string(),
            self.high_value_count.to_string(),
            self.outreach_sent.to_string(),
            self.responses_received.to_string(),
            self.bookings_confirmed.to_string(),
            format!("{}%", self.booking_rate()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::view::{ViewState, query};

    fn now() -> DateTime<Utc> {
        crate::time::parse_timestamp("2025-06-01T00:00:00Z").unwrap()
    }

    fn campaigns() -> Vec<Campaign> {
        serde_json::from_value(json!([
            {"id": "k1", "name": "Q1 SaaS push", "status": "active", "podcasts_found": 40,
             "outreach_sent": 12, "bookings_confirmed": 2, "created_at": "2025-01-10T00:00:00Z",
             "search_criteria": {"keywords": ["saas", "growth"]}},
            {"id": "k2", "name": "Fintech founders", "status": "paused", "podcasts_found": 15,
             "outreach_sent": 0, "bookings_confirmed": 0, "created_at": "2025-03-10T00:00:00Z",
             "search_criteria": {"keywords": ["payments"]}},
            {"id": "k3", "name": "Retail AI", "status": "completed", "podcasts_found": 40,
             "outreach_sent": 8, "bookings_confirmed": 3, "created_at": "2025-02-10T00:00:00Z"}
        ]))
        .unwrap()
    }

    #[test]
    fn booking_rate_guards_zero_outreach() {
        let list = campaigns();
        assert_eq!(list[0].booking_rate(), 17);
        assert_eq!(list[1].booking_rate(), 0);
        assert_eq!(list[2].booking_rate(), 38);
    }

    #[test]
    fn stats_count_by_status() {
        let stats = Campaign::aggregate(&campaigns(), now());
        assert_eq!(stats, CampaignStats { all: 3, active: 1, paused: 1, completed: 1 });
    }

    #[test]
    fn search_matches_keywords() {
        let list = campaigns();
        let view = query(&list, &ViewState::new().search("PAYMENTS"), now()).unwrap();
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].id, "k2");
    }

    #[test]
    fn podcasts_sort_is_stable_for_ties() {
        let list = campaigns();
        let view = query(&list, &ViewState::new().sort(SortKey::Podcasts), now()).unwrap();
        let ids: Vec<&str> = view.items.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["k1", "k3", "k2"]);
    }

    #[test]
    fn oldest_first() {
        let list = campaigns();
        let view = query(&list, &ViewState::new().select("status", "all").sort(SortKey::Oldest), now())
            .unwrap();
        let ids: Vec<&str> = view.items.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["k1", "k3", "k2"]);
    }
}
