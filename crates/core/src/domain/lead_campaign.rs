//! Lead generation campaigns: scraping jobs that collect business contacts
//! from an external source.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::export::{MISSING_CELL, Tabular};
use crate::record::{FieldKind, ListRecord, RecordKind, Summarize};
use crate::sort::{SortKey, SortValue};
use crate::stats::count_by;

label_enum! {
    LeadSource ("lead source") {
        HunterIo => "hunter_io",
        GoogleMaps => "google_maps",
        Linkedin => "linkedin",
    }
}

label_enum! {
    /// Scrape job state.
    LeadCampaignStatus ("lead campaign") {
        Processing => "processing",
        Completed => "completed",
        Failed => "failed",
        Queued => "queued",
        Paused => "paused",
    }
}

fn queued() -> LeadCampaignStatus {
    LeadCampaignStatus::Queued
}

fn unknown_source() -> LeadSource {
    LeadSource::Unknown
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignOwner {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadCampaign {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "unknown_source")]
    pub source_type: LeadSource,
    #[serde(default = "queued")]
    pub status: LeadCampaignStatus,
    #[serde(default)]
    pub total_results: u32,
    /// Fraction done, `0.0..=1.0`, while processing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
    #[serde(default, with = "crate::time::serde_ts::option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "crate::time::serde_ts::option")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_by: CampaignOwner,
    #[serde(default)]
    pub search_params: Map<String, Value>,
}

impl LeadCampaign {
    /// Whole-percent progress; finished jobs report 100.
    #[must_use]
    pub fn progress_percent(&self) -> u32 {
        match self.status {
            LeadCampaignStatus::Completed => 100,
            _ => {
                let fraction = self.progress.unwrap_or(0.0).clamp(0.0, 1.0);
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    reason = "clamped to 0..=100"
                )]
                let percent = (fraction * 100.0).round() as u32;
                percent
            },
        }
    }
}

impl ListRecord for LeadCampaign {
    const KIND: RecordKind = RecordKind::LeadCampaign;

    fn id(&self) -> &str {
        &self.id
    }

    fn text(&self, field: &str) -> Option<&str> {
        match field {
            "name" => Some(&self.name),
            "source_type" | "source" => Some(self.source_type.as_str()),
            "status" => Some(self.status.as_str()),
            "created_by" | "created_by_user_id" => Some(&self.created_by.id),
            "created_by_name" => Some(&self.created_by.name),
            _ => None,
        }
    }

    fn number(&self, field: &str) -> Option<f64> {
        match field {
            "total_results" | "results" | "results_min" | "results_max" => Some(f64::from(self.total_results)),
            "progress" => self.progress,
            _ => None,
        }
    }

    fn timestamp(&self, field: &str) -> Option<DateTime<Utc>> {
        match field {
            "created_at" | "date_from" | "date_to" => self.created_at,
            "updated_at" => self.updated_at,
            _ => None,
        }
    }

    /// Name, id, and the keys and string values of the search parameters.
    fn search_fields(&self) -> Vec<&str> {
        let params = self
            .search_params
            .iter()
            .flat_map(|(key, value)| std::iter::once(key.as_str()).chain(value.as_str()));
        [self.name.as_str(), self.id.as_str()].into_iter().chain(params).collect()
    }

    fn sort_value(&self, key: SortKey) -> Option<SortValue<'_>> {
        match key {
            SortKey::Alphabetical => Some(SortValue::Text(&self.name)),
            SortKey::Results => Some(SortValue::Number(f64::from(self.total_results))),
            SortKey::Newest | SortKey::Oldest | SortKey::Relevance => self.created_at.map(SortValue::Time),
            SortKey::Updated => self.updated_at.map(SortValue::Time),
            _ => None,
        }
    }

    fn field_kind(field: &str) -> FieldKind {
        match field {
            "total_results" | "results" | "results_min" | "progress" => FieldKind::Number,
            "results_max" => FieldKind::Ceiling,
            "created_at" | "updated_at" => FieldKind::Time,
            "date_from" => FieldKind::Since,
            "date_to" => FieldKind::Until,
            "source_type" | "source" | "status" | "created_by" | "created_by_user_id" => FieldKind::Labels,
            _ => FieldKind::Category,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadCampaignStats {
    pub total: usize,
    pub processing: usize,
    pub completed: usize,
    pub failed: usize,
    pub queued: usize,
    pub paused: usize,
    pub by_source: BTreeMap<String, usize>,
    /// Sum of `total_results` over every campaign.
    pub total_results: u64,
}

impl LeadCampaignStats {
    #[must_use]
    pub fn source_count(&self, source: LeadSource) -> usize {
        self.by_source.get(source.as_str()).copied().unwrap_or(0)
    }
}

impl Summarize for LeadCampaign {
    type Stats = LeadCampaignStats;

    fn aggregate<'a, I>(records: I, _now: DateTime<Utc>) -> LeadCampaignStats
    where
        I: IntoIterator<Item = &'a Self>,
        Self: 'a,
    {
        let records: Vec<&Self> = records.into_iter().collect();
        let mut stats = LeadCampaignStats {
            total: records.len(),
            by_source: count_by(records.iter().copied(), |c| Some(c.source_type.as_str().to_owned())),
            ..LeadCampaignStats::default()
        };
        for campaign in records {
            stats.total_results += u64::from(campaign.total_results);
            match campaign.status {
                LeadCampaignStatus::Processing => stats.processing += 1,
                LeadCampaignStatus::Completed => stats.completed += 1,
                LeadCampaignStatus::Failed => stats.failed += 1,
                LeadCampaignStatus::Queued => stats.queued += 1,
                LeadCampaignStatus::Paused => stats.paused += 1,
                _ => {},
            }
        }
        stats
    }
}

impl Tabular for LeadCampaign {
    fn headers() -> &'static [&'static str] {
        &["Name", "Source", "Status", "Results", "Progress", "Created By", "Created At"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.source_type.as_str().to_owned(),
            self.status.as_str().to_owned(),
            self.total_results.to_string(),
            format!("{}%", self.progress_percent()),
            self.created_by.name.clone(),
            self.created_at.map_or_else(|| MISSING_CELL.to_owned(), |ts| ts.to_rfc3339()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::sort::SortDirection;
    use crate::view::{ViewState, query};

    fn now() -> DateTime<Utc> {
        crate::time::parse_timestamp("2025-06-01T00:00:00Z").unwrap()
    }

    fn campaigns() -> Vec<LeadCampaign> {
        serde_json::from_value(json!([
            {"id": "camp_1", "name": "B2B SaaS Companies - San Francisco", "source_type": "hunter_io",
             "status": "processing", "total_results": 120, "progress": 0.42,
             "created_at": "2025-05-02T10:00:00Z", "updated_at": "2025-05-31T09:00:00Z",
             "created_by": {"id": "user_1", "name": "Sarah Johnson", "email": "sarah@company.com"},
             "search_params": {"industry": "Technology", "location": "San Francisco"}},
            {"id": "camp_2", "name": "Restaurants - Portland", "source_type": "google_maps",
             "status": "completed", "total_results": 480,
             "created_at": "2025-05-20T08:00:00Z", "updated_at": "2025-05-21T08:00:00Z",
             "created_by": {"id": "user_2", "name": "Michael Chen", "email": "michael@company.com"},
             "search_params": {"location": "Portland, OR", "query": "restaurants"}},
            {"id": "camp_3", "name": "Marketing managers", "source_type": "linkedin",
             "status": "failed", "total_results": 0,
             "created_at": "2025-04-11T12:00:00Z", "updated_at": "2025-04-11T12:05:00Z",
             "created_by": {"id": "user_1", "name": "Sarah Johnson", "email": "sarah@company.com"},
             "search_params": {"type": "Profile Search", "keyword": "marketing manager"}},
            {"id": "camp_4", "name": "Fitness Centers - Denver", "source_type": "google_maps",
             "status": "queued", "total_results": 35,
             "created_at": "2025-05-30T18:00:00Z",
             "created_by": {"id": "user_3", "name": "Emily Rodriguez", "email": "emily@company.com"}}
        ]))
        .unwrap()
    }

    fn ids(list: &[LeadCampaign], state: &ViewState) -> Vec<String> {
        query(list, state, now()).unwrap().items.iter().map(|c| c.id.clone()).collect()
    }

    #[test]
    fn stats_count_status_and_source() {
        let stats = LeadCampaign::aggregate(&campaigns(), now());
        assert_eq!(stats.total, 4);
        assert_eq!(
            (stats.processing, stats.completed, stats.failed, stats.queued, stats.paused),
            (1, 1, 1, 1, 0)
        );
        assert_eq!(stats.source_count(LeadSource::GoogleMaps), 2);
        assert_eq!(stats.source_count(LeadSource::Linkedin), 1);
        assert_eq!(stats.total_results, 635);
    }

    #[test]
    fn results_range_is_inclusive() {
        let list = campaigns();
        let state = ViewState::new().select("results_min", "35").select("results_max", "120");
        assert_eq!(ids(&list, &state), vec!["camp_1", "camp_4"]);
        let state = ViewState::new().select("results_max", "0");
        assert_eq!(ids(&list, &state), vec!["camp_3"]);
    }

    #[test]
    fn created_date_bounds() {
        let list = campaigns();
        let state = ViewState::new().select("date_from", "2025-05-01").select("date_to", "2025-05-20T08:00:00Z");
        assert_eq!(ids(&list, &state), vec!["camp_1", "camp_2"]);
        let state = ViewState::new().select("created_at", "2025-05-25..");
        assert_eq!(ids(&list, &state), vec!["camp_4"]);
    }

    #[test]
    fn source_status_and_owner_selects() {
        let list = campaigns();
        assert_eq!(ids(&list, &ViewState::new().select("source_type", "google_maps")), vec!["camp_2", "camp_4"]);
        assert_eq!(
            ids(&list, &ViewState::new().select("status", "processing,queued")),
            vec!["camp_1", "camp_4"]
        );
        assert_eq!(
            ids(&list, &ViewState::new().select("created_by_user_id", "user_1")),
            vec!["camp_1", "camp_3"]
        );
    }

    #[test]
    fn search_reaches_search_params() {
        let list = campaigns();
        assert_eq!(ids(&list, &ViewState::new().search("portland")), vec!["camp_2"]);
        assert_eq!(ids(&list, &ViewState::new().search("TECHNOLOGY")), vec!["camp_1"]);
        assert_eq!(ids(&list, &ViewState::new().search("camp_3")), vec!["camp_3"]);
    }

    #[test]
    fn column_sorts_in_both_directions() {
        let list = campaigns();
        assert_eq!(
            ids(&list, &ViewState::new().sort(SortKey::Newest)),
            vec!["camp_4", "camp_2", "camp_1", "camp_3"]
        );
        assert_eq!(
            ids(&list, &ViewState::new().sort(SortKey::Results).direction(SortDirection::Ascending)),
            vec!["camp_3", "camp_4", "camp_1", "camp_2"]
        );
        assert_eq!(
            ids(&list, &ViewState::new().sort(SortKey::Alphabetical)),
            vec!["camp_1", "camp_4", "camp_3", "camp_2"]
        );
        assert_eq!(
            ids(&list, &ViewState::new().sort(SortKey::Updated)),
            vec!["camp_1", "camp_2", "camp_3", "camp_4"]
        );
    }

    #[test]
    fn progress_and_export_row() {
        let list = campaigns();
        assert_eq!(list[0].progress_percent(), 42);
        assert_eq!(list[1].progress_percent(), 100);
        let row = list[3].row();
        assert_eq!(row.len(), LeadCampaign::headers().len());
        assert_eq!(row[4], "0%");
        assert_eq!(row[6], "2025-05-30T18:00:00+00:00");
    }
}
