use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::HIGH_VALUE_RELEVANCE;
use crate::export::{Tabular, number_cell};
use crate::record::{FieldKind, ListRecord, RecordKind, Summarize};
use crate::sort::{SortKey, SortValue};
use crate::stats::percent;

label_enum! {
    LeadStatus ("podcast lead") {
        New => "new",
        Researching => "researching",
        ReadyToPitch => "ready_to_pitch",
        Contacted => "contacted",
        Pitched => "pitched",
        FollowUpSent => "follow_up_sent",
        Responded => "responded",
        Booked => "booked",
        Appeared => "appeared",
        Rejected => "rejected",
    }
}

impl LeadStatus {
    /// Statuses counted as "not contacted" on the summary cards.
    #[must_use]
    pub const fn is_not_contacted(&self) -> bool {
        matches!(*self, Self::New | Self::Researching | Self::ReadyToPitch)
    }
}

label_enum! {
    /// Estimated listener base, ordered small to very large.
    AudienceSize ("audience size") {
        Small => "small",
        Medium => "medium",
        Large => "large",
        VeryLarge => "very_large",
    }
}

impl AudienceSize {
    /// Rank used by the audience sort; unknown sizes rank lowest.
    #[must_use]
    pub const fn rank(&self) -> u8 {
        match *self {
            Self::VeryLarge => 4,
            Self::Large => 3,
            Self::Medium => 2,
            Self::Small => 1,
            Self::Unknown => 0,
        }
    }
}

label_enum! {
    PriorityLevel ("priority") {
        Low => "low",
        Medium => "medium",
        High => "high",
        Critical => "critical",
    }
}

fn new_status() -> LeadStatus {
    LeadStatus::New
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PodcastLead {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign_id: Option<String>,
    #[serde(default)]
    pub podcast_name: String,
    #[serde(default)]
    pub podcast_description: String,
    #[serde(default)]
    pub host_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_email: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub relevance_score: Option<f64>,
    #[serde(default)]
    pub opportunity_score: Option<f64>,
    #[serde(default)]
    pub icp_alignment_score: Option<f64>,
    #[serde(default)]
    pub estimated_audience_size: Option<AudienceSize>,
    #[serde(default = "new_status")]
    pub outreach_status: LeadStatus,
    #[serde(default)]
    pub priority_level: Option<PriorityLevel>,
    #[serde(default)]
    pub total_episodes: Option<u32>,
    #[serde(default, with = "crate::time::serde_ts::option")]
    pub created_at: Option<DateTime<Utc>>,
}

impl PodcastLead {
    #[must_use]
    pub fn is_high_value(&self) -> bool {
        self.relevance_score.is_some_and(|s| s >= HIGH_VALUE_RELEVANCE)
    }
}

impl ListRecord for PodcastLead {
    const KIND: RecordKind = RecordKind::PodcastLead;

    fn id(&self) -> &str {
        &self.id
    }

    fn text(&self, field: &str) -> Option<&str> {
        match field {
            "podcast_name" | "name" => Some(&self.podcast_name),
            "host_name" => Some(&self.host_name),
            "campaign_id" | "campaign" => self.campaign_id.as_deref(),
            "category" => self.category.as_deref(),
            "outreach_status" | "status" => Some(self.outreach_status.as_str()),
            "estimated_audience_size" | "audience" => {
                self.estimated_audience_size.as_ref().map(AudienceSize::as_str)
            },
            "priority_level" | "priority" => self.priority_level.as_ref().map(PriorityLevel::as_str),
            _ => None,
        }
    }

    fn number(&self, field: &str) -> Option<f64> {
        match field {
            "relevance_score" | "min_relevance" => self.relevance_score,
            "opportunity_score" => self.opportunity_score,
            "icp_alignment_score" | "min_score" => self.icp_alignment_score,
            _ => None,
        }
    }

    fn timestamp(&self, field: &str) -> Option<DateTime<Utc>> {
        (field == "created_at").then_some(self.created_at).flatten()
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.podcast_name, &self.host_name, &self.podcast_description]
    }

    fn sort_value(&self, key: SortKey) -> Option<SortValue<'_>> {
        match key {
            SortKey::Relevance => self.relevance_score.map(SortValue::Number),
            SortKey::IcpScore => self.icp_alignment_score.map(SortValue::Number),
            SortKey::Audience => Some(SortValue::Rank(
                self.estimated_audience_size.map_or(0, |size| size.rank()),
            )),
            SortKey::Newest | SortKey::Oldest => self.created_at.map(SortValue::Time),
            SortKey::Alphabetical => Some(SortValue::Text(&self.podcast_name)),
            _ => None,
        }
    }

    fn field_kind(field: &str) -> FieldKind {
        match field {
            "relevance_score" | "min_relevance" | "opportunity_score" | "icp_alignment_score"
            | "min_score" => FieldKind::Number,
            "outreach_status" | "status" | "estimated_audience_size" | "audience" | "priority_level"
            | "priority" => FieldKind::Labels,
            "created_at" => FieldKind::Time,
            _ => FieldKind::Category,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadStats {
    pub total: usize,
    pub high_value: usize,
    pub not_contacted: usize,
    pub pitched: usize,
    pub responded: usize,
    /// `responded / pitched` as a whole percentage.
    pub response_rate: u32,
    /// `high_value / total` as a whole percentage.
    pub high_value_share: u32,
}

impl Summarize for PodcastLead {
    type Stats = LeadStats;

    fn aggregate<'a, I>(records: I, _now: DateTime<Utc>) -> LeadStats
    where
        I: IntoIterator<Item = &'a Self>,
        Self: 'a,
    {
        let mut stats = LeadStats::default();
        for lead in records {
            stats.total += 1;
            if lead.is_high_value() {
                stats.high_value += 1;
            }
            if lead.outreach_status.is_not_contacted() {
                stats.not_contacted += 1;
            }
            match lead.outreach_status {
                LeadStatus::Pitched => stats.pitched += 1,
                LeadStatus::Responded => stats.responded += 1,
                _ => {},
            }
        }
        stats.response_rate = percent(stats.responded, stats.pitched);
        stats.high_value_share = percent(stats.high_value, stats.total);
        stats
    }
}

impl Tabular for PodcastLead {
    fn headers() -> &'static [&'static str] {
        &["Podcast", "Host", "Category", "Audience", "Relevance", "Status", "Priority"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.podcast_name.clone(),
            self.host_name.clone(),
            self.category.clone().unwrap_or_default(),
            self.estimated_audience_size.map(|a| a.as_str().to_owned()).unwrap_or_default(),
            number_cell(self.relevance_score),
            self.outreach_status.as_str().to_owned(),
            self.priority_level.map(|p| p.as_str().to_owned()).unwrap_or_default(),
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

    fn leads() -> Vec<PodcastLead> {
        serde_json::from_value(json!([
            {"id": "l1", "podcast_name": "Marketing Over Coffee", "host_name": "John Wall",
             "relevance_score": 9.1, "estimated_audience_size": "large", "outreach_status": "pitched",
             "created_at": "2025-03-01T00:00:00Z", "campaign_id": "c1"},
            {"id": "l2", "podcast_name": "SaaS Growth Show", "host_name": "Ana Ruiz",
             "relevance_score": 7.5, "estimated_audience_size": "very_large", "outreach_status": "responded",
             "created_at": "2025-04-01T00:00:00Z", "campaign_id": "c2"},
            {"id": "l3", "podcast_name": "Founders Talk", "host_name": "Adam",
             "relevance_score": 8.0, "estimated_audience_size": "mega", "outreach_status": "new",
             "created_at": "2025-02-01T00:00:00Z", "campaign_id": "c1"},
            {"id": "l4", "podcast_name": "the B2B Hour", "host_name": "Kim",
             "outreach_status": "ready_to_pitch", "priority_level": "high"}
        ]))
        .unwrap()
    }

    #[test]
    fn lead_stats_follow_card_definitions() {
        let stats = PodcastLead::aggregate(&leads(), now());
        assert_eq!(stats.total, 4);
        assert_eq!(stats.high_value, 2);
        assert_eq!(stats.not_contacted, 2);
        assert_eq!(stats.pitched, 1);
        assert_eq!(stats.responded, 1);
        assert_eq!(stats.response_rate, 100);
        assert_eq!(stats.high_value_share, 50);
    }

    #[test]
    fn empty_lead_stats_have_zero_ratios() {
        let stats = PodcastLead::aggregate(&[], now());
        assert_eq!(stats.response_rate, 0);
        assert_eq!(stats.high_value_share, 0);
    }

    #[test]
    fn search_marketing_matches_first_show_only() {
        let list = leads();
        let view = query(&list, &ViewState::new().search("marketing"), now()).unwrap();
        let ids: Vec<&str> = view.items.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["l1"]);
    }

    #[test]
    fn audience_sort_ranks_unknown_sizes_lowest() {
        let list = leads();
        let view = query(&list, &ViewState::new().sort(SortKey::Audience), now()).unwrap();
        let ids: Vec<&str> = view.items.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["l2", "l1", "l3", "l4"]);
    }

    #[test]
    fn relevance_threshold_and_campaign_filter() {
        let list = leads();
        let state = ViewState::new()
            .select("campaign_id", "c1")
            .select("min_relevance", "8")
            .sort(SortKey::Relevance);
        let view = query(&list, &state, now()).unwrap();
        let ids: Vec<&str> = view.items.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["l1", "l3"]);
    }

    #[test]
    fn audience_select_uses_wire_label() {
        let list = leads();
        let view = query(&list, &ViewState::new().select("audience", "very_large"), now()).unwrap();
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.items[0].id, "l2");
        assert_eq!(list[2].estimated_audience_size, Some(AudienceSize::Unknown));
    }
}
