use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::export::{Tabular, number_cell};
use crate::record::{FieldKind, ListRecord, RecordKind, Summarize};
use crate::sort::{SortKey, SortValue};
use crate::stats::count_by;

label_enum! {
    /// Where a brand ambassador sits in the outreach pipeline.
    AmbassadorStatus ("ambassador") {
        Identified => "identified",
        Contacted => "contacted",
        Responded => "responded",
        Negotiating => "negotiating",
        Active => "active",
        Declined => "declined",
        Inactive => "inactive",
    }
}

/// ICP alignment buckets shown as colored badges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBand {
    Excellent,
    Good,
    Fair,
    Poor,
    Unscored,
}

impl ScoreBand {
    pub const ALL_VARIANTS: &'static [Self] =
        &[Self::Excellent, Self::Good, Self::Fair, Self::Poor, Self::Unscored];

    #[must_use]
    pub fn from_score(score: Option<f64>) -> Self {
        match score {
            Some(s) if s >= 80.0 => Self::Excellent,
            Some(s) if s >= 60.0 => Self::Good,
            Some(s) if s >= 40.0 => Self::Fair,
            Some(_) => Self::Poor,
            None => Self::Unscored,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match *self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
            Self::Unscored => "unscored",
        }
    }
}

fn identified() -> AmbassadorStatus {
    AmbassadorStatus::Identified
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ambassador {
    pub id: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub platform_username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_url: Option<String>,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub follower_count: u64,
    #[serde(default)]
    pub avg_engagement_rate: f64,
    #[serde(default)]
    pub icp_alignment_score: Option<f64>,
    #[serde(default = "identified")]
    pub outreach_status: AmbassadorStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended_priority: Option<String>,
    #[serde(default, with = "crate::time::serde_ts::option")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Ambassador {
    #[must_use]
    pub fn score_band(&self) -> ScoreBand {
        ScoreBand::from_score(self.icp_alignment_score)
    }
}

impl ListRecord for Ambassador {
    const KIND: RecordKind = RecordKind::Ambassador;

    fn id(&self) -> &str {
        &self.id
    }

    fn text(&self, field: &str) -> Option<&str> {
        match field {
            "full_name" | "name" => Some(&self.full_name),
            "platform" => Some(&self.platform),
            "platform_username" | "username" => Some(&self.platform_username),
            "outreach_status" | "status" => Some(self.outreach_status.as_str()),
            "recommended_priority" | "priority" => self.recommended_priority.as_deref(),
            "score_band" | "score" => Some(self.score_band().as_str()),
            _ => None,
        }
    }

    fn number(&self, field: &str) -> Option<f64> {
        match field {
            #[allow(clippy::cast_precision_loss, reason = "follower counts fit in f64")]
            "follower_count" | "min_followers" | "max_followers" => Some(self.follower_count as f64),
            "avg_engagement_rate" | "min_engagement" | "max_engagement" => Some(self.avg_engagement_rate),
            "icp_alignment_score" | "min_score" | "max_score" => self.icp_alignment_score,
            _ => None,
        }
    }

    fn timestamp(&self, field: &str) -> Option<DateTime<Utc>> {
        (field == "created_at").then_some(self.created_at).flatten()
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.full_name, &self.platform_username, &self.bio]
    }

    fn sort_value(&self, key: SortKey) -> Option<SortValue<'_>> {
        match key {
            #[allow(clippy::cast_precision_loss, reason = "follower counts fit in f64")]
            SortKey::Followers => Some(SortValue::Number(self.follower_count as f64)),
            SortKey::Engagement => Some(SortValue::Number(self.avg_engagement_rate)),
            SortKey::IcpScore | SortKey::Relevance => self.icp_alignment_score.map(SortValue::Number),
            SortKey::Newest | SortKey::Oldest => self.created_at.map(SortValue::Time),
            SortKey::Alphabetical => Some(SortValue::Text(&self.full_name)),
            SortKey::Platform => Some(SortValue::Text(&self.platform)),
            _ => None,
        }
    }

    fn field_kind(field: &str) -> FieldKind {
        match field {
            "follower_count" | "min_followers" | "avg_engagement_rate" | "min_engagement"
            | "icp_alignment_score" | "min_score" => FieldKind::Number,
            "max_followers" | "max_engagement" | "max_score" => FieldKind::Ceiling,
            "outreach_status" | "status" | "score_band" | "score" => FieldKind::Labels,
            "created_at" => FieldKind::Time,
            _ => FieldKind::Category,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmbassadorStats {
    pub total: usize,
    pub by_status: BTreeMap<String, usize>,
    pub by_platform: BTreeMap<String, usize>,
    pub by_score_band: BTreeMap<String, usize>,
}

impl AmbassadorStats {
    #[must_use]
    pub fn status_count(&self, status: AmbassadorStatus) -> usize {
        self.by_status.get(status.as_str()).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn band_count(&self, band: ScoreBand) -> usize {
        self.by_score_band.get(band.as_str()).copied().unwrap_or(0)
    }
}

impl Summarize for Ambassador {
    type Stats = AmbassadorStats;

    fn aggregate<'a, I>(records: I, _now: DateTime<Utc>) -> AmbassadorStats
    where
        I: IntoIterator<Item = &'a Self>,
        Self: 'a,
    {
        let records: Vec<&Self> = records.into_iter().collect();
        AmbassadorStats {
            total: records.len(),
            by_status: count_by(records.iter().copied(), |a| {
                Some(a.outreach_status.as_str().to_owned())
            }),
            by_platform: count_by(records.iter().copied(), |a| {
                let platform = a.platform.trim();
                (!platform.is_empty()).then(|| platform.to_lowercase())
            }),
            by_score_band: count_by(records.iter().copied(), |a| {
                Some(a.score_band().as_str().to_owned())
            }),
        }
    }
}

impl Tabular for Ambassador {
    fn headers() -> &'static [&'static str] {
        &["Name", "Platform", "Username", "Followers", "Engagement Rate", "ICP Score", "Status"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.full_name.clone(),
            self.platform.clone(),
            self.platform_username.clone(),
            self.follower_count.to_string(),
            self.avg_engagement_rate.to_string(),
            number_cell(self.icp_alignment_score),
            self.outreach_status.as_str().to_owned(),
        ]
    }
}
