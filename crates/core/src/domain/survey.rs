//! Product-market-fit surveys (Sean Ellis, NPS and custom forms).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{MIN_RESPONSES_FOR_SCORE, PMF_THRESHOLD_PERCENT};
use crate::error::{CoreError, Result};
use crate::export::{MISSING_CELL, Tabular, number_cell};
use crate::filter::{FieldFilter, Predicate};
use crate::record::{FieldKind, ListRecord, RecordKind, Summarize};
use crate::sort::{SortKey, SortValue};

label_enum! {
    SurveyType ("survey type") {
        SeanEllis => "sean_ellis",
        Nps => "nps",
        Custom => "custom",
    }
}

label_enum! {
    SurveyStatus ("survey") {
        Active => "active",
        Draft => "draft",
        Paused => "paused",
        Completed => "completed",
        Archived => "archived",
    }
}

fn draft() -> SurveyStatus {
    SurveyStatus::Draft
}

fn custom() -> SurveyType {
    SurveyType::Custom
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Survey {
    pub id: String,
    #[serde(default)]
    pub tenant_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "custom")]
    pub survey_type: SurveyType,
    #[serde(default = "draft")]
    pub status: SurveyStatus,
    #[serde(default)]
    pub response_count: u32,
    /// Share of "very disappointed" answers, as a percentage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_pmf_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pmf_achieved: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_nps_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promoters_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passives_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detractors_count: Option<u32>,
    #[serde(default, with = "crate::time::serde_ts::option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "crate::time::serde_ts::option")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_link: Option<String>,
}

impl Survey {
    /// Scores need a minimum sample before the backend will compute them.
    #[must_use]
    pub const fn can_calculate_score(&self) -> bool {
        self.response_count >= MIN_RESPONSES_FOR_SCORE
    }

    #[must_use]
    pub const fn can_export(&self) -> bool {
        self.response_count > 0
    }

    /// The backend's verdict when present, else the score against the 40% bar.
    #[must_use]
    pub fn has_pmf(&self) -> bool {
        self.pmf_achieved
            .unwrap_or_else(|| self.latest_pmf_score.is_some_and(|s| s >= PMF_THRESHOLD_PERCENT))
    }
}

impl ListRecord for Survey {
    const KIND: RecordKind = RecordKind::Survey;

    fn id(&self) -> &str {
        &self.id
    }

    fn text(&self, field: &str) -> Option<&str> {
        match field {
            "title" | "name" => Some(&self.title),
            "description" => self.description.as_deref(),
            "survey_type" | "type" => Some(self.survey_type.as_str()),
            "status" => Some(self.status.as_str()),
            _ => None,
        }
    }

    fn number(&self, field: &str) -> Option<f64> {
        match field {
            "response_count" | "min_responses" => Some(f64::from(self.response_count)),
            "latest_pmf_score" | "pmf_score" => self.latest_pmf_score,
            "latest_nps_score" | "nps_score" => self.latest_nps_score,
            _ => None,
        }
    }

    fn timestamp(&self, field: &str) -> Option<DateTime<Utc>> {
        match field {
            "created_at" => self.created_at,
            "updated_at" => self.updated_at,
            _ => None,
        }
    }

    fn flag(&self, field: &str) -> Option<bool> {
        (field == "pmf_achieved").then(|| self.has_pmf())
    }

    fn search_fields(&self) -> Vec<&str> {
        std::iter::once(self.title.as_str()).chain(self.description.as_deref()).collect()
    }

    fn sort_value(&self, key: SortKey) -> Option<SortValue<'_>> {
        match key {
            SortKey::Newest | SortKey::Oldest | SortKey::Relevance => self.created_at.map(SortValue::Time),
            SortKey::Updated => self.updated_at.map(SortValue::Time),
            SortKey::Responses => Some(SortValue::Number(f64::from(self.response_count))),
            SortKey::PmfScore => self.latest_pmf_score.map(SortValue::Number),
            SortKey::Alphabetical => Some(SortValue::Text(&self.title)),
            _ => None,
        }
    }

    fn field_kind(field: &str) -> FieldKind {
        match field {
            "response_count" | "min_responses" | "latest_pmf_score" | "pmf_score" | "latest_nps_score"
            | "nps_score" => FieldKind::Number,
            "created_at" | "updated_at" => FieldKind::Time,
            "pmf_achieved" => FieldKind::Flag,
            "survey_type" | "type" | "status" => FieldKind::Labels,
            _ => FieldKind::Category,
        }
    }

    /// One tab per live status; archived surveys only show under "all".
    fn tab_filters(tab: &str, _now: DateTime<Utc>) -> Result<Vec<FieldFilter>> {
        let wanted = tab.trim().to_lowercase();
        if crate::constants::is_sentinel(&wanted) {
            return Ok(Vec::new());
        }
        match wanted.parse::<SurveyStatus>() {
            Ok(status) if status != SurveyStatus::Archived => {
                Ok(vec![FieldFilter::new("status", Predicate::Equals(status.as_str().to_owned()))])
            },
            _ => Err(CoreError::UnknownTab { kind: Self::KIND.as_str(), tab: tab.to_owned() }),
        }
    }
}

/// Tab counters plus response totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyStats {
    pub all: usize,
    pub active: usize,
    pub draft: usize,
    pub paused: usize,
    pub completed: usize,
    pub total_responses: u64,
    pub pmf_achieved: usize,
}

impl Summarize for Survey {
    type Stats = SurveyStats;

    fn aggregate<'a, I>(records: I, _now: DateTime<Utc>) -> SurveyStats
    where
        I: IntoIterator<Item = &'a Self>,
        Self: 'a,
    {
        records.into_iter().fold(SurveyStats::default(), |mut stats, survey| {
            stats.all += 1;
            stats.total_responses += u64::from(survey.response_count);
            if survey.has_pmf() {
                stats.pmf_achieved += 1;
            }
            match survey.status {
                SurveyStatus::Active => stats.active += 1,
                SurveyStatus::Draft => stats.draft += 1,
                SurveyStatus::Paused => stats.paused += 1,
                SurveyStatus::Completed => stats.completed += 1,
                _ => {},
            }
            stats
        })
    }
}

impl Tabular for Survey {
    fn headers() -> &'static [&'static str] {
        &["Title", "Type", "Status", "Responses", "PMF Score", "NPS", "Created At"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.title.clone(),
            self.survey_type.as_str().to_owned(),
            self.status.as_str().to_owned(),
            self.response_count.to_string(),
            number_cell(self.latest_pmf_score),
            number_cell(self.latest_nps_score),
            self.created_at.map_or_else(|| MISSING_CELL.to_owned(), |ts| ts.to_rfc3339()),
        ]
    }
}
