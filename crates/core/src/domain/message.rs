use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::FOLLOW_UP_THRESHOLD_DAYS;
use crate::error::{CoreError, Result};
use crate::export::Tabular;
use crate::filter::{FieldFilter, Predicate};
use crate::record::{FieldKind, ListRecord, RecordKind, Summarize};
use crate::sort::{SortKey, SortValue};
use crate::stats::{elapsed_at_least, percent};
use crate::time::days_since;

label_enum! {
    MessageType ("message type") {
        InitialPitch => "initial_pitch",
        FollowUp => "follow_up",
        BookingConfirmation => "booking_confirmation",
        ThankYou => "thank_you",
        Custom => "custom",
    }
}

label_enum! {
    /// Delivery state of an outreach email.
    MessageStatus ("message") {
        Draft => "draft",
        Ready => "ready",
        Sent => "sent",
        Bounced => "bounced",
        Opened => "opened",
        Clicked => "clicked",
        Replied => "replied",
    }
}

fn draft() -> MessageStatus {
    MessageStatus::Draft
}

fn custom() -> MessageType {
    MessageType::Custom
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalizationContext {
    #[serde(default)]
    pub podcast_name: String,
    #[serde(default)]
    pub host_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutreachMessage {
    pub id: String,
    #[serde(default)]
    pub lead_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign_id: Option<String>,
    #[serde(default = "custom")]
    pub message_type: MessageType,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message_body: String,
    #[serde(default = "draft")]
    pub status: MessageStatus,
    #[serde(default)]
    pub recipient_email: String,
    #[serde(default)]
    pub recipient_name: String,
    #[serde(default, with = "crate::time::serde_ts::option")]
    pub sent_at: Option<DateTime<Utc>>,
    #[serde(default, with = "crate::time::serde_ts::option")]
    pub replied_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub response_received: bool,
    #[serde(default)]
    pub personalization_context: PersonalizationContext,
    #[serde(default, with = "crate::time::serde_ts::option")]
    pub created_at: Option<DateTime<Utc>>,
}

impl OutreachMessage {
    /// Sent, unanswered, and at least `threshold_days` old.
    #[must_use]
    pub fn needs_follow_up(&self, now: DateTime<Utc>, threshold_days: i64) -> bool {
        if self.status != MessageStatus::Sent || self.response_received {
            return false;
        }
        self.sent_at.is_some_and(|sent| elapsed_at_least(sent, now, threshold_days))
    }

    /// Whole days since the message went out ("Sent 9 days ago").
    #[must_use]
    pub fn days_since_sent(&self, now: DateTime<Utc>) -> Option<i64> {
        self.sent_at.map(|sent| days_since(sent, now))
    }
}

impl ListRecord for OutreachMessage {
    const KIND: RecordKind = RecordKind::OutreachMessage;

    fn id(&self) -> &str {
        &self.id
    }

    fn text(&self, field: &str) -> Option<&str> {
        match field {
            "lead_id" => Some(&self.lead_id),
            "campaign_id" | "campaign" => self.campaign_id.as_deref(),
            "message_type" | "type" => Some(self.message_type.as_str()),
            "status" => Some(self.status.as_str()),
            "subject" => Some(&self.subject),
            "recipient_email" => Some(&self.recipient_email),
            "recipient_name" => Some(&self.recipient_name),
            "podcast_name" => Some(&self.personalization_context.podcast_name),
            "host_name" => Some(&self.personalization_context.host_name),
            _ => None,
        }
    }

    fn timestamp(&self, field: &str) -> Option<DateTime<Utc>> {
        match field {
            "sent_at" => self.sent_at,
            "replied_at" => self.replied_at,
            "created_at" => self.created_at,
            _ => None,
        }
    }

    fn flag(&self, field: &str) -> Option<bool> {
        (field == "response_received").then_some(self.response_received)
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            &self.subject,
            &self.personalization_context.podcast_name,
            &self.personalization_context.host_name,
            &self.recipient_email,
        ]
    }

    fn sort_value(&self, key: SortKey) -> Option<SortValue<'_>> {
        match key {
            SortKey::Newest | SortKey::Oldest => self.created_at.map(SortValue::Time),
            SortKey::Latest | SortKey::Soonest => self.sent_at.map(SortValue::Time),
            SortKey::Alphabetical => {
                Some(SortValue::Text(&self.personalization_context.podcast_name))
            },
            _ => None,
        }
    }

    fn field_kind(field: &str) -> FieldKind {
        match field {
            "sent_at" | "replied_at" | "created_at" => FieldKind::Time,
            "response_received" => FieldKind::Flag,
            "message_type" | "type" | "status" => FieldKind::Labels,
            _ => FieldKind::Category,
        }
    }

    fn tab_filters(tab: &str, _now: DateTime<Utc>) -> Result<Vec<FieldFilter>> {
        let tab = tab.trim().to_lowercase();
        let filter = match tab.as_str() {
            "" | "all" => return Ok(Vec::new()),
            // Replies are tracked by the flag, not the delivery status.
            "replied" => FieldFilter::new("response_received", Predicate::Flag(true)),
            "draft" | "ready" | "sent" => FieldFilter::new("status", Predicate::Equals(tab.clone())),
            _ => {
                return Err(CoreError::UnknownTab { kind: Self::KIND.as_str(), tab });
            },
        };
        Ok(vec![filter])
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageStats {
    pub total: usize,
    pub draft: usize,
    pub ready: usize,
    pub sent: usize,
    pub replied: usize,
    /// `replied / sent` as a whole percentage.
    pub response_rate: u32,
    pub follow_ups_needed: usize,
}

impl MessageStats {
    /// Aggregate with a custom follow-up threshold.
    pub fn compute<'a, I>(records: I, now: DateTime<Utc>, threshold_days: i64) -> Self
    where
        I: IntoIterator<Item = &'a OutreachMessage>,
    {
        let mut stats = Self::default();
        for message in records {
            stats.total += 1;
            match message.status {
                MessageStatus::Draft => stats.draft += 1,
                MessageStatus::Ready => stats.ready += 1,
                MessageStatus::Sent => stats.sent += 1,
                _ => {},
            }
            if message.response_received {
                stats.replied += 1;
            }
            if message.needs_follow_up(now, threshold_days) {
                stats.follow_ups_needed += 1;
            }
        }
        stats.response_rate = percent(stats.replied, stats.sent);
        stats
    }
}

impl Summarize for OutreachMessage {
    type Stats = MessageStats;

    fn aggregate<'a, I>(records: I, now: DateTime<Utc>) -> MessageStats
    where
        I: IntoIterator<Item = &'a Self>,
        Self: 'a,
    {
        MessageStats::compute(records, now, FOLLOW_UP_THRESHOLD_DAYS)
    }
}

impl Tabular for OutreachMessage {
    fn headers() -> &'static [&'static str] {
        &["Podcast", "Recipient", "Email", "Type", "Subject", "Status", "Sent At", "Replied"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.personalization_context.podcast_name.clone(),
            self.recipient_name.clone(),
            self.recipient_email.clone(),
            self.message_type.as_str().to_owned(),
            self.subject.clone(),
            self.status.as_str().to_owned(),
            self.sent_at.map(|d| d.to_rfc3339()).unwrap_or_default(),
            if self.response_received { "yes" } else { "no" }.to_owned(),
        ]
    }
}
