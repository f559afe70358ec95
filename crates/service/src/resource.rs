//! Backend endpoints for each dashboard record type.

use std::fmt::Display;
use std::str::FromStr;

use ecco_view_client::Method;
use ecco_view_core::{
    Ambassador, AmbassadorStatus, Booking, BookingStatus, Campaign, CampaignStatus, CoreError,
    LeadCampaign, LeadCampaignStatus, LeadStatus, ListRecord, MessageStatus, OutreachMessage,
    PodcastLead, Summarize, Survey, SurveyStatus,
};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

/// One fully resolved backend call.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

/// A record type with a REST collection behind it.
pub trait Resource:
    ListRecord + Summarize + DeserializeOwned + Clone + Send + Sync + 'static
{
    /// Workflow label accepted by the status endpoint.
    type Status: FromStr<Err = CoreError> + Display + Copy + Send + Sync;

    const COLLECTION_PATH: &'static str;

    /// Key wrapping the list when the backend answers with an object.
    const ENVELOPE_KEY: &'static str;

    /// Query string appended to list requests, without the leading `?`.
    const LIST_QUERY: &'static str = "";

    #[must_use]
    fn list_path() -> String {
        if Self::LIST_QUERY.is_empty() {
            Self::COLLECTION_PATH.to_owned()
        } else {
            format!("{}?{}", Self::COLLECTION_PATH, Self::LIST_QUERY)
        }
    }

    #[must_use]
    fn item_path(id: &str) -> String {
        format!("{}/{id}", Self::COLLECTION_PATH)
    }

    fn status_request(id: &str, status: Self::Status) -> ApiRequest;
}

impl Resource for Ambassador {
    type Status = AmbassadorStatus;
    const COLLECTION_PATH: &'static str = "/api/v1/brand-ambassadors";
    const ENVELOPE_KEY: &'static str = "ambassadors";
    const LIST_QUERY: &'static str = "page_size=1000";

    fn status_request(id: &str, status: AmbassadorStatus) -> ApiRequest {
        ApiRequest {
            method: Method::Put,
            path: Self::item_path(id),
            body: Some(json!({ "outreach_status": status.as_str() })),
        }
    }
}

impl Resource for PodcastLead {
    type Status = LeadStatus;
    const COLLECTION_PATH: &'static str = "/api/podcasts/leads";
    const ENVELOPE_KEY: &'static str = "leads";
    const LIST_QUERY: &'static str = "limit=100";

    fn status_request(id: &str, status: LeadStatus) -> ApiRequest {
        ApiRequest {
            method: Method::Patch,
            path: format!("{}/status", Self::item_path(id)),
            body: Some(json!({ "outreach_status": status.as_str() })),
        }
    }
}

impl Resource for Campaign {
    type Status = CampaignStatus;
    const COLLECTION_PATH: &'static str = "/api/podcasts/campaigns";
    const ENVELOPE_KEY: &'static str = "campaigns";

    // The campaign endpoint takes the new status as a query parameter.
    fn status_request(id: &str, status: CampaignStatus) -> ApiRequest {
        ApiRequest {
            method: Method::Patch,
            path: format!("{}?status={}", Self::item_path(id), status.as_str()),
            body: None,
        }
    }
}

impl Resource for Booking {
    type Status = BookingStatus;
    const COLLECTION_PATH: &'static str = "/api/podcasts/bookings";
    const ENVELOPE_KEY: &'static str = "bookings";

    fn status_request(id: &str, status: BookingStatus) -> ApiRequest {
        ApiRequest {
            method: Method::Patch,
            path: format!("{}/status", Self::item_path(id)),
            body: Some(json!({ "booking_status": status.as_str() })),
        }
    }
}

impl Resource for OutreachMessage {
    type Status = MessageStatus;
    const COLLECTION_PATH: &'static str = "/api/podcasts/messages";
    const ENVELOPE_KEY: &'static str = "messages";
    const LIST_QUERY: &'static str = "limit=100";

    fn status_request(id: &str, status: MessageStatus) -> ApiRequest {
        ApiRequest {
            method: Method::Patch,
            path: Self::item_path(id),
            body: Some(json!({ "status": status.as_str() })),
        }
    }
}

impl Resource for LeadCampaign {
    type Status = LeadCampaignStatus;
    const COLLECTION_PATH: &'static str = "/api/leads/campaigns";
    const ENVELOPE_KEY: &'static str = "campaigns";

    fn status_request(id: &str, status: LeadCampaignStatus) -> ApiRequest {
        ApiRequest {
            method: Method::Patch,
            path: Self::item_path(id),
            body: Some(json!({ "status": status.as_str() })),
        }
    }
}

// Surveys live outside the `/api` prefix.
impl Resource for Survey {
    type Status = SurveyStatus;
    const COLLECTION_PATH: &'static str = "/pmf/surveys";
    const ENVELOPE_KEY: &'static str = "surveys";

    fn status_request(id: &str, status: SurveyStatus) -> ApiRequest {
        ApiRequest {
            method: Method::Patch,
            path: Self::item_path(id),
            body: Some(json!({ "status": status.as_str() })),
        }
    }
}
