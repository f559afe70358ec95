use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use chrono::{DateTime, Utc};
use clap::{Args, ValueEnum};
use ecco_view_client::{ApiSettings, EccoApi, EccoClient};
use ecco_view_core::constants::DEFAULT_PAGE_SIZE;
use ecco_view_core::time::parse_timestamp;
use ecco_view_core::{PageRequest, SortDirection, SortKey, ViewState};
use ecco_view_service::{CollectingNotifier, ListPage, Notifier, Resource, decode_collection};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum Kind {
    Ambassadors,
    Leads,
    Campaigns,
    Bookings,
    Messages,
    LeadCampaigns,
    Surveys,
}

/// Expands `$body` once per record type with `$r` bound to that type.
macro_rules! for_kind {
    ($kind:expr, $r:ident => $body:expr) => {
        match $kind {
            $crate::commands::Kind::Ambassadors => {
                type $r = ecco_view_core::Ambassador;
                $body
            },
            $crate::commands::Kind::Leads => {
                type $r = ecco_view_core::PodcastLead;
                $body
            },
            $crate::commands::Kind::Campaigns => {
                type $r = ecco_view_core::Campaign;
                $body
            },
            $crate::commands::Kind::Bookings => {
                type $r = ecco_view_core::Booking;
                $body
            },
            $crate::commands::Kind::Messages => {
                type $r = ecco_view_core::OutreachMessage;
                $body
            },
            $crate::commands::Kind::LeadCampaigns => {
                type $r = ecco_view_core::LeadCampaign;
                $body
            },
            $crate::commands::Kind::Surveys => {
                type $r = ecco_view_core::Survey;
                $body
            },
        }
    };
}

pub(crate) mod list;
pub(crate) mod mutate;
pub(crate) mod stats;

#[derive(Debug, Args)]
pub(crate) struct SourceArgs {
    /// Read records from a JSON file (array or envelope) instead of the API.
    #[arg(short, long)]
    pub input: Option<PathBuf>,
    /// Reference time for date windows and day counts (RFC 3339). Defaults to now.
    #[arg(long)]
    pub now: Option<String>,
}

impl SourceArgs {
    pub(crate) fn now(&self) -> Result<DateTime<Utc>> {
        match &self.now {
            Some(raw) => Ok(parse_timestamp(raw)?),
            None => Ok(Utc::now()),
        }
    }
}

#[derive(Debug, Args)]
pub(crate) struct ViewArgs {
    #[arg(short, long, default_value = "")]
    pub search: String,
    #[arg(short, long)]
    pub tab: Option<String>,
    /// `field=value` selection; repeatable.
    #[arg(short, long = "filter", value_parser = parse_selection)]
    pub filters: Vec<(String, String)>,
    #[arg(long)]
    pub sort: Option<String>,
    /// `asc` or `desc`; defaults to the sort key's own direction.
    #[arg(long)]
    pub direction: Option<String>,
    #[arg(long)]
    pub page: Option<usize>,
    #[arg(long, env = "ECCO_PAGE_SIZE", default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: usize,
}

impl ViewArgs {
    pub(crate) fn to_state(&self) -> Result<ViewState> {
        let mut state = ViewState::new().search(&self.search);
        if let Some(tab) = &self.tab {
            state = state.tab(tab);
        }
        for (field, value) in &self.filters {
            state = state.select(field, value);
        }
        if let Some(sort) = &self.sort {
            state = state.sort(sort.parse::<SortKey>()?);
        }
        if let Some(direction) = &self.direction {
            state = state.direction(direction.parse::<SortDirection>()?);
        }
        if let Some(page) = self.page {
            state = state.page(PageRequest::new(page, self.page_size)?);
        }
        Ok(state)
    }
}

fn parse_selection(raw: &str) -> Result<(String, String), String> {
    let (field, value) = raw.split_once('=').ok_or_else(|| format!("expected field=value, got `{raw}`"))?;
    let field = field.trim();
    if field.is_empty() {
        return Err(format!("missing field name in `{raw}`"));
    }
    Ok((field.to_owned(), value.trim().to_owned()))
}

pub(crate) struct Context {
    api: Arc<dyn EccoApi>,
    notifier: Arc<CollectingNotifier>,
}

impl Context {
    pub(crate) fn new(api_url: Option<String>) -> Result<Self> {
        let mut settings = ApiSettings::from_env();
        if let Some(url) = api_url {
            settings.base_url = url.trim_end_matches('/').to_owned();
        }
        tracing::debug!(?settings, "API settings");
        let client = EccoClient::new(settings)?;
        Ok(Self { api: Arc::new(client), notifier: Arc::new(CollectingNotifier::new()) })
    }

    pub(crate) fn page<R: Resource>(&self) -> ListPage<R> {
        ListPage::new(Arc::clone(&self.api), Arc::clone(&self.notifier) as Arc<dyn Notifier>)
    }

    /// A page filled from `--input` or, without it, from the API.
    pub(crate) async fn load<R: Resource>(&self, source: &SourceArgs) -> Result<ListPage<R>> {
        let page = self.page::<R>();
        match &source.input {
            Some(path) => {
                let raw = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
                let value = serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;
                let records = decode_collection::<R>(&path.display().to_string(), value)?;
                page.load(records).await;
            },
            None => {
                page.refresh().await?;
            },
        }
        Ok(page)
    }

    /// Print collected notices to stderr.
    pub(crate) fn flush_notices(&self) {
        for notice in self.notifier.drain() {
            if notice.is_error() {
                eprintln!("error: {notice}");
            } else {
                eprintln!("{notice}");
            }
        }
    }
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
