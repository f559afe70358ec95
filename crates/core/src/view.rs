//! Raw UI selections and the query pipeline that turns them into a list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::filter::{FieldFilter, FilterSpec, Predicate, filter};
use crate::pagination::{PageInfo, PageRequest, paginate};
use crate::record::ListRecord;
use crate::sort::{SortDirection, SortKey, sort_records};
use crate::stats::Showing;

/// One select input's current value, exactly as the UI holds it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub field: String,
    pub value: String,
}

/// Everything the user has picked on a list page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    #[serde(default)]
    pub search: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tab: Option<String>,
    #[serde(default)]
    pub selections: Vec<Selection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortKey>,
    /// Overrides the sort key's own direction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<SortDirection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<PageRequest>,
}

impl ViewState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn search(mut self, query: impl Into<String>) -> Self {
        self.search = query.into();
        self
    }

    #[must_use]
    pub fn tab(mut self, tab: impl Into<String>) -> Self {
        self.tab = Some(tab.into());
        self
    }

    /// Set a select's value. Selecting the same field again replaces it.
    #[must_use]
    pub fn select(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        let field = field.into();
        let value = value.into();
        if let Some(existing) = self.selections.iter_mut().find(|s| s.field == field) {
            existing.value = value;
        } else {
            self.selections.push(Selection { field, value });
        }
        self
    }

    #[must_use]
    pub const fn sort(mut self, key: SortKey) -> Self {
        self.sort = Some(key);
        self
    }

    #[must_use]
    pub const fn direction(mut self, direction: SortDirection) -> Self {
        self.direction = Some(direction);
        self
    }

    #[must_use]
    pub const fn page(mut self, request: PageRequest) -> Self {
        self.page = Some(request);
        self
    }

    /// Translate into predicates for `R`: tab first, then selections, then
    /// the search query. `now` anchors every relative date window.
    pub fn to_filter_spec<R: ListRecord>(&self, now: DateTime<Utc>) -> Result<FilterSpec> {
        let mut spec = FilterSpec::new();
        if let Some(tab) = &self.tab {
            for f in R::tab_filters(tab, now)? {
                spec = spec.and(f);
            }
        }
        for selection in &self.selections {
            let kind = R::field_kind(&selection.field);
            let predicate = Predicate::from_selection(kind, &selection.field, &selection.value, now)?;
            spec = spec.and(FieldFilter::new(selection.field.clone(), predicate));
        }
        Ok(spec.search(self.search.clone()))
    }
}

/// The rendered subset of a collection.
#[derive(Debug, Clone, Serialize)]
pub struct ListView<'a, R> {
    pub items: Vec<&'a R>,
    /// Records passing the filters, before pagination.
    pub matched: usize,
    /// Size of the unfiltered collection.
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<PageInfo>,
}

impl<R> ListView<'_, R> {
    #[must_use]
    pub const fn showing(&self) -> Showing {
        Showing::new(self.matched, self.total)
    }
}

impl<R: Clone> ListView<'_, R> {
    /// Detach the view from the collection it borrows.
    #[must_use]
    pub fn to_owned_view(&self) -> OwnedListView<R> {
        OwnedListView {
            items: self.items.iter().map(|r| (*r).clone()).collect(),
            matched: self.matched,
            total: self.total,
            page: self.page,
        }
    }
}

/// A [`ListView`] holding its own copies of the visible records.
#[derive(Debug, Clone, Serialize)]
pub struct OwnedListView<R> {
    pub items: Vec<R>,
    pub matched: usize,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<PageInfo>,
}

impl<R> OwnedListView<R> {
    #[must_use]
    pub const fn showing(&self) -> Showing {
        Showing::new(self.matched, self.total)
    }
}

/// Filter, sort and paginate `records` according to `state`.
pub fn query<'a, R: ListRecord>(
    records: &'a [R],
    state: &ViewState,
    now: DateTime<Utc>,
) -> Result<ListView<'a, R>> {
    let spec = state.to_filter_spec::<R>(now)?;
    let mut items = filter(records, &spec);
    let matched = items.len();
    if let Some(key) = state.sort {
        sort_records(&mut items, key, state.direction.unwrap_or_else(|| key.default_direction()));
    }
    let (items, page) = match state.page {
        Some(request) => {
            let (items, info) = paginate(items, request);
            (items, Some(info))
        },
        None => (items, None),
    };
    tracing::debug!(kind = %R::KIND, matched, total = records.len(), "list view computed");
    Ok(ListView { items, matched, total: records.len(), page })
}
