//! Per-resource list page state.
//!
//! A [`ListPage`] owns the last collection loaded from the backend and the
//! mutations a dashboard offers on it. The collection is swapped as a whole
//! under a [`RwLock`], so readers see either the old or the new list, never
//! a mix. Loads are sequence-numbered and only the most recently issued one
//! may replace the collection.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use ecco_view_client::{EccoApi, Method};
use ecco_view_core::{MessageStats, OutreachMessage, OwnedListView, ViewState, query};
use futures_util::future::join_all;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::error::ServiceError;
use crate::notifier::{Notice, Notifier};
use crate::resource::Resource;

/// What happened to a completed load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    /// The response replaced the collection; holds the new record count.
    Applied(usize),
    /// A newer load was issued meanwhile; the response was dropped.
    Stale,
}

/// Per-id result of a bulk action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BulkOutcome {
    pub succeeded: Vec<String>,
    pub failed: Vec<String>,
}

impl BulkOutcome {
    #[must_use]
    pub fn succeeded_count(&self) -> usize {
        self.succeeded.len()
    }
}

/// Accepts a bare array or an object carrying the resource's envelope key.
pub fn decode_collection<R: Resource>(path: &str, value: Value) -> Result<Vec<R>, ServiceError> {
    let items = match value {
        list @ Value::Array(_) => list,
        Value::Object(mut map) => match map.remove(R::ENVELOPE_KEY) {
            Some(list @ Value::Array(_)) => list,
            _ => {
                return Err(ServiceError::UnexpectedShape {
                    path: path.to_owned(),
                    detail: format!("object without a `{}` array", R::ENVELOPE_KEY),
                });
            },
        },
        other => {
            return Err(ServiceError::UnexpectedShape {
                path: path.to_owned(),
                detail: format!("expected a list, got {}", json_kind(&other)),
            });
        },
    };
    Ok(serde_json::from_value(items)?)
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

pub struct ListPage<R: Resource> {
    api: Arc<dyn EccoApi>,
    notifier: Arc<dyn Notifier>,
    records: RwLock<Arc<Vec<R>>>,
    issued: AtomicU64,
    list_path: String,
}

impl<R: Resource> ListPage<R> {
    #[must_use]
    pub fn new(api: Arc<dyn EccoApi>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            notifier,
            records: RwLock::new(Arc::new(Vec::new())),
            issued: AtomicU64::new(0),
            list_path: R::list_path(),
        }
    }

    /// Override the list request path, e.g. to add server-side filters.
    #[must_use]
    pub fn with_list_path(mut self, path: impl Into<String>) -> Self {
        self.list_path = path.into();
        self
    }

    fn label(&self) -> &'static str {
        R::KIND.plural_label()
    }

    fn singular(&self) -> &'static str {
        R::KIND.singular_label()
    }

    /// Load the collection. A failure of the latest load emits one error
    /// notice and keeps the previous collection.
    pub async fn refresh(&self) -> Result<Refresh, ServiceError> {
        let seq = self.issued.fetch_add(1, Ordering::SeqCst).saturating_add(1);
        let result = match self.api.get(&self.list_path).await {
            Ok(value) => decode_collection::<R>(&self.list_path, value),
            Err(e) => Err(e.into()),
        };

        let mut guard = self.records.write().await;
        let latest = self.issued.load(Ordering::SeqCst);
        if seq != latest {
            match &result {
                Ok(records) => {
                    tracing::warn!(kind = %R::KIND, seq, latest, count = records.len(), "Discarding stale list response");
                },
                Err(e) => tracing::warn!(kind = %R::KIND, seq, latest, error = %e, "Stale list load failed"),
            }
            return Ok(Refresh::Stale);
        }

        match result {
            Ok(records) => {
                let count = records.len();
                *guard = Arc::new(records);
                tracing::info!(kind = %R::KIND, count, "Loaded list");
                Ok(Refresh::Applied(count))
            },
            Err(e) => {
                drop(guard);
                tracing::warn!(kind = %R::KIND, error = %e, "List load failed");
                self.notifier.notify(Notice::error(format!("Failed to load {}", self.label())));
                Err(e)
            },
        }
    }

    /// Replace the collection without a backend round trip.
    pub async fn load(&self, records: Vec<R>) {
        self.issued.fetch_add(1, Ordering::SeqCst);
        *self.records.write().await = Arc::new(records);
    }

    pub async fn snapshot(&self) -> Arc<Vec<R>> {
        Arc::clone(&*self.records.read().await)
    }

    pub async fn view(&self, state: &ViewState, now: DateTime<Utc>) -> Result<OwnedListView<R>, ServiceError> {
        let records = self.snapshot().await;
        let view = query(&records, state, now)?;
        Ok(view.to_owned_view())
    }

    pub async fn stats(&self, now: DateTime<Utc>) -> R::Stats {
        let records = self.snapshot().await;
        R::aggregate(records.iter(), now)
    }

    /// Delete one record; it leaves the local collection only once the
    /// backend confirms.
    pub async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        match self.api.delete(&R::item_path(id)).await {
            Ok(_) => {
                self.remove_local(&[id]).await;
                self.notifier.notify(Notice::success(format!("{} deleted", self.singular())));
                Ok(())
            },
            Err(e) => {
                tracing::warn!(kind = %R::KIND, id, error = %e, "Delete failed");
                self.notifier
                    .notify(Notice::error(format!("Failed to delete {}", self.singular().to_lowercase())));
                Err(e.into())
            },
        }
    }

    pub async fn update_status(&self, id: &str, status: R::Status) -> Result<(), ServiceError> {
        let request = R::status_request(id, status);
        if let Err(e) = self.api.call(request.method, &request.path, request.body).await {
            tracing::warn!(kind = %R::KIND, id, %status, error = %e, "Status update failed");
            self.notifier.notify(Notice::error("Failed to update status"));
            return Err(e.into());
        }
        self.notifier.notify(Notice::success(format!("Status updated to {status}")));
        self.reload_after_mutation().await;
        Ok(())
    }

    /// POST a new record and reload. Returns the backend's response body.
    pub async fn create(&self, body: Value) -> Result<Value, ServiceError> {
        match self.api.call(Method::Post, R::COLLECTION_PATH, Some(body)).await {
            Ok(created) => {
                self.notifier.notify(Notice::success(format!("{} created", self.singular())));
                self.reload_after_mutation().await;
                Ok(created)
            },
            Err(e) => {
                tracing::warn!(kind = %R::KIND, error = %e, "Create failed");
                self.notifier
                    .notify(Notice::error(format!("Failed to create {}", self.singular().to_lowercase())));
                Err(e.into())
            },
        }
    }

    /// Update every id concurrently. Individual failures are counted, not
    /// propagated.
    pub async fn bulk_update_status(&self, ids: &[String], status: R::Status) -> Result<BulkOutcome, ServiceError> {
        if ids.is_empty() {
            return Err(ServiceError::InvalidInput("no records selected".to_owned()));
        }
        let calls = ids.iter().map(|id| {
            let request = R::status_request(id, status);
            async move { (id, self.api.call(request.method, &request.path, request.body).await) }
        });
        let outcome = self.collect(join_all(calls).await, "Bulk status update failed");

        if outcome.succeeded.is_empty() {
            self.notifier.notify(Notice::error(format!("Failed to update {}", self.label())));
        } else {
            self.notifier.notify(Notice::success(format!(
                "Updated {} {} to {status}",
                outcome.succeeded_count(),
                self.label()
            )));
        }
        self.reload_after_mutation().await;
        Ok(outcome)
    }

    /// Delete every id concurrently and drop the confirmed ones locally.
    pub async fn bulk_delete(&self, ids: &[String]) -> Result<BulkOutcome, ServiceError> {
        if ids.is_empty() {
            return Err(ServiceError::InvalidInput("no records selected".to_owned()));
        }
        let calls = ids.iter().map(|id| async move { (id, self.api.delete(&R::item_path(id)).await) });
        let outcome = self.collect(join_all(calls).await, "Bulk delete failed");

        let removed: Vec<&str> = outcome.succeeded.iter().map(String::as_str).collect();
        self.remove_local(&removed).await;
        if outcome.succeeded.is_empty() {
            self.notifier.notify(Notice::error(format!("Failed to delete {}", self.label())));
        } else {
            self.notifier
                .notify(Notice::success(format!("Deleted {} {}", outcome.succeeded_count(), self.label())));
        }
        Ok(outcome)
    }

    fn collect<E: std::fmt::Display>(&self, results: Vec<(&String, Result<Value, E>)>, what: &str) -> BulkOutcome {
        let mut outcome = BulkOutcome::default();
        for (id, result) in results {
            match result {
                Ok(_) => outcome.succeeded.push(id.clone()),
                Err(e) => {
                    tracing::warn!(kind = %R::KIND, id = %id, error = %e, "{what}");
                    outcome.failed.push(id.clone());
                },
            }
        }
        outcome
    }

    /// Drop confirmed ids. Loads issued before the removal are marked stale
    /// so their responses cannot bring the records back.
    async fn remove_local(&self, ids: &[&str]) {
        if ids.is_empty() {
            return;
        }
        let mut guard = self.records.write().await;
        self.issued.fetch_add(1, Ordering::SeqCst);
        let kept: Vec<R> = guard.iter().filter(|r| !ids.contains(&r.id())).cloned().collect();
        *guard = Arc::new(kept);
    }

    async fn reload_after_mutation(&self) {
        if let Err(e) = self.refresh().await {
            tracing::debug!(kind = %R::KIND, error = %e, "Reload after mutation failed");
        }
    }
}

impl ListPage<OutreachMessage> {
    /// Message stats with a caller-chosen follow-up threshold.
    pub async fn message_stats(&self, now: DateTime<Utc>, follow_up_days: i64) -> MessageStats {
        let records = self.snapshot().await;
        MessageStats::compute(records.iter(), now, follow_up_days)
    }
}
