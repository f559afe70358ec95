//! Per-field debounced saves.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use ecco_view_client::{EccoApi, Method};
use ecco_view_core::constants::AUTO_SAVE_DELAY_MS;
use serde_json::{Map, Value};
use tokio::task::JoinHandle;

use crate::debounce::Debouncer;
use crate::notifier::{Notice, Notifier};

/// Sends `PATCH <path> {field: value}` once a field has been quiet for the
/// debounce delay. Each field has its own debouncer, so editing one field
/// never delays another.
pub struct AutoSave {
    api: Arc<dyn EccoApi>,
    notifier: Arc<dyn Notifier>,
    path: String,
    delay: Duration,
    fields: Mutex<HashMap<String, Debouncer>>,
}

impl AutoSave {
    #[must_use]
    pub fn new(api: Arc<dyn EccoApi>, notifier: Arc<dyn Notifier>, path: impl Into<String>) -> Self {
        Self {
            api,
            notifier,
            path: path.into(),
            delay: Duration::from_millis(AUTO_SAVE_DELAY_MS),
            fields: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Queue `value` for `field`, superseding any unsent value for it.
    pub fn queue(&self, field: &str, value: Value) -> JoinHandle<bool> {
        let api = Arc::clone(&self.api);
        let notifier = Arc::clone(&self.notifier);
        let path = self.path.clone();
        let name = field.to_owned();
        let task = async move {
            let mut body = Map::new();
            body.insert(name.clone(), value);
            match api.call(Method::Patch, &path, Some(Value::Object(body))).await {
                Ok(_) => tracing::debug!(field = %name, "Auto-saved"),
                Err(e) => {
                    tracing::warn!(field = %name, error = %e, "Auto-save failed");
                    notifier.notify(Notice::error(format!("Failed to save {name}")));
                },
            }
        };

        let mut fields = match self.fields.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        fields.entry(field.to_owned()).or_insert_with(|| Debouncer::new(self.delay)).schedule(task)
    }

    /// Drop every unsent value.
    pub fn cancel_all(&self) {
        let fields = match self.fields.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        for debouncer in fields.values() {
            debouncer.cancel();
        }
    }
}
