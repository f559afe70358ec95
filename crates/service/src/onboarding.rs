//! Multi-step onboarding form with auto-saved fields.

use std::sync::Arc;

use ecco_view_client::{EccoApi, Method};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::task::JoinHandle;

use crate::autosave::AutoSave;
use crate::error::ServiceError;
use crate::notifier::{Notice, Notifier};

pub const PROGRESS_PATH: &str = "/api/onboarding/progress";
pub const COMPLETE_PATH: &str = "/api/onboarding/complete";
pub const DEFAULT_STEPS: u8 = 6;

/// Field the confirmation checkbox writes to.
pub const CONFIRMED_FIELD: &str = "confirmed";

/// Resumable wizard position plus everything entered so far.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WizardProgress {
    pub step: u8,
    #[serde(default)]
    pub data: Map<String, Value>,
}

pub struct OnboardingWizard {
    api: Arc<dyn EccoApi>,
    notifier: Arc<dyn Notifier>,
    autosave: AutoSave,
    steps: u8,
    step: u8,
    data: Map<String, Value>,
}

impl OnboardingWizard {
    #[must_use]
    pub fn new(api: Arc<dyn EccoApi>, notifier: Arc<dyn Notifier>) -> Self {
        let autosave = AutoSave::new(Arc::clone(&api), Arc::clone(&notifier), PROGRESS_PATH);
        Self { api, notifier, autosave, steps: DEFAULT_STEPS, step: 1, data: Map::new() }
    }

    /// Set the step count; values below 1 are raised to 1.
    #[must_use]
    pub fn with_steps(mut self, steps: u8) -> Self {
        self.steps = steps.max(1);
        self.step = self.step.min(self.steps);
        self
    }

    #[must_use]
    pub fn with_autosave(mut self, autosave: AutoSave) -> Self {
        self.autosave = autosave;
        self
    }

    #[must_use]
    pub const fn step(&self) -> u8 {
        self.step
    }

    #[must_use]
    pub const fn steps(&self) -> u8 {
        self.steps
    }

    #[must_use]
    pub fn progress_percent(&self) -> u32 {
        ecco_view_core::percent(usize::from(self.step), usize::from(self.steps))
    }

    pub fn next(&mut self) -> u8 {
        if self.step < self.steps {
            self.step += 1;
        }
        self.step
    }

    pub fn previous(&mut self) -> u8 {
        if self.step > 1 {
            self.step -= 1;
        }
        self.step
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.data.get(name)
    }

    /// Store locally and queue an auto-save.
    pub fn update_field(&mut self, name: &str, value: Value) -> JoinHandle<bool> {
        self.data.insert(name.to_owned(), value.clone());
        self.autosave.queue(name, value)
    }

    pub fn set_confirmed(&mut self, confirmed: bool) -> JoinHandle<bool> {
        self.update_field(CONFIRMED_FIELD, Value::Bool(confirmed))
    }

    #[must_use]
    pub fn is_confirmed(&self) -> bool {
        matches!(self.data.get(CONFIRMED_FIELD), Some(Value::Bool(true)))
    }

    #[must_use]
    pub fn progress(&self) -> WizardProgress {
        WizardProgress { step: self.step, data: self.data.clone() }
    }

    /// Resume from saved progress. The step is clamped into range.
    pub fn restore(&mut self, progress: WizardProgress) {
        self.step = progress.step.clamp(1, self.steps);
        self.data = progress.data;
    }

    /// Submit everything entered. Refused until the user has confirmed.
    pub async fn complete(&self) -> Result<Value, ServiceError> {
        if !self.is_confirmed() {
            let message = "Please confirm your information is accurate";
            self.notifier.notify(Notice::error(message));
            return Err(ServiceError::Validation(message.to_owned()));
        }
        self.autosave.cancel_all();

        match self.api.call(Method::Post, COMPLETE_PATH, Some(Value::Object(self.data.clone()))).await {
            Ok(response) => {
                tracing::info!(fields = self.data.len(), "Onboarding completed");
                self.notifier.notify(Notice::success("Onboarding complete"));
                Ok(response)
            },
            Err(e) => {
                tracing::warn!(error = %e, "Onboarding completion failed");
                self.notifier.notify(Notice::error("Failed to complete onboarding"));
                Err(e.into())
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::notifier::CollectingNotifier;
    use crate::test_support::FakeApi;

    fn wizard(api: &Arc<FakeApi>) -> (OnboardingWizard, Arc<CollectingNotifier>) {
        let notifier = Arc::new(CollectingNotifier::new());
        let wizard = OnboardingWizard::new(Arc::clone(api) as Arc<dyn EccoApi>, Arc::clone(&notifier) as Arc<dyn Notifier>);
        (wizard, notifier)
    }

    #[tokio::test]
    async fn navigation_is_clamped() {
        let api = Arc::new(FakeApi::new());
        let (mut wizard, _) = wizard(&api);

        assert_eq!(wizard.previous(), 1);
        for _ in 0..10 {
            wizard.next();
        }
        assert_eq!(wizard.step(), DEFAULT_STEPS);
        assert_eq!(wizard.progress_percent(), 100);
        assert_eq!(wizard.previous(), DEFAULT_STEPS - 1);
    }

    #[tokio::test(start_paused = true)]
    async fn complete_requires_confirmation() {
        let api = Arc::new(FakeApi::new());
        api.ok(Method::Patch, PROGRESS_PATH, json!({}));
        let (mut wizard, notifier) = wizard(&api);
        wizard.update_field("brand_name", json!("Ecco")).await.unwrap();

        let err = wizard.complete().await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert_eq!(notifier.drain(), vec![Notice::error("Please confirm your information is accurate")]);
        assert!(api.calls_to(Method::Post).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn confirmed_wizard_posts_all_fields() {
        let api = Arc::new(FakeApi::new());
        api.ok(Method::Patch, PROGRESS_PATH, json!({})).ok(Method::Post, COMPLETE_PATH, json!({"status": "ok"}));
        let (mut wizard, notifier) = wizard(&api);

        wizard.update_field("brand_name", json!("Ecco")).await.unwrap();
        wizard.set_confirmed(true).await.unwrap();
        let response = wizard.complete().await.unwrap();

        assert_eq!(response["status"], "ok");
        let post = &api.calls_to(Method::Post)[0];
        assert_eq!(post.body, Some(json!({"brand_name": "Ecco", "confirmed": true})));
        assert_eq!(notifier.drain(), vec![Notice::success("Onboarding complete")]);
    }

    #[tokio::test]
    async fn restore_clamps_step() {
        let api = Arc::new(FakeApi::new());
        let (mut wizard, _) = wizard(&api);
        let mut data = Map::new();
        data.insert("website".into(), json!("https://ecco.test"));

        wizard.restore(WizardProgress { step: 42, data });
        assert_eq!(wizard.step(), DEFAULT_STEPS);
        assert_eq!(wizard.field("website"), Some(&json!("https://ecco.test")));
        assert_eq!(wizard.progress().step, DEFAULT_STEPS);
    }
}
