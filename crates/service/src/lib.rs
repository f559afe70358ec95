//! Service layer for ecco-view
//!
//! Holds list page state between the backend client and whatever front end
//! renders it: loads, mutations, bulk actions, notifications and
//! debounced auto-save.

#![allow(missing_docs, reason = "Internal crate with self-explanatory API")]
#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]
#![allow(missing_debug_implementations, reason = "Types hold trait objects")]
#![allow(clippy::missing_docs_in_private_items, reason = "Internal crate")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]
#![allow(clippy::min_ident_chars, reason = "Short error vars are idiomatic")]

mod autosave;
mod debounce;
mod error;
mod notifier;
mod onboarding;
mod page;
mod resource;
#[cfg(test)]
mod test_support;

pub use autosave::AutoSave;
pub use debounce::Debouncer;
pub use error::ServiceError;
pub use notifier::{CollectingNotifier, Notice, NoticeLevel, Notifier, TracingNotifier};
pub use onboarding::{COMPLETE_PATH, CONFIRMED_FIELD, DEFAULT_STEPS, OnboardingWizard, PROGRESS_PATH, WizardProgress};
pub use page::{BulkOutcome, ListPage, Refresh, decode_collection};
pub use resource::{ApiRequest, Resource};
