//! Core types and the list view engine for ecco-view
//!
//! Record types for each dashboard page, plus the pure filter, sort,
//! aggregate and pagination functions the pages are built from.

#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]

pub mod constants;
pub mod domain;
mod env_config;
mod error;
pub mod export;
pub mod filter;
pub mod pagination;
mod proptests;
pub mod record;
pub mod sort;
pub mod stats;
pub mod time;
pub mod view;

pub use domain::*;
pub use env_config::{env_non_empty, env_parse_with_default};
pub use error::*;
pub use export::Tabular;
pub use filter::{DateWindow, FieldFilter, FilterSpec, Predicate, TimeRange, filter};
pub use pagination::{PageInfo, PageRequest, paginate};
pub use record::{FieldKind, ListRecord, RecordKind, Summarize};
pub use sort::{SortDirection, SortKey, SortValue, comparator_for, sort_records};
pub use stats::{Showing, percent};
pub use view::{ListView, OwnedListView, Selection, ViewState, query};
