use thiserror::Error;

/// Errors raised while turning raw UI selections into engine inputs.
///
/// Evaluation itself (filter, sort, aggregate) never fails; only the
/// translation of user-supplied strings can.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CoreError {
    #[error("invalid threshold for '{field}': {value}")]
    InvalidThreshold { field: String, value: String },

    #[error("invalid date window for '{field}': {value}")]
    InvalidDateWindow { field: String, value: String },

    #[error("invalid range for '{field}': {value}")]
    InvalidRange { field: String, value: String },

    #[error("invalid flag for '{field}': {value}")]
    InvalidFlag { field: String, value: String },

    #[error("unknown sort key: {0}")]
    UnknownSortKey(String),

    #[error("unknown sort direction: {0}")]
    UnknownSortDirection(String),

    #[error("unknown tab '{tab}' for {kind}")]
    UnknownTab { kind: &'static str, tab: String },

    #[error("invalid status '{value}' for {kind}")]
    InvalidStatus { kind: &'static str, value: String },

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("invalid page: {0}")]
    InvalidPage(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
