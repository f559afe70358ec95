//! Typed error enum for the service layer.
//!
//! Unifies backend and view failures so callers can match on the failure
//! mode instead of inspecting messages.

use ecco_view_client::ApiError;
use ecco_view_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Backend call failed (transport, non-2xx, undecodable body).
    #[error("{0}")]
    Api(#[from] ApiError),

    /// The view selections could not be turned into a query.
    #[error("invalid view: {0}")]
    View(#[from] CoreError),

    /// A list response was neither an array nor a known envelope.
    #[error("unexpected response from {path}: {detail}")]
    UnexpectedShape { path: String, detail: String },

    /// Records inside an otherwise well-formed response failed to decode.
    #[error("serialization: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Caller provided invalid input (empty id list, out-of-range step).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A form failed a precondition; the message is user-facing.
    #[error("{0}")]
    Validation(String),
}

impl ServiceError {
    /// Whether this error is likely transient (worth retrying by the user).
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Api(e) => e.is_transient(),
            _ => false,
        }
    }

    /// Whether the session needs a fresh token.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api(e) if e.is_unauthorized())
    }
}
