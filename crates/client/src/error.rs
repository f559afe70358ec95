//! Typed error enum for the backend client.

use thiserror::Error;

/// Errors from ECCO API calls.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// Non-2xx response. `message` is the backend's `detail` when it sent one.
    #[error("{message}")]
    Status { code: u16, message: String },
    #[error("invalid JSON from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("client initialization failed: {0}")]
    ClientInit(String),
}

impl ApiError {
    /// HTTP status code, when the backend answered.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// The session is missing or expired and the user has to log in again.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        match self {
            Self::Status { code, message } => *code == 401 || message.contains("expired"),
            _ => false,
        }
    }

    /// Whether a later identical call could succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Status { code, .. } => matches!(code, 429 | 500 | 502 | 503 | 504),
            Self::Decode { .. } | Self::ClientInit(_) => false,
        }
    }
}
