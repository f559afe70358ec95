//! Backend boundary abstraction
//!
//! List pages talk to the backend only through [`EccoApi`], so they can be
//! driven by [`crate::EccoClient`] in production and by an in-memory fake in
//! tests.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match *self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    /// Methods that carry a JSON request body.
    #[must_use]
    pub const fn sends_body(&self) -> bool {
        matches!(*self, Self::Post | Self::Put | Self::Patch)
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JSON-over-HTTP backend interface.
#[async_trait]
pub trait EccoApi: Send + Sync {
    /// Issue one call. `204 No Content` yields `Value::Null`.
    async fn call(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value, ApiError>;

    async fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.call(Method::Get, path, None).await
    }

    async fn delete(&self, path: &str) -> Result<Value, ApiError> {
        self.call(Method::Delete, path, None).await
    }
}
