//! REST client for the ECCO backend
//!
//! Attaches auth and tenant headers, maps error responses to readable
//! messages, and exposes the [`EccoApi`] trait the page containers depend on.

mod api;
mod client;
mod error;
mod settings;

pub use api::{EccoApi, Method};
pub use client::{EccoClient, TENANT_HEADER};
pub use error::ApiError;
pub use settings::{ApiSettings, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
