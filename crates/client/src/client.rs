use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;

use crate::api::{EccoApi, Method};
use crate::error::ApiError;
use crate::settings::ApiSettings;

/// Header carrying the tenant context alongside the bearer token.
pub const TENANT_HEADER: &str = "X-Tenant-ID";

/// HTTP client for the ECCO backend. Calls are never retried.
pub struct EccoClient {
    client: reqwest::Client,
    settings: ApiSettings,
}

impl std::fmt::Debug for EccoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EccoClient").field("settings", &self.settings).finish_non_exhaustive()
    }
}

impl EccoClient {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built (TLS backend failure).
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| ApiError::ClientInit(e.to_string()))?;
        Ok(Self { client, settings })
    }

    /// Client configured from `ECCO_*` environment variables.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::new(ApiSettings::from_env())
    }

    #[must_use]
    pub const fn settings(&self) -> &ApiSettings {
        &self.settings
    }
}

const fn http_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

/// The backend's `detail` field, or `API Error: <code> <reason>`.
fn error_message(status: StatusCode, body: &str) -> String {
    let detail = serde_json::from_str::<Value>(body).ok().and_then(|v| v.get("detail").cloned());
    match detail {
        Some(Value::String(s)) if !s.trim().is_empty() => s,
        Some(Value::Null | Value::String(_)) | None => {
            let reason = status.canonical_reason().unwrap_or_default();
            format!("API Error: {} {reason}", status.as_u16()).trim_end().to_owned()
        },
        Some(other) => other.to_string(),
    }
}

#[async_trait]
impl EccoApi for EccoClient {
    async fn call(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value, ApiError> {
        let url = self.settings.url_for(path);
        tracing::debug!(%method, %url, "ECCO API call");

        let mut request =
            self.client.request(http_method(method), &url).header(CONTENT_TYPE, "application/json");
        if let Some(token) = &self.settings.token {
            request = request.bearer_auth(token);
        }
        if let Some(tenant) = &self.settings.tenant_id {
            request = request.header(TENANT_HEADER, tenant);
        }
        if let Some(body) = body.as_ref().filter(|_| method.sends_body()) {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            return Ok(Value::Null);
        }
        let text = response.text().await?;

        if !status.is_success() {
            let message = error_message(status, &text);
            tracing::warn!(%method, %url, code = status.as_u16(), %message, "ECCO API error");
            return Err(ApiError::Status { code: status.as_u16(), message });
        }
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|source| ApiError::Decode { path: path.to_owned(), source })
    }
}
