use std::time::Duration;

use ecco_view_core::{env_non_empty, env_parse_with_default};

/// Backend base URL used when `ECCO_API_URL` is unset.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Request timeout used when `ECCO_API_TIMEOUT_SECS` is unset.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for [`crate::EccoClient`].
#[derive(Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub token: Option<String>,
    pub tenant_id: Option<String>,
    pub timeout: Duration,
}

impl std::fmt::Debug for ApiSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiSettings")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .field("tenant_id", &self.tenant_id)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl ApiSettings {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            token: None,
            tenant_id: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Reads `ECCO_API_URL`, `ECCO_API_TOKEN`, `ECCO_TENANT_ID` and
    /// `ECCO_API_TIMEOUT_SECS`. Blank values count as unset.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url = env_non_empty("ECCO_API_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
        let timeout_secs = env_parse_with_default("ECCO_API_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS);
        let mut settings = Self::new(base_url).with_timeout(Duration::from_secs(timeout_secs));
        settings.token = env_non_empty("ECCO_API_TOKEN");
        settings.tenant_id = env_non_empty("ECCO_TENANT_ID");
        settings
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    #[must_use]
    pub fn with_tenant(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Absolute `http(s)://` paths are used verbatim; anything else is
    /// appended to the base URL.
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_owned()
        } else if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }
}
