//! Provider profile value object

use super::kind::{Capabilities, ProviderKind};
use crate::conversation::RequestParams;
use crate::core::error::DomainError;
use std::time::Duration;

/// Default per-request timeout for remote calls
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Everything needed to build exactly one provider adapter.
///
/// Profiles are immutable once built; overrides are applied through the
/// consuming `with_*` methods before the adapter is constructed.
#[derive(Clone, PartialEq)]
pub struct ProviderProfile {
    kind: ProviderKind,
    model_id: String,
    base_url: Option<String>,
    api_key_env: Option<String>,
    api_key: Option<String>,
    timeout: Duration,
    capabilities: Capabilities,
    params: RequestParams,
}

impl ProviderProfile {
    pub fn new(kind: ProviderKind, model_id: impl Into<String>) -> Result<Self, DomainError> {
        let model_id = model_id.into();
        if model_id.trim().is_empty() {
            return Err(DomainError::EmptyModel);
        }
        Ok(Self {
            kind,
            model_id,
            base_url: None,
            api_key_env: None,
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
            capabilities: kind.spec().capabilities,
            params: RequestParams::default(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Result<Self, DomainError> {
        let base_url = base_url.into();
        let trimmed = base_url.trim().trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(DomainError::InvalidProfile(format!(
                "base_url must be an http(s) URL, got '{}'",
                base_url
            )));
        }
        self.base_url = Some(trimmed.to_string());
        Ok(self)
    }

    pub fn with_api_key_env(mut self, var: impl Into<String>) -> Self {
        self.api_key_env = Some(var.into());
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn with_params(mut self, params: RequestParams) -> Self {
        self.params = params;
        self
    }

    pub fn kind(&self) -> ProviderKind {
        self.kind
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    /// Explicit base URL, or the kind's default endpoint.
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.kind.spec().default_base_url)
    }

    /// Environment variable to read the credential from, if any.
    pub fn api_key_env(&self) -> Option<&str> {
        self.api_key_env
            .as_deref()
            .or_else(|| self.kind.spec().api_key_env)
    }

    /// Inline credential from configuration. Takes precedence over the
    /// environment variable.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Whether the backend refuses unauthenticated calls.
    pub fn requires_api_key(&self) -> bool {
        self.kind.spec().api_key_env.is_some()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn params(&self) -> &RequestParams {
        &self.params
    }
}

impl std::fmt::Debug for ProviderProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderProfile")
            .field("kind", &self.kind)
            .field("model_id", &self.model_id)
            .field("base_url", &self.base_url())
            .field("api_key_env", &self.api_key_env())
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .field("capabilities", &self.capabilities)
            .field("params", &self.params)
            .finish()
    }
}

impl std::fmt::Display for ProviderProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.kind, self.model_id)
    }
}
