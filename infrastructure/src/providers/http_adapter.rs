//! One parameterized HTTP adapter for every supported backend.

use super::wire;
use async_trait::async_trait;
use mindgate_application::ports::provider_adapter::ProviderAdapter;
use mindgate_domain::{
    BackendError, Capabilities, ConversationRequest, ProviderKind, ProviderProfile, WireDialect,
};
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

/// Provider adapter speaking one of the [`WireDialect`]s over HTTP.
///
/// Built by [`AdapterFactory`](super::AdapterFactory), which resolves the
/// credential. Each call performs exactly one request; retries belong to
/// the gateway.
pub struct HttpProviderAdapter {
    profile: ProviderProfile,
    api_key: Option<String>,
    http: Client,
}

impl HttpProviderAdapter {
    pub fn new(profile: ProviderProfile, api_key: Option<String>) -> Result<Self, BackendError> {
        let http = Client::builder()
            .timeout(profile.timeout())
            .build()
            .map_err(|e| BackendError::configuration(format!("HTTP client: {}", e)))?;
        Ok(Self {
            profile,
            api_key,
            http,
        })
    }

    pub fn profile(&self) -> &ProviderProfile {
        &self.profile
    }

    fn dialect(&self) -> WireDialect {
        self.profile.kind().spec().dialect
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.profile.base_url().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Value, BackendError> {
        let url = self.url(path);
        let mut builder = self.http.post(&url).json(body);
        match (self.dialect(), &self.api_key) {
            (WireDialect::AnthropicMessages, key) => {
                builder = builder.header("anthropic-version", wire::ANTHROPIC_VERSION);
                if let Some(key) = key {
                    builder = builder.header("x-api-key", key);
                }
            }
            (_, Some(key)) => builder = builder.bearer_auth(key),
            (_, None) => {}
        }

        debug!(
            provider = %self.profile.kind(),
            model = self.profile.model_id(),
            url = url.as_str(),
            "Sending request"
        );

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                BackendError::transport(format!("request timed out: {}", e))
            } else {
                BackendError::transport(e.to_string())
            }
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| BackendError::transport(format!("reading response body: {}", e)))?;

        if !status.is_success() {
            return Err(wire::parse_error(status.as_u16(), &text));
        }

        serde_json::from_str(&text)
            .map_err(|e| BackendError::transport(format!("invalid response body: {}", e)))
    }

    async fn complete(
        &self,
        request: &ConversationRequest,
        image: Option<&[u8]>,
    ) -> Result<String, BackendError> {
        let dialect = self.dialect();
        let body = wire::completion_body(
            dialect,
            self.profile.model_id(),
            request,
            image,
            self.profile.params(),
        );
        let response = self.post(wire::completion_path(dialect), &body).await?;
        wire::parse_completion(dialect, &response)
    }
}

#[async_trait]
impl ProviderAdapter for HttpProviderAdapter {
    fn kind(&self) -> ProviderKind {
        self.profile.kind()
    }

    fn model_id(&self) -> &str {
        self.profile.model_id()
    }

    fn capabilities(&self) -> Capabilities {
        self.profile.capabilities()
    }

    async fn send_completion(&self, request: &ConversationRequest) -> Result<String, BackendError> {
        self.complete(request, None).await
    }

    async fn send_vision(
        &self,
        request: &ConversationRequest,
        image: &[u8],
    ) -> Result<String, BackendError> {
        if !self.capabilities().supports_vision {
            return Err(BackendError::capability(format!(
                "{} does not support image input",
                self.profile
            )));
        }
        self.complete(request, Some(image)).await
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, BackendError> {
        let dialect = self.dialect();
        let path = match wire::embedding_path(dialect) {
            Some(path) if self.capabilities().supports_embedding => path,
            _ => {
                return Err(BackendError::capability(format!(
                    "{} does not support embeddings",
                    self.profile
                )));
            }
        };
        let body = wire::embedding_body(dialect, self.profile.model_id(), text);
        let response = self.post(path, &body).await?;
        wire::parse_embedding(dialect, &response)
    }
}
