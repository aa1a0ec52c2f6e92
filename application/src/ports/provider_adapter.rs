//! Provider Adapter port
//!
//! Defines the single-call contract every backend adapter fulfils.
//! Implementations live in the infrastructure layer.

use async_trait::async_trait;
use mindgate_domain::{BackendError, Capabilities, ConversationRequest, ProviderKind};

/// One remote call to one backend.
///
/// Adapters never retry and never classify; they return raw text or a raw
/// [`BackendError`]. Optional capabilities default to a `Capability` error,
/// which the classifier maps to `UnsupportedCapability`.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    fn kind(&self) -> ProviderKind;

    fn model_id(&self) -> &str;

    fn capabilities(&self) -> Capabilities;

    /// Submit a text completion.
    async fn send_completion(&self, request: &ConversationRequest) -> Result<String, BackendError>;

    /// Submit a completion with one attached JPEG image.
    async fn send_vision(
        &self,
        _request: &ConversationRequest,
        _image: &[u8],
    ) -> Result<String, BackendError> {
        Err(BackendError::capability(format!(
            "{} does not support image input",
            self.kind()
        )))
    }

    /// Embed `text` into a vector.
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, BackendError> {
        Err(BackendError::capability(format!(
            "{} does not support embeddings",
            self.kind()
        )))
    }
}
