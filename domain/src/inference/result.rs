//! Final result of a gateway call

use super::error_kind::ErrorKind;

/// Text returned to the orchestrator. `error_kind` is `None` on success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferenceResult {
    pub text: String,
    pub error_kind: Option<ErrorKind>,
}

impl InferenceResult {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            error_kind: None,
        }
    }

    pub fn failure(kind: ErrorKind, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            error_kind: Some(kind),
        }
    }

    /// Failure carrying the kind's fixed placeholder text.
    pub fn placeholder(kind: ErrorKind) -> Self {
        Self::failure(kind, kind.placeholder())
    }

    pub fn is_success(&self) -> bool {
        self.error_kind.is_none()
    }
}
