//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Unknown provider kind: {0}")]
    UnknownProviderKind(String),

    #[error("Model identifier must not be empty")]
    EmptyModel,

    #[error("Invalid provider profile: {0}")]
    InvalidProfile(String),

    #[error("Unknown prompt template: {0}")]
    UnknownTemplate(String),

    #[error("Unknown dataset category: {0}")]
    UnknownCategory(String),
}

impl DomainError {
    /// Check if this error is a profile construction failure.
    ///
    /// Profile failures are always fatal: the orchestrator must not start.
    pub fn is_profile_error(&self) -> bool {
        matches!(
            self,
            DomainError::UnknownProviderKind(_)
                | DomainError::EmptyModel
                | DomainError::InvalidProfile(_)
        )
    }
}
