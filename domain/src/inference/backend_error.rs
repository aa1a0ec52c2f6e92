//! Provider-neutral raw error returned by adapters

use thiserror::Error;

/// Where a backend error came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorOrigin {
    /// Connection, DNS, TLS or timeout failure before a response arrived
    Transport,
    /// The backend answered with a non-success status
    Http,
    /// The adapter does not offer the requested capability
    Capability,
    /// Credential, endpoint or model resolution failure
    Configuration,
}

/// A raw failure from one remote call, before classification.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", self.describe())]
pub struct BackendError {
    pub origin: ErrorOrigin,
    pub status: Option<u16>,
    pub code: Option<String>,
    pub message: String,
}

impl BackendError {
    pub fn new(origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            origin,
            status: None,
            code: None,
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorOrigin::Transport, message)
    }

    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            ..Self::new(ErrorOrigin::Http, message)
        }
    }

    pub fn capability(message: impl Into<String>) -> Self {
        Self::new(ErrorOrigin::Capability, message)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorOrigin::Configuration, message)
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    fn describe(&self) -> String {
        match (self.status, &self.code) {
            (Some(status), Some(code)) => format!("HTTP {} ({}): {}", status, code, self.message),
            (Some(status), None) => format!("HTTP {}: {}", status, self.message),
            (None, Some(code)) => format!("{}: {}", code, self.message),
            (None, None) => self.message.clone(),
        }
    }
}
