//! Canonical error taxonomy

use crate::core::messages;
use serde::{Deserialize, Serialize};

/// Backend-independent classification assigned to every failure.
///
/// | Kind | Generation / vision | Embedding |
/// |------|---------------------|-----------|
/// | `ContextOverflow` | drop oldest turn, resubmit | surfaced |
/// | `RateLimited` | placeholder, no retry | backoff + retry |
/// | `UnsupportedCapability` | placeholder | error |
/// | `MalformedPartialOutput` | regenerate, bounded | n/a |
/// | `TransientNetwork` | placeholder | error |
/// | `Fatal` | placeholder | error |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    ContextOverflow,
    RateLimited,
    UnsupportedCapability,
    MalformedPartialOutput,
    TransientNetwork,
    Fatal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ContextOverflow => "context_overflow",
            ErrorKind::RateLimited => "rate_limited",
            ErrorKind::UnsupportedCapability => "unsupported_capability",
            ErrorKind::MalformedPartialOutput => "malformed_partial_output",
            ErrorKind::TransientNetwork => "transient_network",
            ErrorKind::Fatal => "fatal",
        }
    }

    /// Fixed text surfaced to the caller of a generation path.
    pub fn placeholder(&self) -> &'static str {
        match self {
            ErrorKind::RateLimited => messages::RATE_LIMITED,
            ErrorKind::UnsupportedCapability => messages::UNSUPPORTED_CAPABILITY,
            ErrorKind::MalformedPartialOutput => messages::MALFORMED_FALLBACK,
            ErrorKind::TransientNetwork => messages::NETWORK_FAILURE,
            ErrorKind::ContextOverflow | ErrorKind::Fatal => messages::BACKEND_FAILURE,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
