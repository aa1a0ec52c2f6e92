//! Fixed placeholder texts surfaced in place of model output.
//!
//! Generation paths never raise to the caller; when a call cannot produce
//! model text, one of these strings is returned in the normal conversational
//! flow instead. The dataset logger and exporter match on the same strings so
//! failed calls stay out of training data.

/// Returned for transient network failures.
pub const NETWORK_FAILURE: &str = "My brain disconnected, try again.";

/// Returned for runtime errors that are neither transient nor rate limits.
pub const BACKEND_FAILURE: &str = "My brain just kinda stopped working. Try again.";

/// Returned immediately when a generation call is rate limited.
pub const RATE_LIMITED: &str =
    "I'm being rate limited by my model provider right now. Give me a moment and try again.";

/// Returned when the backend cannot handle the request's capability.
pub const UNSUPPORTED_CAPABILITY: &str = "My model doesn't support that kind of request.";

/// Returned when a vision request reaches a backend without image input.
pub const VISION_UNSUPPORTED: &str =
    "Vision is only supported by certain models. My current model can't see images.";

/// Returned after every regeneration attempt produced malformed reasoning.
pub const MALFORMED_FALLBACK: &str = "I thought too hard, sorry, try again.";

/// Returned when conversational retries keep producing unusable output.
pub const GENERATION_APOLOGY: &str = "Sorry, I couldn't come up with a good answer. Try again.";

/// Returned when a code-generation request arrives while one is running.
pub const CODE_BUSY: &str = "I'm already generating code, please wait.";

/// Written by some backends for an empty completion.
pub const NO_RESPONSE: &str = "*no response*";

/// Placeholders that mark a failed call. Outputs containing any of these are
/// never written to the dataset.
pub const FAILURE_PLACEHOLDERS: &[&str] = &[
    NETWORK_FAILURE,
    BACKEND_FAILURE,
    RATE_LIMITED,
    UNSUPPORTED_CAPABILITY,
    VISION_UNSUPPORTED,
    CODE_BUSY,
    NO_RESPONSE,
    "No response received.",
    "No response data.",
];

/// Check whether `text` carries a failure placeholder.
pub fn is_failure_placeholder(text: &str) -> bool {
    FAILURE_PLACEHOLDERS.iter().any(|p| text.contains(p))
}
