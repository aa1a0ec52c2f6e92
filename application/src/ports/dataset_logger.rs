//! Dataset logger port.
//!
//! The gateway hands every raw completion attempt, and the orchestrator every
//! successful vision transcript, to a [`DatasetLogger`]. What ends up on disk
//! is decided by the implementation, which may skip echoes of the input
//! and known failure placeholders.

use mindgate_domain::LogCategory;

/// Port for recording dataset rows.
///
/// Both methods are synchronous and non-fallible so that logging never
/// disrupts a call. Implementations filter, count and swallow their own
/// failures.
pub trait DatasetLogger: Send + Sync {
    /// Record a text interaction. `input` is the JSON transcript sent to the
    /// backend, `output` the raw model text. Text categories are routed by
    /// inspecting `output`.
    fn record(&self, category: LogCategory, input: &str, output: &str);

    /// Persist `image` to the sidecar directory and record its transcript.
    fn record_vision(&self, image: &[u8], transcript: &str);
}

/// No-op implementation for tests and when dataset logging is disabled.
pub struct NoDatasetLogger;

impl DatasetLogger for NoDatasetLogger {
    fn record(&self, _category: LogCategory, _input: &str, _output: &str) {}

    fn record_vision(&self, _image: &[u8], _transcript: &str) {}
}
