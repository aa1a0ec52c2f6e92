//! Declarative error classification
//!
//! Raw [`BackendError`]s are mapped to an [`ErrorKind`] by walking rule tables:
//! the per-kind table for the failing provider first, then the shared table.
//! Supporting a new backend means adding rows here, never new branches in the
//! retry policy.

use super::backend_error::{BackendError, ErrorOrigin};
use super::error_kind::ErrorKind;
use crate::provider::ProviderKind;
use std::collections::HashMap;

/// Substring condition on the error message (case-insensitive)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageMatch {
    /// No condition on the message
    Ignore,
    /// At least one needle must appear
    Any(Vec<String>),
    /// Every needle must appear
    All(Vec<String>),
}

impl MessageMatch {
    pub fn any(needles: &[&str]) -> Self {
        MessageMatch::Any(needles.iter().map(|n| n.to_lowercase()).collect())
    }

    pub fn all(needles: &[&str]) -> Self {
        MessageMatch::All(needles.iter().map(|n| n.to_lowercase()).collect())
    }

    fn matches(&self, lowered: &str) -> bool {
        match self {
            MessageMatch::Ignore => true,
            MessageMatch::Any(needles) => needles.iter().any(|n| lowered.contains(n.as_str())),
            MessageMatch::All(needles) => needles.iter().all(|n| lowered.contains(n.as_str())),
        }
    }
}

/// One row of a classification table. Every condition that is set must hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierRule {
    pub kind: ErrorKind,
    pub status: Option<u16>,
    pub code: Option<String>,
    pub message: MessageMatch,
}

impl ClassifierRule {
    pub fn message_any(kind: ErrorKind, needles: &[&str]) -> Self {
        Self {
            kind,
            status: None,
            code: None,
            message: MessageMatch::any(needles),
        }
    }

    pub fn message_all(kind: ErrorKind, needles: &[&str]) -> Self {
        Self {
            kind,
            status: None,
            code: None,
            message: MessageMatch::all(needles),
        }
    }

    pub fn status(kind: ErrorKind, status: u16) -> Self {
        Self {
            kind,
            status: Some(status),
            code: None,
            message: MessageMatch::Ignore,
        }
    }

    pub fn code(kind: ErrorKind, code: &str) -> Self {
        Self {
            kind,
            status: None,
            code: Some(code.to_lowercase()),
            message: MessageMatch::Ignore,
        }
    }

    /// Narrow a status rule with a message condition.
    pub fn with_message(mut self, message: MessageMatch) -> Self {
        self.message = message;
        self
    }

    fn matches(&self, error: &BackendError, lowered_message: &str) -> bool {
        if let Some(status) = self.status
            && error.status != Some(status)
        {
            return false;
        }
        if let Some(code) = &self.code {
            match &error.code {
                Some(actual) if actual.eq_ignore_ascii_case(code) => {}
                _ => return false,
            }
        }
        self.message.matches(lowered_message)
    }
}

/// Rule-table classifier shared by every provider adapter.
#[derive(Debug, Clone)]
pub struct ErrorClassifier {
    shared: Vec<ClassifierRule>,
    per_kind: HashMap<ProviderKind, Vec<ClassifierRule>>,
}

impl Default for ErrorClassifier {
    fn default() -> Self {
        let mut classifier = Self::empty();
        classifier.shared = shared_rules();
        classifier.add_rules(
            ProviderKind::Anthropic,
            vec![
                ClassifierRule::status(ErrorKind::RateLimited, 529),
                ClassifierRule::message_any(ErrorKind::RateLimited, &["overloaded"]),
                ClassifierRule::code(ErrorKind::RateLimited, "overloaded_error"),
            ],
        );
        classifier.add_rules(
            ProviderKind::Gemini,
            vec![
                ClassifierRule::message_any(ErrorKind::RateLimited, &["resource_exhausted"]),
                ClassifierRule::message_any(
                    ErrorKind::ContextOverflow,
                    &["exceeds the maximum number of tokens"],
                ),
            ],
        );
        classifier.add_rules(
            ProviderKind::Ollama,
            vec![
                ClassifierRule::message_any(
                    ErrorKind::Fatal,
                    &["model requires more system memory"],
                ),
                ClassifierRule::message_all(ErrorKind::Fatal, &["model", "not found"]),
            ],
        );
        classifier.add_rules(
            ProviderKind::OpenAi,
            vec![ClassifierRule::code(
                ErrorKind::RateLimited,
                "insufficient_quota",
            )],
        );
        classifier.add_rules(
            ProviderKind::Mistral,
            vec![ClassifierRule::message_any(
                ErrorKind::ContextOverflow,
                &["too large for model"],
            )],
        );
        classifier
    }
}

impl ErrorClassifier {
    /// A classifier with no rules; only the origin fallbacks apply.
    pub fn empty() -> Self {
        Self {
            shared: Vec::new(),
            per_kind: HashMap::new(),
        }
    }

    pub fn add_rules(&mut self, kind: ProviderKind, rules: Vec<ClassifierRule>) {
        self.per_kind.entry(kind).or_default().extend(rules);
    }

    /// Map a raw backend error to its canonical kind.
    pub fn classify(&self, provider: ProviderKind, error: &BackendError) -> ErrorKind {
        if error.origin == ErrorOrigin::Capability {
            return ErrorKind::UnsupportedCapability;
        }

        let lowered = error.message.to_lowercase();
        let specific = self.per_kind.get(&provider).into_iter().flatten();
        if let Some(rule) = specific
            .chain(self.shared.iter())
            .find(|rule| rule.matches(error, &lowered))
        {
            return rule.kind;
        }

        match error.origin {
            ErrorOrigin::Configuration => ErrorKind::Fatal,
            _ => ErrorKind::TransientNetwork,
        }
    }
}

fn shared_rules() -> Vec<ClassifierRule> {
    use ErrorKind::*;
    vec![
        ClassifierRule::code(ContextOverflow, "context_length_exceeded"),
        ClassifierRule::message_any(
            ContextOverflow,
            &[
                "context length",
                "context_length_exceeded",
                "maximum context",
                "context window",
                "too many tokens",
                "prompt is too long",
                "reduce the length",
            ],
        ),
        ClassifierRule::status(ContextOverflow, 413),
        ClassifierRule::status(RateLimited, 429),
        ClassifierRule::code(RateLimited, "rate_limit_exceeded"),
        ClassifierRule::message_any(
            RateLimited,
            &["rate limit", "rate_limit", "quota", "too many requests"],
        ),
        ClassifierRule::message_any(
            UnsupportedCapability,
            &["does not support image", "vision is not supported"],
        ),
        ClassifierRule::message_all(UnsupportedCapability, &["image input", "not enabled"]),
        ClassifierRule::message_all(UnsupportedCapability, &["multimodal", "not supported"]),
        ClassifierRule::status(Fatal, 401),
        ClassifierRule::status(Fatal, 403),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(kind: ProviderKind, error: BackendError) -> ErrorKind {
        ErrorClassifier::default().classify(kind, &error)
    }

    #[test]
    fn test_context_overflow_by_message() {
        let err = BackendError::http(400, "This model's maximum context length is 8192 tokens");
        assert_eq!(classify(ProviderKind::OpenAi, err), ErrorKind::ContextOverflow);
    }

    #[test]
    fn test_context_overflow_by_code() {
        let err = BackendError::http(400, "bad request").with_code("context_length_exceeded");
        assert_eq!(classify(ProviderKind::Groq, err), ErrorKind::ContextOverflow);
    }

    #[test]
    fn test_rate_limited_by_status() {
        let err = BackendError::http(429, "slow down");
        assert_eq!(classify(ProviderKind::Mistral, err), ErrorKind::RateLimited);
    }

    #[test]
    fn test_image_input_requires_all_needles() {
        let matched = BackendError::http(400, "Image input is not enabled for this model");
        assert_eq!(
            classify(ProviderKind::DeepSeek, matched),
            ErrorKind::UnsupportedCapability
        );

        let unmatched = BackendError::http(400, "image input malformed");
        assert_eq!(
            classify(ProviderKind::DeepSeek, unmatched),
            ErrorKind::TransientNetwork
        );
    }

    #[test]
    fn test_per_kind_rules_take_precedence() {
        let err = BackendError::http(529, "Overloaded");
        assert_eq!(classify(ProviderKind::Anthropic, err.clone()), ErrorKind::RateLimited);
        assert_eq!(classify(ProviderKind::OpenAi, err), ErrorKind::TransientNetwork);
    }

    #[test]
    fn test_ollama_memory_is_fatal() {
        let err = BackendError::http(500, "model requires more system memory (12 GiB)");
        assert_eq!(classify(ProviderKind::Ollama, err), ErrorKind::Fatal);
    }

    #[test]
    fn test_capability_origin_is_unsupported() {
        let err = BackendError::capability("embedding not offered");
        assert_eq!(
            classify(ProviderKind::Anthropic, err),
            ErrorKind::UnsupportedCapability
        );
    }

    #[test]
    fn test_unmatched_fallbacks_by_origin() {
        assert_eq!(
            classify(ProviderKind::Qwen, BackendError::transport("connection reset")),
            ErrorKind::TransientNetwork
        );
        assert_eq!(
            classify(ProviderKind::Qwen, BackendError::configuration("QWEN_API_KEY not set")),
            ErrorKind::Fatal
        );
    }

    #[test]
    fn test_added_rule_extends_table() {
        let mut classifier = ErrorClassifier::empty();
        classifier.add_rules(
            ProviderKind::Xai,
            vec![ClassifierRule::status(ErrorKind::RateLimited, 503)
                .with_message(MessageMatch::any(&["capacity"]))],
        );
        let err = BackendError::http(503, "No capacity available");
        assert_eq!(classifier.classify(ProviderKind::Xai, &err), ErrorKind::RateLimited);
        let other = BackendError::http(503, "maintenance");
        assert_eq!(
            classifier.classify(ProviderKind::Xai, &other),
            ErrorKind::TransientNetwork
        );
    }
}
