//! Domain layer for mindgate
//!
//! This crate contains the core rules of the inference gateway: conversation
//! types, the canonical error taxonomy, the rule-table error classifier,
//! reasoning-marker repair, dataset filtering and encoding, and prompt
//! templates. It performs no I/O.
//!
//! # Core Concepts
//!
//! ## Error taxonomy
//!
//! Every backend failure is reduced to one [`ErrorKind`] by the
//! [`ErrorClassifier`], which walks declarative [`ClassifierRule`] tables keyed
//! by [`ProviderKind`]. Retry and repair decisions only ever look at the kind.
//!
//! ## Dataset
//!
//! Accepted interactions become [`LogCategory`] rows. Category routing and
//! skip decisions live in [`dataset::filter`]; the quoting rules in
//! [`dataset::codec`].

pub mod conversation;
pub mod core;
pub mod dataset;
pub mod goal;
pub mod inference;
pub mod prompt;
pub mod provider;
pub mod util;

// Re-export commonly used types
pub use conversation::{ContentPart, ConversationRequest, RequestParams, Role, Turn, TurnContent};
pub use core::{error::DomainError, messages};
pub use dataset::{
    Conversation, DatasetLogFlags, IMAGE_DIR, LogCategory, RecordDecision, ShareGptMessage,
    SkipReason, Speaker, VisionExample, decide_text, decide_vision,
};
pub use goal::{SelfGoal, parse_goal};
pub use inference::{
    BackendError, ClassifierRule, ErrorClassifier, ErrorKind, ErrorOrigin, InferenceResult,
    MarkerState, MessageMatch, ReasoningMarkers,
};
pub use prompt::{Placeholder, PromptContext, PromptKind, RenderedPrompt, TemplateSet};
pub use provider::{Capabilities, ProviderKind, ProviderProfile, ProviderSpec, WireDialect};
