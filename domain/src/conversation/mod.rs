//! Conversation domain: turns, multimodal content and outbound requests.

pub mod request;
pub mod turn;

pub use request::{ConversationRequest, RequestParams};
pub use turn::{ContentPart, Role, Turn, TurnContent};
