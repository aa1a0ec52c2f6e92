//! Conversation turns

use serde::{Deserialize, Serialize};

/// Role of a turn in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One part of a multimodal turn.
///
/// Image bytes are never serialized: transcripts written to the dataset keep
/// only the media type so that logs stay text-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text {
        text: String,
    },
    Image {
        media_type: String,
        #[serde(skip)]
        data: Vec<u8>,
    },
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text { text: text.into() }
    }

    pub fn jpeg(data: Vec<u8>) -> Self {
        ContentPart::Image {
            media_type: "image/jpeg".to_string(),
            data,
        }
    }
}

/// Content of a turn: plain text or structured multimodal parts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TurnContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

impl TurnContent {
    /// Text content, with text parts joined by a single space.
    pub fn text(&self) -> String {
        match self {
            TurnContent::Text(text) => text.clone(),
            TurnContent::Parts(parts) => parts
                .iter()
                .filter_map(|p| match p {
                    ContentPart::Text { text } => Some(text.as_str()),
                    ContentPart::Image { .. } => None,
                })
                .collect::<Vec<_>>()
                .join(" "),
        }
    }

    pub fn has_image(&self) -> bool {
        matches!(self, TurnContent::Parts(parts)
            if parts.iter().any(|p| matches!(p, ContentPart::Image { .. })))
    }
}

/// A single message in a conversation, tagged with a role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: TurnContent,
}

impl Turn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: TurnContent::Text(content.into()),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn with_parts(role: Role, parts: Vec<ContentPart>) -> Self {
        Self {
            role,
            content: TurnContent::Parts(parts),
        }
    }

    pub fn text(&self) -> String {
        self.content.text()
    }

    pub fn is_system(&self) -> bool {
        self.role == Role::System
    }
}
