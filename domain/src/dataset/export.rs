//! Transforms from dataset rows to training conversations

use crate::core::messages;
use crate::inference::ReasoningMarkers;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

/// Outputs that mark a failed call. Matched case-insensitively.
pub const BAD_OUTPUTS: &[&str] = &[
    messages::BACKEND_FAILURE,
    messages::NETWORK_FAILURE,
    messages::MALFORMED_FALLBACK,
    messages::GENERATION_APOLOGY,
    messages::RATE_LIMITED,
    messages::UNSUPPORTED_CAPABILITY,
    messages::CODE_BUSY,
    messages::NO_RESPONSE,
    "No response received.",
    "No response data.",
    "Vision is only supported",
];

/// Share of non-coding conversations kept alongside coding ones
pub const DEFAULT_NONCODING_RATIO: f64 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    Human,
    Gpt,
}

impl Speaker {
    fn from_role(role: &str) -> Self {
        match role.to_lowercase().as_str() {
            "assistant" | "model" => Speaker::Gpt,
            _ => Speaker::Human,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShareGptMessage {
    pub from: Speaker,
    pub value: String,
}

impl ShareGptMessage {
    pub fn human(value: impl Into<String>) -> Self {
        Self {
            from: Speaker::Human,
            value: value.into(),
        }
    }

    pub fn gpt(value: impl Into<String>) -> Self {
        Self {
            from: Speaker::Gpt,
            value: value.into(),
        }
    }
}

/// One exported training example
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub conversations: Vec<ShareGptMessage>,
}

impl Conversation {
    fn first_value(&self, from: Speaker) -> Option<&str> {
        self.conversations
            .iter()
            .find(|m| m.from == from && !m.value.is_empty())
            .map(|m| m.value.trim())
    }

    fn last_value(&self, from: Speaker) -> Option<&str> {
        self.conversations
            .iter()
            .rev()
            .find(|m| m.from == from && !m.value.is_empty())
            .map(|m| m.value.trim())
    }

    /// Contains a fenced code block, or ends with an action definition.
    pub fn is_coding(&self) -> bool {
        let has_fence = self.conversations.iter().any(|m| m.value.contains("```"));
        let ends_with_action = self
            .conversations
            .last()
            .is_some_and(|m| m.from == Speaker::Gpt && m.value.contains("!newAction("));
        has_fence || ends_with_action
    }
}

/// One exported vision example
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisionExample {
    pub image_path: String,
    pub text: String,
}

impl VisionExample {
    /// Build from a `(image_path, text)` row; both must be non-empty.
    pub fn from_row(image_path: &str, text: &str) -> Option<Self> {
        let (image_path, text) = (image_path.trim(), text.trim());
        if image_path.is_empty() || text.is_empty() {
            return None;
        }
        Some(Self {
            image_path: image_path.to_string(),
            text: text.to_string(),
        })
    }
}

pub fn is_bad_output(output: &str) -> bool {
    let lowered = output.to_lowercase();
    BAD_OUTPUTS
        .iter()
        .any(|bad| lowered.contains(&bad.to_lowercase()))
}

/// Parse the `input` column into messages.
///
/// The column normally holds a JSON array of `{role, content}` objects. A
/// doubly encoded string is unwrapped once. Anything else becomes a single
/// human message carrying the raw text.
pub fn parse_transcript(input: &str) -> Vec<ShareGptMessage> {
    let value = match serde_json::from_str::<Value>(input) {
        Ok(Value::String(inner)) => {
            serde_json::from_str::<Value>(&inner).unwrap_or(Value::String(inner))
        }
        Ok(value) => value,
        Err(_) => return vec![ShareGptMessage::human(input)],
    };

    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| {
                let obj = item.as_object()?;
                let role = obj.get("role")?;
                let content = obj.get("content")?;
                let role = match role {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                Some(ShareGptMessage {
                    from: Speaker::from_role(&role),
                    value: content_text(content),
                })
            })
            .collect(),
        Value::String(s) => vec![ShareGptMessage::human(s)],
        other => vec![ShareGptMessage::human(other.to_string())],
    }
}

fn content_text(content: &Value) -> String {
    match content {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(parts) => parts
            .iter()
            .filter_map(|part| match part {
                Value::String(s) => Some(s.clone()),
                Value::Object(obj) if obj.get("type").and_then(Value::as_str) == Some("text") => {
                    Some(match obj.get("text") {
                        Some(Value::String(s)) => s.clone(),
                        Some(other) => other.to_string(),
                        None => String::new(),
                    })
                }
                _ => None,
            })
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string(),
        other => other.to_string(),
    }
}

/// Clean a raw model output for training. Returns `None` when nothing usable
/// is left.
pub fn clean_output(markers: &ReasoningMarkers, output: &str) -> Option<String> {
    let output = output.trim();
    if output.is_empty() || is_bad_output(output) {
        return None;
    }
    let cleaned = markers.strip_undefined(output);
    let cleaned = markers.truncate_unterminated(&cleaned);
    let cleaned = markers.strip(&cleaned);
    (!cleaned.is_empty()).then_some(cleaned)
}

/// Build a conversation from one `(input, output)` row.
pub fn build_conversation(
    markers: &ReasoningMarkers,
    input: &str,
    output: &str,
) -> Option<Conversation> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    let mut messages: Vec<ShareGptMessage> = parse_transcript(input)
        .into_iter()
        .filter_map(|m| {
            let value = m.value.trim();
            (!value.is_empty()).then(|| ShareGptMessage {
                from: m.from,
                value: value.to_string(),
            })
        })
        .collect();
    if messages.is_empty() {
        return None;
    }

    messages.push(ShareGptMessage::gpt(clean_output(markers, output)?));

    let has_human = messages.iter().any(|m| m.from == Speaker::Human);
    has_human.then_some(Conversation {
        conversations: messages,
    })
}

#[derive(Hash, PartialEq, Eq)]
enum DedupeKey {
    Pair(String, String),
    Full(Vec<ShareGptMessage>),
}

/// Drop conversations sharing the same first human and last gpt message,
/// keeping the first occurrence.
pub fn dedupe(conversations: Vec<Conversation>) -> Vec<Conversation> {
    let mut seen = HashSet::new();
    conversations
        .into_iter()
        .filter(|conv| {
            let key = match (conv.first_value(Speaker::Human), conv.last_value(Speaker::Gpt)) {
                (Some(human), Some(gpt)) if !human.is_empty() && !gpt.is_empty() => {
                    DedupeKey::Pair(human.to_string(), gpt.to_string())
                }
                _ => DedupeKey::Full(conv.conversations.clone()),
            };
            seen.insert(key)
        })
        .collect()
}

/// Split into `(coding, non_coding)`.
pub fn partition_coding(conversations: Vec<Conversation>) -> (Vec<Conversation>, Vec<Conversation>) {
    conversations.into_iter().partition(Conversation::is_coding)
}

/// Number of non-coding conversations to keep next to `coding_count` coding ones.
pub fn noncoding_quota(coding_count: usize, available: usize, ratio: f64) -> usize {
    let target = (ratio * coding_count as f64).round() as usize;
    target.min(available)
}
