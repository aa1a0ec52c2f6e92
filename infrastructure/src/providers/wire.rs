//! Request bodies and response parsing for the three wire dialects.
//!
//! Everything here is pure JSON shaping so that dialect quirks can be tested
//! without a network:
//!
//! | Dialect | Completion path | System message | Image payload |
//! |---------|-----------------|----------------|---------------|
//! | OpenAI chat | `chat/completions` | first message | `image_url` data URL |
//! | Anthropic messages | `messages` | top-level `system` | base64 `image` block |
//! | Ollama chat | `api/chat` | first message | `images` array |

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use mindgate_domain::{
    BackendError, ContentPart, ConversationRequest, RequestParams, Role, Turn, TurnContent,
    WireDialect,
};
use serde_json::{Map, Value, json};

/// Anthropic rejects requests without `max_tokens`.
const ANTHROPIC_DEFAULT_MAX_TOKENS: u64 = 4096;

pub const ANTHROPIC_VERSION: &str = "2023-06-01";

pub fn completion_path(dialect: WireDialect) -> &'static str {
    match dialect {
        WireDialect::OpenAiChat => "chat/completions",
        WireDialect::AnthropicMessages => "messages",
        WireDialect::OllamaChat => "api/chat",
    }
}

/// Embedding endpoint, or `None` when the dialect has none.
pub fn embedding_path(dialect: WireDialect) -> Option<&'static str> {
    match dialect {
        WireDialect::OpenAiChat => Some("embeddings"),
        WireDialect::OllamaChat => Some("api/embeddings"),
        WireDialect::AnthropicMessages => None,
    }
}

/// Build the JSON body of a completion or vision request.
///
/// `image` is attached to the last user turn. `profile_params` are merged
/// first, then the request's own params, so request values win.
pub fn completion_body(
    dialect: WireDialect,
    model: &str,
    request: &ConversationRequest,
    image: Option<&[u8]>,
    profile_params: &RequestParams,
) -> Value {
    let attach_at = image.and_then(|_| {
        request
            .turns()
            .iter()
            .rposition(|t| t.role == Role::User)
    });
    let images_for = |index: usize, turn: &Turn| -> Vec<Vec<u8>> {
        let mut images = turn_images(turn);
        if Some(index) == attach_at
            && let Some(bytes) = image
        {
            images.push(bytes.to_vec());
        }
        images
    };

    let params = profile_params.merged_with(&request.params);
    let mut body = Map::new();
    body.insert("model".to_string(), Value::String(model.to_string()));

    match dialect {
        WireDialect::OpenAiChat => {
            let mut messages = Vec::with_capacity(request.len() + 1);
            if let Some(system) = &request.system_message {
                messages.push(json!({"role": "system", "content": system}));
            }
            for (index, turn) in request.turns().iter().enumerate() {
                messages.push(openai_message(turn, &images_for(index, turn)));
            }
            body.insert("messages".to_string(), Value::Array(messages));
            body.insert("stream".to_string(), Value::Bool(false));
            merge_params(&mut body, &params);
        }
        WireDialect::AnthropicMessages => {
            let mut system_parts: Vec<String> = request.system_message.iter().cloned().collect();
            let mut messages = Vec::with_capacity(request.len());
            for (index, turn) in request.turns().iter().enumerate() {
                if turn.is_system() {
                    system_parts.push(turn.text());
                    continue;
                }
                messages.push(anthropic_message(turn, &images_for(index, turn)));
            }
            if !system_parts.is_empty() {
                body.insert("system".to_string(), Value::String(system_parts.join("\n\n")));
            }
            body.insert("messages".to_string(), Value::Array(messages));
            body.insert(
                "max_tokens".to_string(),
                Value::from(ANTHROPIC_DEFAULT_MAX_TOKENS),
            );
            merge_params(&mut body, &params);
        }
        WireDialect::OllamaChat => {
            let mut messages = Vec::with_capacity(request.len() + 1);
            if let Some(system) = &request.system_message {
                messages.push(json!({"role": "system", "content": system}));
            }
            for (index, turn) in request.turns().iter().enumerate() {
                messages.push(ollama_message(turn, &images_for(index, turn)));
            }
            body.insert("messages".to_string(), Value::Array(messages));
            body.insert("stream".to_string(), Value::Bool(false));
            if !params.is_empty() {
                let options: Map<String, Value> =
                    params.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
                body.insert("options".to_string(), Value::Object(options));
            }
        }
    }

    Value::Object(body)
}

/// Build the JSON body of an embedding request.
pub fn embedding_body(dialect: WireDialect, model: &str, text: &str) -> Value {
    match dialect {
        WireDialect::OllamaChat => json!({"model": model, "prompt": text}),
        _ => json!({"model": model, "input": text}),
    }
}

/// Extract the generated text from a successful completion response.
pub fn parse_completion(dialect: WireDialect, body: &Value) -> Result<String, BackendError> {
    let text = match dialect {
        WireDialect::OpenAiChat => body
            .pointer("/choices/0/message/content")
            .map(|content| match content {
                Value::String(s) => s.clone(),
                Value::Null => String::new(),
                other => join_text_blocks(other),
            }),
        WireDialect::AnthropicMessages => body.get("content").map(join_text_blocks),
        WireDialect::OllamaChat => body
            .pointer("/message/content")
            .and_then(Value::as_str)
            .map(str::to_string),
    };
    text.ok_or_else(|| BackendError::transport("response did not contain any generated text"))
}

/// Extract the vector from a successful embedding response.
pub fn parse_embedding(dialect: WireDialect, body: &Value) -> Result<Vec<f32>, BackendError> {
    let values = match dialect {
        WireDialect::OllamaChat => body.get("embedding"),
        _ => body.pointer("/data/0/embedding"),
    };
    values
        .and_then(Value::as_array)
        .map(|values| {
            values
                .iter()
                .filter_map(Value::as_f64)
                .map(|v| v as f32)
                .collect()
        })
        .ok_or_else(|| BackendError::transport("response did not contain an embedding"))
}

/// Turn a non-success response into a [`BackendError`].
///
/// Understands the error envelopes of all three dialects:
/// `{"error": {"message", "code" | "type" | "status"}}`, Gemini's array-wrapped
/// variant of it, and Ollama's `{"error": "message"}`.
pub fn parse_error(status: u16, body: &str) -> BackendError {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let envelope = match &parsed {
        Some(Value::Array(items)) => items.first(),
        other => other.as_ref(),
    };
    let error = envelope.and_then(|v| v.get("error"));

    let (message, code) = match error {
        Some(Value::String(message)) => (Some(message.clone()), None),
        Some(Value::Object(fields)) => {
            let message = fields
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string);
            let code = ["code", "type", "status"]
                .iter()
                .find_map(|key| fields.get(*key).and_then(Value::as_str))
                .map(str::to_string);
            (message, code)
        }
        _ => (None, None),
    };

    let message = message.unwrap_or_else(|| {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            format!("HTTP status {}", status)
        } else {
            trimmed.to_string()
        }
    });
    let error = BackendError::http(status, message);
    match code {
        Some(code) => error.with_code(code),
        None => error,
    }
}

fn merge_params(body: &mut Map<String, Value>, params: &RequestParams) {
    for (key, value) in params.iter() {
        body.insert(key.clone(), value.clone());
    }
}

fn turn_images(turn: &Turn) -> Vec<Vec<u8>> {
    match &turn.content {
        TurnContent::Text(_) => Vec::new(),
        TurnContent::Parts(parts) => parts
            .iter()
            .filter_map(|p| match p {
                ContentPart::Image { data, .. } if !data.is_empty() => Some(data.clone()),
                _ => None,
            })
            .collect(),
    }
}

fn openai_message(turn: &Turn, images: &[Vec<u8>]) -> Value {
    if images.is_empty() {
        return json!({"role": turn.role.as_str(), "content": turn.text()});
    }
    let mut content = vec![json!({"type": "text", "text": turn.text()})];
    content.extend(images.iter().map(|bytes| {
        json!({
            "type": "image_url",
            "image_url": {"url": format!("data:image/jpeg;base64,{}", STANDARD.encode(bytes))},
        })
    }));
    json!({"role": turn.role.as_str(), "content": content})
}

fn anthropic_message(turn: &Turn, images: &[Vec<u8>]) -> Value {
    if images.is_empty() {
        return json!({"role": turn.role.as_str(), "content": turn.text()});
    }
    let mut content: Vec<Value> = images
        .iter()
        .map(|bytes| {
            json!({
                "type": "image",
                "source": {
                    "type": "base64",
                    "media_type": "image/jpeg",
                    "data": STANDARD.encode(bytes),
                },
            })
        })
        .collect();
    content.push(json!({"type": "text", "text": turn.text()}));
    json!({"role": turn.role.as_str(), "content": content})
}

fn ollama_message(turn: &Turn, images: &[Vec<u8>]) -> Value {
    let mut message = json!({"role": turn.role.as_str(), "content": turn.text()});
    if !images.is_empty() {
        let encoded: Vec<Value> = images
            .iter()
            .map(|bytes| Value::String(STANDARD.encode(bytes)))
            .collect();
        message["images"] = Value::Array(encoded);
    }
    message
}

fn join_text_blocks(value: &Value) -> String {
    value
        .as_array()
        .map(|blocks| {
            blocks
                .iter()
                .filter(|b| b.get("type").and_then(Value::as_str) == Some("text"))
                .filter_map(|b| b.get("text").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default()
}
