//! Conversation requests and pass-through parameters

use super::turn::{Role, Turn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Opaque request parameters (temperature, max output tokens, stop sequence,
/// model identifier, ...) passed through to the provider adapter unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestParams(BTreeMap<String, Value>);

impl RequestParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Layer `overrides` on top of `self`; keys in `overrides` win.
    pub fn merged_with(&self, overrides: &RequestParams) -> RequestParams {
        let mut merged = self.0.clone();
        for (k, v) in &overrides.0 {
            merged.insert(k.clone(), v.clone());
        }
        RequestParams(merged)
    }
}

impl From<BTreeMap<String, Value>> for RequestParams {
    fn from(map: BTreeMap<String, Value>) -> Self {
        RequestParams(map)
    }
}

/// An ordered conversation submitted to a backend.
///
/// Turn order is never changed. The only mutation permitted is dropping the
/// oldest non-system turn, which the gateway does on context overflow.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationRequest {
    pub system_message: Option<String>,
    turns: Vec<Turn>,
    pub params: RequestParams,
}

impl ConversationRequest {
    pub fn new(turns: Vec<Turn>) -> Self {
        Self {
            system_message: None,
            turns,
            params: RequestParams::default(),
        }
    }

    pub fn with_system_message(mut self, message: impl Into<String>) -> Self {
        self.system_message = Some(message.into());
        self
    }

    pub fn with_params(mut self, params: RequestParams) -> Self {
        self.params = params;
        self
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Remove the oldest non-system turn.
    ///
    /// Returns `None` (and leaves the request untouched) when the request has
    /// at most one turn or no non-system turn to drop.
    pub fn drop_oldest_turn(&mut self) -> Option<Turn> {
        if self.turns.len() <= 1 {
            return None;
        }
        let index = self.turns.iter().position(|t| !t.is_system())?;
        Some(self.turns.remove(index))
    }

    /// JSON transcript of the request as written to the dataset `input`
    /// column: the system message first, then every turn in order.
    pub fn transcript_json(&self) -> String {
        let mut entries: Vec<Value> = Vec::with_capacity(self.turns.len() + 1);
        if let Some(system) = &self.system_message {
            entries.push(serde_json::json!({
                "role": Role::System.as_str(),
                "content": system,
            }));
        }
        for turn in &self.turns {
            entries.push(serde_json::to_value(turn).unwrap_or(Value::Null));
        }
        serde_json::to_string(&entries).unwrap_or_default()
    }
}
