//! Values available to template rendering

use super::placeholder::Placeholder;
use crate::conversation::Turn;
use std::collections::BTreeMap;

/// Placeholder values for one render. A placeholder set to an empty string
/// counts as resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptContext {
    values: BTreeMap<Placeholder, String>,
}

impl PromptContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, placeholder: Placeholder, value: impl Into<String>) -> Self {
        self.values.insert(placeholder, value.into());
        self
    }

    pub fn set(&mut self, placeholder: Placeholder, value: impl Into<String>) {
        self.values.insert(placeholder, value.into());
    }

    pub fn get(&self, placeholder: Placeholder) -> Option<&str> {
        self.values.get(&placeholder).map(String::as_str)
    }

    pub fn contains(&self, placeholder: Placeholder) -> bool {
        self.values.contains_key(&placeholder)
    }

    /// Fill `$EXAMPLES` with at most `max` examples, numbered from 1.
    pub fn with_examples(self, examples: &[String], max: usize) -> Self {
        let text = if examples.is_empty() || max == 0 {
            String::new()
        } else {
            let body = examples
                .iter()
                .take(max)
                .enumerate()
                .map(|(i, ex)| format!("Example {}:\n{}", i + 1, ex.trim()))
                .collect::<Vec<_>>()
                .join("\n\n");
            format!("Examples of how to respond:\n{}", body)
        };
        self.with(Placeholder::Examples, text)
    }

    /// Fill `$COMMAND_DOCS` with at most `max` entries; `0` keeps them all.
    pub fn with_command_docs(self, docs: &[String], max: usize) -> Self {
        let limit = if max == 0 { docs.len() } else { max };
        let text = docs
            .iter()
            .take(limit)
            .map(|d| d.trim())
            .collect::<Vec<_>>()
            .join("\n");
        self.with(Placeholder::CommandDocs, text)
    }

    /// Fill `$CONVO` with a plain-text rendering of `turns`.
    pub fn with_conversation(self, turns: &[Turn]) -> Self {
        self.with(Placeholder::Convo, format_transcript(turns))
    }
}

/// One `role: text` line per turn.
pub fn format_transcript(turns: &[Turn]) -> String {
    turns
        .iter()
        .map(|t| format!("{}: {}", t.role, t.text()))
        .collect::<Vec<_>>()
        .join("\n")
}
