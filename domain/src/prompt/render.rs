//! Placeholder substitution

use super::context::PromptContext;
use super::placeholder::Placeholder;

/// Rendered template text plus every token that could not be substituted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPrompt {
    pub text: String,
    /// Unknown tokens and known tokens without a value, in first-seen order.
    /// They are left verbatim in `text`.
    pub unresolved: Vec<String>,
}

impl RenderedPrompt {
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// Substitute every `$TOKEN` (a `$` followed by `[A-Z_]+`) in `template`.
pub fn render(template: &str, context: &PromptContext) -> RenderedPrompt {
    let mut text = String::with_capacity(template.len());
    let mut unresolved: Vec<String> = Vec::new();
    let mut rest = template;

    while let Some(pos) = rest.find('$') {
        text.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        let name_len = after
            .find(|c: char| !(c.is_ascii_uppercase() || c == '_'))
            .unwrap_or(after.len());

        if name_len == 0 {
            text.push('$');
            rest = after;
            continue;
        }

        let token = &rest[pos..pos + 1 + name_len];
        match Placeholder::from_token(token).and_then(|p| context.get(p)) {
            Some(value) => text.push_str(value),
            None => {
                text.push_str(token);
                if !unresolved.iter().any(|u| u == token) {
                    unresolved.push(token.to_string());
                }
            }
        }
        rest = &after[name_len..];
    }
    text.push_str(rest);

    RenderedPrompt { text, unresolved }
}
