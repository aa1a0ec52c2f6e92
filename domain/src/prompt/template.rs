//! Named prompt templates

use crate::core::error::DomainError;
use std::collections::HashMap;

/// Which prompt is being built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptKind {
    Conversation,
    Coding,
    MemorySummarization,
    GoalSetting,
    BotResponder,
    ImageAnalysis,
}

impl PromptKind {
    pub const ALL: [PromptKind; 6] = [
        PromptKind::Conversation,
        PromptKind::Coding,
        PromptKind::MemorySummarization,
        PromptKind::GoalSetting,
        PromptKind::BotResponder,
        PromptKind::ImageAnalysis,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PromptKind::Conversation => "conversation",
            PromptKind::Coding => "coding",
            PromptKind::MemorySummarization => "memory_summarization",
            PromptKind::GoalSetting => "goal_setting",
            PromptKind::BotResponder => "bot_responder",
            PromptKind::ImageAnalysis => "image_analysis",
        }
    }

    /// Built-in template text
    pub fn default_template(&self) -> &'static str {
        match self {
            PromptKind::Conversation => CONVERSATION,
            PromptKind::Coding => CODING,
            PromptKind::MemorySummarization => MEMORY_SUMMARIZATION,
            PromptKind::GoalSetting => GOAL_SETTING,
            PromptKind::BotResponder => BOT_RESPONDER,
            PromptKind::ImageAnalysis => IMAGE_ANALYSIS,
        }
    }
}

impl std::fmt::Display for PromptKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PromptKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        PromptKind::ALL
            .iter()
            .find(|k| k.as_str() == normalized)
            .copied()
            .ok_or_else(|| DomainError::UnknownTemplate(s.to_string()))
    }
}

/// Template texts, built-in defaults with optional overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateSet {
    overrides: HashMap<PromptKind, String>,
}

impl TemplateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_override(mut self, kind: PromptKind, text: impl Into<String>) -> Self {
        self.overrides.insert(kind, text.into());
        self
    }

    /// Build from a `name -> text` table. Unknown names are an error.
    pub fn from_named<'a, I>(named: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        let mut set = Self::new();
        for (name, text) in named {
            let kind: PromptKind = name.parse()?;
            set.overrides.insert(kind, text.clone());
        }
        Ok(set)
    }

    pub fn get(&self, kind: PromptKind) -> &str {
        self.overrides
            .get(&kind)
            .map(String::as_str)
            .unwrap_or_else(|| kind.default_template())
    }

    pub fn is_overridden(&self, kind: PromptKind) -> bool {
        self.overrides.contains_key(&kind)
    }
}

const CONVERSATION: &str = r#"You are $NAME, a helpful agent in a shared world. Reply in plain, short messages and never pretend to be another player. Use the commands below when an action is needed; only one command per reply.

Summarized memory:
$MEMORY

Current goal: $SELF_PROMPT
Current action: $ACTION

$STATS
$INVENTORY

Commands:
$COMMAND_DOCS

$EXAMPLES
Conversation begins:"#;

const CODING: &str = r#"You are $NAME, an agent that writes code to act in the world. Write a single complete code block that accomplishes the latest request. Do not explain the code unless asked.

Summarized memory:
$MEMORY

$STATS
$INVENTORY

Available blueprints:
$BLUEPRINTS

Commands:
$COMMAND_DOCS

$EXAMPLES
Conversation:"#;

const MEMORY_SUMMARIZATION: &str = r#"You are $NAME. Update your memory by summarizing the old memory together with the new conversation below. Keep important facts, names and plans; drop chit-chat. Reply with the new memory only, in under 500 characters.

Old memory:
$MEMORY

Recent conversation:
$TO_SUMMARIZE

New memory:"#;

const GOAL_SETTING: &str = r#"You are $NAME. Pick the next goal to pursue, building on what you already achieved.

Previous goals and outcomes:
$LAST_GOALS

$STATS
$INVENTORY

Reply with a JSON object in a ```json code block, for example:
```json
{"name": "iron_pickaxe", "quantity": 1}
```"#;

const BOT_RESPONDER: &str = r#"You are $NAME, busy with: $ACTION. Another agent is talking in the conversation below. Decide whether you should stop and respond, or keep working and ignore it.

$CONVO

Reply with exactly one word: "respond" or "ignore"."#;

const IMAGE_ANALYSIS: &str = r#"You are $NAME. Describe what you see in the image in two or three sentences, focusing on objects and structures that matter for your current goal.

Current goal: $SELF_PROMPT
$STATS"#;

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_defaults_exist_for_every_kind() {
        let set = TemplateSet::new();
        for kind in PromptKind::ALL {
            assert!(!set.get(kind).is_empty());
            assert!(!set.is_overridden(kind));
        }
    }

    #[test]
    fn test_override_wins() {
        let set = TemplateSet::new().with_override(PromptKind::Coding, "write $NAME");
        assert_eq!(set.get(PromptKind::Coding), "write $NAME");
        assert_eq!(
            set.get(PromptKind::Conversation),
            PromptKind::Conversation.default_template()
        );
    }

    #[test]
    fn test_from_named_rejects_unknown() {
        let mut named = BTreeMap::new();
        named.insert("goal_setting".to_string(), "goal".to_string());
        let set = TemplateSet::from_named(&named).unwrap();
        assert_eq!(set.get(PromptKind::GoalSetting), "goal");

        named.insert("poetry".to_string(), "x".to_string());
        let err = TemplateSet::from_named(&named).unwrap_err();
        assert_eq!(err, DomainError::UnknownTemplate("poetry".to_string()));
    }
}
