//! Prompt configuration from TOML (`[prompting]` section)

use crate::config::issue::{ConfigIssue, ConfigIssueCode};
use mindgate_application::OrchestratorParams;
use mindgate_domain::{DomainError, PromptKind, TemplateSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw prompt settings
///
/// # Example
///
/// ```toml
/// [prompting]
/// agent_name = "andy"
/// max_examples = 2
/// max_command_docs = 0      # 0 keeps every command doc
///
/// [prompting.templates]
/// bot_responder = "You are $NAME. Reply 'respond' or 'ignore'.\n$CONVO"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePromptingConfig {
    pub agent_name: String,
    pub max_examples: usize,
    pub max_command_docs: usize,
    /// Template name → replacement text
    pub templates: BTreeMap<String, String>,
}

impl Default for FilePromptingConfig {
    fn default() -> Self {
        Self {
            agent_name: "andy".to_string(),
            max_examples: 2,
            max_command_docs: 0,
            templates: BTreeMap::new(),
        }
    }
}

impl FilePromptingConfig {
    pub fn validate(&self) -> Vec<ConfigIssue> {
        self.templates
            .keys()
            .filter(|name| name.parse::<PromptKind>().is_err())
            .map(|name| {
                let valid: Vec<&str> = PromptKind::ALL.iter().map(|k| k.as_str()).collect();
                ConfigIssue::error(
                    ConfigIssueCode::UnknownTemplate { name: name.clone() },
                    format!(
                        "prompting.templates: unknown template '{}' (expected one of: {})",
                        name,
                        valid.join(", ")
                    ),
                )
            })
            .collect()
    }

    /// Build the orchestrator params. The retry bound lives in `[gateway]`.
    pub fn to_params(&self, max_generation_retries: u32) -> Result<OrchestratorParams, DomainError> {
        let templates = TemplateSet::from_named(self.templates.iter())?;
        Ok(OrchestratorParams::default()
            .with_agent_name(self.agent_name.clone())
            .with_max_examples(self.max_examples)
            .with_max_command_docs(self.max_command_docs)
            .with_max_generation_retries(max_generation_retries)
            .with_templates(templates))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_override() {
        let config: FilePromptingConfig = toml::from_str(
            r#"
agent_name = "bob"

[templates]
coding = "You are $NAME. Write code."
"#,
        )
        .unwrap();
        assert!(config.validate().is_empty());

        let params = config.to_params(3).unwrap();
        assert_eq!(params.agent_name, "bob");
        assert_eq!(params.templates.get(PromptKind::Coding), "You are $NAME. Write code.");
        assert!(!params.templates.is_overridden(PromptKind::Conversation));
    }

    #[test]
    fn test_unknown_template_name() {
        let mut config = FilePromptingConfig::default();
        config
            .templates
            .insert("greeting".to_string(), "hi".to_string());
        assert_eq!(config.validate().len(), 1);
        assert!(config.to_params(3).is_err());
    }
}
