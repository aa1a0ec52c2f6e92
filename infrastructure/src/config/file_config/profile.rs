//! Provider profile configuration from TOML (`[profile]` and the
//! `[code_profile]`, `[vision_profile]`, `[embedding_profile]` overrides)

use crate::config::issue::{ConfigIssue, ConfigIssueCode};
use mindgate_domain::{DomainError, ProviderKind, ProviderProfile, RequestParams};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;

/// Raw provider profile from TOML
///
/// # Example
///
/// ```toml
/// [profile]
/// kind = "anthropic"                # openai, anthropic, gemini, ollama, deepseek, ...
/// model = "claude-3-5-haiku-latest"
/// api_key_env = "MY_ANTHROPIC_KEY"  # optional, defaults per kind
/// timeout_secs = 120
///
/// [profile.params]
/// temperature = 0.7
/// max_tokens = 1024
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProfileConfig {
    pub kind: String,
    pub model: String,
    pub base_url: Option<String>,
    pub api_key_env: Option<String>,
    /// Inline credential (prefer `api_key_env`)
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    /// Opaque request parameters merged into every request body
    pub params: BTreeMap<String, Value>,
}

impl Default for FileProfileConfig {
    fn default() -> Self {
        Self {
            kind: "openai".to_string(),
            model: "gpt-4o-mini".to_string(),
            base_url: None,
            api_key_env: None,
            api_key: None,
            timeout_secs: 120,
            params: BTreeMap::new(),
        }
    }
}

impl FileProfileConfig {
    /// Parse the provider kind, collecting an issue on failure.
    pub fn parse_kind(&self, section: &str) -> (Option<ProviderKind>, Vec<ConfigIssue>) {
        match self.kind.parse::<ProviderKind>() {
            Ok(kind) => (Some(kind), vec![]),
            Err(_) => {
                let valid: Vec<&str> = ProviderKind::ALL.iter().map(|k| k.as_str()).collect();
                let issue = ConfigIssue::error(
                    ConfigIssueCode::UnknownProviderKind {
                        field: format!("{}.kind", section),
                        value: self.kind.clone(),
                    },
                    format!(
                        "{}.kind: unknown provider '{}' (expected one of: {})",
                        section,
                        self.kind,
                        valid.join(", ")
                    ),
                );
                (None, vec![issue])
            }
        }
    }

    /// All issues of this section.
    pub fn validate(&self, section: &str) -> Vec<ConfigIssue> {
        let mut issues = self.parse_kind(section).1;
        if self.model.trim().is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyModelName {
                    field: format!("{}.model", section),
                },
                format!("{}.model: model name cannot be empty", section),
            ));
        }
        if let Some(url) = &self.base_url
            && !(url.starts_with("http://") || url.starts_with("https://"))
        {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::InvalidBaseUrl {
                    field: format!("{}.base_url", section),
                    value: url.clone(),
                },
                format!("{}.base_url: '{}' is not an http(s) URL", section, url),
            ));
        }
        if self.timeout_secs == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroValue {
                    field: format!("{}.timeout_secs", section),
                },
                format!("{}.timeout_secs cannot be 0", section),
            ));
        }
        issues
    }

    /// Build the domain profile.
    pub fn to_profile(&self) -> Result<ProviderProfile, DomainError> {
        let kind: ProviderKind = self.kind.parse()?;
        let mut profile = ProviderProfile::new(kind, self.model.trim())?
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_params(RequestParams::from(self.params.clone()));
        if let Some(url) = &self.base_url {
            profile = profile.with_base_url(url)?;
        }
        if let Some(var) = &self.api_key_env {
            profile = profile.with_api_key_env(var);
        }
        if let Some(key) = &self.api_key {
            profile = profile.with_api_key(key);
        }
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_profile_with_params() {
        let config: FileProfileConfig = toml::from_str(
            r#"
kind = "Anthropic"
model = "claude-3-5-haiku-latest"

[params]
temperature = 0.7
stop = ["\n\n"]
"#,
        )
        .unwrap();

        let profile = config.to_profile().unwrap();
        assert_eq!(profile.kind(), ProviderKind::Anthropic);
        assert_eq!(profile.params().get("temperature"), Some(&Value::from(0.7)));
        assert_eq!(profile.timeout(), Duration::from_secs(120));
    }

    #[test]
    fn test_unknown_kind_is_error_issue() {
        let config = FileProfileConfig {
            kind: "claude-cloud".to_string(),
            ..Default::default()
        };
        let issues = config.validate("profile");
        assert_eq!(issues.len(), 1);
        assert!(issues[0].is_error());
        assert!(issues[0].message.contains("claude-cloud"));
        assert!(config.to_profile().is_err());
    }

    #[test]
    fn test_empty_model_and_bad_url() {
        let config = FileProfileConfig {
            model: "  ".to_string(),
            base_url: Some("localhost:11434".to_string()),
            ..Default::default()
        };
        let issues = config.validate("code_profile");
        assert_eq!(issues.len(), 2);
        assert_eq!(
            issues[0].code,
            ConfigIssueCode::EmptyModelName {
                field: "code_profile.model".to_string()
            }
        );
    }

    #[test]
    fn test_overrides_applied() {
        let config = FileProfileConfig {
            kind: "ollama".to_string(),
            model: "llava".to_string(),
            base_url: Some("http://gpu-box:11434/".to_string()),
            timeout_secs: 30,
            ..Default::default()
        };
        let profile = config.to_profile().unwrap();
        assert_eq!(profile.base_url(), "http://gpu-box:11434");
        assert_eq!(profile.timeout(), Duration::from_secs(30));
        assert!(!profile.requires_api_key());
    }
}
