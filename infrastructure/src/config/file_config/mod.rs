//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into domain and application
//! types by [`FileConfig::resolve`].

mod gateway;
mod logging;
mod profile;
mod prompting;

pub use gateway::FileGatewayConfig;
pub use logging::FileLoggingConfig;
pub use profile::FileProfileConfig;
pub use prompting::FilePromptingConfig;

use super::error::ConfigError;
use super::issue::ConfigIssue;
use mindgate_application::{GatewayParams, OrchestratorParams};
use mindgate_domain::ProviderProfile;
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Main provider profile (conversation, memory, goals)
    pub profile: FileProfileConfig,
    /// Dedicated profile for code generation
    pub code_profile: Option<FileProfileConfig>,
    /// Dedicated profile for image analysis
    pub vision_profile: Option<FileProfileConfig>,
    /// Dedicated profile for embeddings
    pub embedding_profile: Option<FileProfileConfig>,
    /// Retry and pacing settings
    pub gateway: FileGatewayConfig,
    /// Dataset logging settings
    pub logging: FileLoggingConfig,
    /// Prompt settings
    pub prompting: FilePromptingConfig,
}

/// Configuration converted into the types the orchestrator is built from.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub profile: ProviderProfile,
    pub code_profile: Option<ProviderProfile>,
    pub vision_profile: Option<ProviderProfile>,
    pub embedding_profile: Option<ProviderProfile>,
    pub gateway: GatewayParams,
    pub orchestrator: OrchestratorParams,
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    fn profiles(&self) -> impl Iterator<Item = (&'static str, &FileProfileConfig)> {
        [
            ("profile", Some(&self.profile)),
            ("code_profile", self.code_profile.as_ref()),
            ("vision_profile", self.vision_profile.as_ref()),
            ("embedding_profile", self.embedding_profile.as_ref()),
        ]
        .into_iter()
        .filter_map(|(section, profile)| profile.map(|p| (section, p)))
    }

    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        for (section, profile) in self.profiles() {
            issues.extend(profile.validate(section));
        }
        issues.extend(self.gateway.validate());
        issues.extend(self.prompting.validate());
        issues
    }

    pub fn has_errors(issues: &[ConfigIssue]) -> bool {
        issues.iter().any(ConfigIssue::is_error)
    }

    /// Convert into runtime types. Fails on the first invalid profile or
    /// template.
    pub fn resolve(&self) -> Result<ResolvedConfig, ConfigError> {
        let resolve_profile = |section: &'static str, profile: &FileProfileConfig| {
            profile
                .to_profile()
                .map_err(|source| ConfigError::Profile { section, source })
        };
        let optional = |section: &'static str, profile: &Option<FileProfileConfig>| {
            profile
                .as_ref()
                .map(|p| resolve_profile(section, p))
                .transpose()
        };

        Ok(ResolvedConfig {
            profile: resolve_profile("profile", &self.profile)?,
            code_profile: optional("code_profile", &self.code_profile)?,
            vision_profile: optional("vision_profile", &self.vision_profile)?,
            embedding_profile: optional("embedding_profile", &self.embedding_profile)?,
            gateway: self.gateway.to_params(),
            orchestrator: self
                .prompting
                .to_params(self.gateway.max_generation_retries)
                .map_err(ConfigError::Template)?,
            logging: self.logging.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindgate_domain::ProviderKind;
    use std::time::Duration;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[profile]
kind = "groq"
model = "llama-3.3-70b-versatile"

[vision_profile]
kind = "ollama"
model = "llava"

[gateway]
cooldown_ms = 2000

[logging]
root = "/tmp/andy-logs"
log_normal_data = true
log_vision_data = true

[prompting]
agent_name = "bob"
max_examples = 4
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert!(config.validate().is_empty());

        let resolved = config.resolve().unwrap();
        assert_eq!(resolved.profile.kind(), ProviderKind::Groq);
        assert_eq!(
            resolved.vision_profile.as_ref().map(|p| p.kind()),
            Some(ProviderKind::Ollama)
        );
        assert!(resolved.code_profile.is_none());
        assert_eq!(resolved.gateway.cooldown, Duration::from_millis(2000));
        assert_eq!(resolved.orchestrator.agent_name, "bob");
        assert_eq!(resolved.orchestrator.max_examples, 4);
        let flags = resolved.logging.flags();
        assert!(flags.normal && flags.vision && !flags.reasoning);
    }

    #[test]
    fn test_default_config() {
        let config = FileConfig::default();
        assert!(config.validate().is_empty());
        assert_eq!(config.profile.kind, "openai");
        assert!(!config.logging.any_enabled());
        assert_eq!(config.gateway.max_attempts, 5);
    }

    #[test]
    fn test_invalid_override_profile_fails_resolve() {
        let config: FileConfig = toml::from_str(
            r#"
[code_profile]
kind = "nope"
model = "x"
"#,
        )
        .unwrap();

        let issues = config.validate();
        assert!(FileConfig::has_errors(&issues));
        assert!(matches!(
            config.resolve(),
            Err(ConfigError::Profile {
                section: "code_profile",
                ..
            })
        ));
    }
}
