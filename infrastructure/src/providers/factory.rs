//! Adapter construction with fail-fast credential resolution.

use super::http_adapter::HttpProviderAdapter;
use mindgate_application::ports::provider_adapter::ProviderAdapter;
use mindgate_domain::{ErrorKind, ProviderKind, ProviderProfile};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Errors raised while building an adapter. All of them are fatal: the
/// orchestrator must not start.
#[derive(Error, Debug)]
pub enum AdapterBuildError {
    #[error("{provider} requires an API key: set {env} or provide api_key in the profile")]
    MissingCredential { provider: ProviderKind, env: String },

    #[error("Model identifier must not be empty for {0}")]
    EmptyModel(ProviderKind),

    #[error("Failed to build HTTP client for {provider}: {message}")]
    Client {
        provider: ProviderKind,
        message: String,
    },
}

impl AdapterBuildError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Fatal
    }
}

/// Builds provider adapters from profiles.
pub struct AdapterFactory;

impl AdapterFactory {
    /// Build an adapter, reading credentials from the process environment.
    pub fn build(profile: &ProviderProfile) -> Result<Arc<dyn ProviderAdapter>, AdapterBuildError> {
        Self::build_with_env(profile, |var| std::env::var(var).ok())
    }

    /// Build an adapter, reading credentials through `lookup`.
    ///
    /// An inline `api_key` wins over the environment variable. Blank values
    /// count as missing.
    pub fn build_with_env(
        profile: &ProviderProfile,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Arc<dyn ProviderAdapter>, AdapterBuildError> {
        if profile.model_id().trim().is_empty() {
            return Err(AdapterBuildError::EmptyModel(profile.kind()));
        }

        let api_key = profile
            .api_key()
            .map(str::to_string)
            .or_else(|| profile.api_key_env().and_then(&lookup))
            .filter(|k| !k.trim().is_empty());

        if profile.requires_api_key() && api_key.is_none() {
            return Err(AdapterBuildError::MissingCredential {
                provider: profile.kind(),
                env: profile.api_key_env().unwrap_or("api_key").to_string(),
            });
        }

        let adapter = HttpProviderAdapter::new(profile.clone(), api_key).map_err(|e| {
            AdapterBuildError::Client {
                provider: profile.kind(),
                message: e.message,
            }
        })?;

        info!(
            provider = %profile.kind(),
            model = profile.model_id(),
            base_url = profile.base_url(),
            "Provider adapter ready"
        );
        Ok(Arc::new(adapter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_missing_key_fails_fast() {
        let profile = ProviderProfile::new(ProviderKind::OpenAi, "gpt-4o-mini").unwrap();
        let err = AdapterFactory::build_with_env(&profile, no_env).err().unwrap();
        assert!(matches!(
            err,
            AdapterBuildError::MissingCredential { ref env, .. } if env == "OPENAI_API_KEY"
        ));
        assert_eq!(err.kind(), ErrorKind::Fatal);
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        let profile = ProviderProfile::new(ProviderKind::Groq, "llama").unwrap();
        let result = AdapterFactory::build_with_env(&profile, |_| Some("  ".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_key_from_environment() {
        let profile = ProviderProfile::new(ProviderKind::Anthropic, "claude").unwrap();
        let adapter = AdapterFactory::build_with_env(&profile, |var| {
            (var == "ANTHROPIC_API_KEY").then(|| "ak".to_string())
        })
        .unwrap();
        assert_eq!(adapter.kind(), ProviderKind::Anthropic);
        assert_eq!(adapter.model_id(), "claude");
    }

    #[test]
    fn test_custom_env_var() {
        let profile = ProviderProfile::new(ProviderKind::OpenAi, "gpt")
            .unwrap()
            .with_api_key_env("MY_KEY");
        let result = AdapterFactory::build_with_env(&profile, |var| {
            (var == "MY_KEY").then(|| "k".to_string())
        });
        assert!(result.is_ok());
    }

    #[test]
    fn test_inline_key_wins() {
        let profile = ProviderProfile::new(ProviderKind::Mistral, "mistral-small")
            .unwrap()
            .with_api_key("inline");
        assert!(AdapterFactory::build_with_env(&profile, no_env).is_ok());
    }

    #[test]
    fn test_local_backends_need_no_key() {
        for kind in [ProviderKind::Ollama, ProviderKind::Vllm] {
            let profile = ProviderProfile::new(kind, "local").unwrap();
            let adapter = AdapterFactory::build_with_env(&profile, no_env).unwrap();
            assert_eq!(adapter.capabilities(), kind.spec().capabilities);
        }
    }
}
