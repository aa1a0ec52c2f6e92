//! Provider kind value object
//!
//! Every backend kind is described by a static [`ProviderSpec`]: its wire
//! dialect, default endpoint, credential variable and capability flags. Adding
//! a backend means adding a variant and a spec row, not new control flow.

use crate::core::error::DomainError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Wire format family spoken by a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireDialect {
    /// `POST {base}/chat/completions` and `POST {base}/embeddings`
    OpenAiChat,
    /// `POST {base}/messages` with a top-level `system` field
    AnthropicMessages,
    /// `POST {base}/api/chat` and `POST {base}/api/embeddings`
    OllamaChat,
}

/// Optional capabilities a backend may offer besides text completion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Capabilities {
    pub supports_vision: bool,
    pub supports_embedding: bool,
}

impl Capabilities {
    pub const fn new(supports_vision: bool, supports_embedding: bool) -> Self {
        Self {
            supports_vision,
            supports_embedding,
        }
    }
}

/// Static description of a backend kind
#[derive(Debug, Clone, Copy)]
pub struct ProviderSpec {
    pub dialect: WireDialect,
    pub default_base_url: &'static str,
    /// Environment variable holding the credential; `None` for keyless local servers.
    pub api_key_env: Option<&'static str>,
    pub capabilities: Capabilities,
}

/// Supported backend kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProviderKind {
    OpenAi,
    Anthropic,
    Gemini,
    Ollama,
    DeepSeek,
    Groq,
    Mistral,
    OpenRouter,
    Qwen,
    Xai,
    Vllm,
    Cerebras,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 12] = [
        ProviderKind::OpenAi,
        ProviderKind::Anthropic,
        ProviderKind::Gemini,
        ProviderKind::Ollama,
        ProviderKind::DeepSeek,
        ProviderKind::Groq,
        ProviderKind::Mistral,
        ProviderKind::OpenRouter,
        ProviderKind::Qwen,
        ProviderKind::Xai,
        ProviderKind::Vllm,
        ProviderKind::Cerebras,
    ];

    /// Get the string identifier for this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Gemini => "gemini",
            ProviderKind::Ollama => "ollama",
            ProviderKind::DeepSeek => "deepseek",
            ProviderKind::Groq => "groq",
            ProviderKind::Mistral => "mistral",
            ProviderKind::OpenRouter => "openrouter",
            ProviderKind::Qwen => "qwen",
            ProviderKind::Xai => "xai",
            ProviderKind::Vllm => "vllm",
            ProviderKind::Cerebras => "cerebras",
        }
    }

    pub fn spec(&self) -> ProviderSpec {
        use WireDialect::*;
        let (dialect, default_base_url, api_key_env, capabilities) = match self {
            ProviderKind::OpenAi => (
                OpenAiChat,
                "https://api.openai.com/v1",
                Some("OPENAI_API_KEY"),
                Capabilities::new(true, true),
            ),
            ProviderKind::Anthropic => (
                AnthropicMessages,
                "https://api.anthropic.com/v1",
                Some("ANTHROPIC_API_KEY"),
                Capabilities::new(true, false),
            ),
            ProviderKind::Gemini => (
                OpenAiChat,
                "https://generativelanguage.googleapis.com/v1beta/openai",
                Some("GEMINI_API_KEY"),
                Capabilities::new(true, true),
            ),
            ProviderKind::Ollama => (
                OllamaChat,
                "http://127.0.0.1:11434",
                None,
                Capabilities::new(true, true),
            ),
            ProviderKind::DeepSeek => (
                OpenAiChat,
                "https://api.deepseek.com/v1",
                Some("DEEPSEEK_API_KEY"),
                Capabilities::new(false, false),
            ),
            ProviderKind::Groq => (
                OpenAiChat,
                "https://api.groq.com/openai/v1",
                Some("GROQ_API_KEY"),
                Capabilities::new(true, false),
            ),
            ProviderKind::Mistral => (
                OpenAiChat,
                "https://api.mistral.ai/v1",
                Some("MISTRAL_API_KEY"),
                Capabilities::new(true, true),
            ),
            ProviderKind::OpenRouter => (
                OpenAiChat,
                "https://openrouter.ai/api/v1",
                Some("OPENROUTER_API_KEY"),
                Capabilities::new(true, false),
            ),
            ProviderKind::Qwen => (
                OpenAiChat,
                "https://dashscope-intl.aliyuncs.com/compatible-mode/v1",
                Some("QWEN_API_KEY"),
                Capabilities::new(true, true),
            ),
            ProviderKind::Xai => (
                OpenAiChat,
                "https://api.x.ai/v1",
                Some("XAI_API_KEY"),
                Capabilities::new(true, false),
            ),
            ProviderKind::Vllm => (
                OpenAiChat,
                "http://127.0.0.1:8000/v1",
                None,
                Capabilities::new(false, false),
            ),
            ProviderKind::Cerebras => (
                OpenAiChat,
                "https://api.cerebras.ai/v1",
                Some("CEREBRAS_API_KEY"),
                Capabilities::new(false, false),
            ),
        };
        ProviderSpec {
            dialect,
            default_base_url,
            api_key_env,
            capabilities,
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        ProviderKind::ALL
            .iter()
            .find(|k| k.as_str() == normalized)
            .copied()
            .ok_or_else(|| DomainError::UnknownProviderKind(s.to_string()))
    }
}

impl Serialize for ProviderKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ProviderKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_all_kinds() {
        for kind in ProviderKind::ALL {
            let parsed: ProviderKind = kind.as_str().parse().unwrap();
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("OpenAI".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAi);
        assert_eq!(" ollama ".parse::<ProviderKind>().unwrap(), ProviderKind::Ollama);
    }

    #[test]
    fn test_unknown_kind_is_error() {
        let err = "palm".parse::<ProviderKind>().unwrap_err();
        assert_eq!(err, DomainError::UnknownProviderKind("palm".to_string()));
    }

    #[test]
    fn test_local_servers_need_no_key() {
        assert!(ProviderKind::Ollama.spec().api_key_env.is_none());
        assert!(ProviderKind::Vllm.spec().api_key_env.is_none());
        assert_eq!(
            ProviderKind::Anthropic.spec().dialect,
            WireDialect::AnthropicMessages
        );
    }
}
