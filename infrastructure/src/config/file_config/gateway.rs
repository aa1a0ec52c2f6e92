//! Gateway configuration from TOML (`[gateway]` section)

use crate::config::issue::{ConfigIssue, ConfigIssueCode};
use mindgate_application::GatewayParams;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw retry and pacing settings
///
/// # Example
///
/// ```toml
/// [gateway]
/// cooldown_ms = 2000          # minimum spacing between calls, 0 disables
/// max_attempts = 5            # regeneration bound for unterminated reasoning
/// embed_max_retries = 5
/// embed_base_delay_ms = 1000
/// max_generation_retries = 3  # empty or cross-agent replies
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGatewayConfig {
    pub cooldown_ms: u64,
    pub max_attempts: u32,
    pub embed_max_retries: u32,
    pub embed_base_delay_ms: u64,
    pub max_generation_retries: u32,
}

impl Default for FileGatewayConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: 0,
            max_attempts: 5,
            embed_max_retries: 5,
            embed_base_delay_ms: 1000,
            max_generation_retries: 3,
        }
    }
}

impl FileGatewayConfig {
    pub fn validate(&self) -> Vec<ConfigIssue> {
        [
            ("gateway.max_attempts", self.max_attempts),
            ("gateway.embed_max_retries", self.embed_max_retries),
            ("gateway.max_generation_retries", self.max_generation_retries),
        ]
        .into_iter()
        .filter(|(_, value)| *value == 0)
        .map(|(field, _)| {
            ConfigIssue::warning(
                ConfigIssueCode::ZeroValue {
                    field: field.to_string(),
                },
                format!("{} is 0, using 1 instead", field),
            )
        })
        .collect()
    }

    pub fn to_params(&self) -> GatewayParams {
        GatewayParams::default()
            .with_cooldown(Duration::from_millis(self.cooldown_ms))
            .with_max_attempts(self.max_attempts)
            .with_embed_max_retries(self.embed_max_retries)
            .with_embed_base_delay(Duration::from_millis(self.embed_base_delay_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_params() {
        let params = FileGatewayConfig::default().to_params();
        assert_eq!(params.cooldown, Duration::ZERO);
        assert_eq!(params.max_attempts, 5);
        assert_eq!(params.embed_base_delay, Duration::from_millis(1000));
    }

    #[test]
    fn test_zero_attempts_warns() {
        let config = FileGatewayConfig {
            max_attempts: 0,
            ..Default::default()
        };
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert!(!issues[0].is_error());
        assert_eq!(config.to_params().max_attempts, 1);
    }
}
