//! Gateway parameters: retry, repair and pacing control.
//!
//! [`GatewayParams`] groups the static parameters consumed by
//! [`InferenceGateway`](crate::use_cases::inference_gateway::InferenceGateway).

use mindgate_domain::ReasoningMarkers;
use std::time::Duration;

/// Retry/repair loop control parameters.
#[derive(Debug, Clone)]
pub struct GatewayParams {
    /// Minimum spacing between outbound calls. Zero disables the throttle.
    pub cooldown: Duration,
    /// Attempts allowed before a malformed output falls back to the apology.
    pub max_attempts: u32,
    /// Attempts for a rate-limited embedding call.
    pub embed_max_retries: u32,
    /// Base delay of the embedding backoff (`base * 2^attempt + jitter`).
    pub embed_base_delay: Duration,
    /// Reasoning delimiters used for repair and stripping.
    pub markers: ReasoningMarkers,
}

impl Default for GatewayParams {
    fn default() -> Self {
        Self {
            cooldown: Duration::ZERO,
            max_attempts: 5,
            embed_max_retries: 5,
            embed_base_delay: Duration::from_millis(1000),
            markers: ReasoningMarkers::default(),
        }
    }
}

impl GatewayParams {
    // ==================== Builder Methods ====================

    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn with_max_attempts(mut self, max: u32) -> Self {
        self.max_attempts = max.max(1);
        self
    }

    pub fn with_embed_max_retries(mut self, max: u32) -> Self {
        self.embed_max_retries = max.max(1);
        self
    }

    pub fn with_embed_base_delay(mut self, delay: Duration) -> Self {
        self.embed_base_delay = delay;
        self
    }

    pub fn with_markers(mut self, markers: ReasoningMarkers) -> Self {
        self.markers = markers;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = GatewayParams::default();
        assert_eq!(params.cooldown, Duration::ZERO);
        assert_eq!(params.max_attempts, 5);
        assert_eq!(params.embed_max_retries, 5);
        assert_eq!(params.embed_base_delay, Duration::from_secs(1));
        assert_eq!(params.markers.open, "<think>");
    }

    #[test]
    fn test_builder_clamps_attempts() {
        let params = GatewayParams::default()
            .with_cooldown(Duration::from_millis(2000))
            .with_max_attempts(0)
            .with_embed_max_retries(0);
        assert_eq!(params.cooldown, Duration::from_secs(2));
        assert_eq!(params.max_attempts, 1);
        assert_eq!(params.embed_max_retries, 1);
    }
}
