//! Inference Gateway use case.
//!
//! Wraps one [`ProviderAdapter`] with the retry/repair policy:
//!
//! | Outcome | Generation / vision | Embedding |
//! |---------|---------------------|-----------|
//! | `ContextOverflow` | drop oldest non-system turn, resubmit; at one turn return the overflow text | error |
//! | `RateLimited` | placeholder, no retry | backoff `base * 2^attempt + jitter`, bounded |
//! | open marker without close | log attempt, regenerate up to `max_attempts`, then apology | n/a |
//! | close marker without open | prepend open marker | n/a |
//! | anything else | fixed placeholder | error |
//!
//! Every outbound attempt passes through the shared [`CadenceThrottle`].
//! Generation and vision never return an error; only embedding does.

use crate::config::GatewayParams;
use crate::pacing::{CadenceThrottle, StalenessMark};
use crate::ports::dataset_logger::{DatasetLogger, NoDatasetLogger};
use crate::ports::provider_adapter::ProviderAdapter;
use mindgate_domain::dataset::filter::text_category;
use mindgate_domain::messages;
use mindgate_domain::util::preview;
use mindgate_domain::{
    BackendError, ConversationRequest, ErrorClassifier, ErrorKind, InferenceResult, LogCategory,
    MarkerState,
};
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors surfaced by the embedding path.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    #[error("{provider} does not support {capability}")]
    UnsupportedCapability {
        provider: String,
        capability: &'static str,
    },

    #[error("Gave up after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: BackendError },

    #[error("Backend error ({kind}): {message}")]
    Backend { kind: ErrorKind, message: String },
}

#[derive(Clone, Copy)]
enum Call<'a> {
    Completion,
    Vision(&'a [u8]),
}

/// Retry/repair policy around one provider adapter.
#[derive(Clone)]
pub struct InferenceGateway {
    adapter: Arc<dyn ProviderAdapter>,
    classifier: Arc<ErrorClassifier>,
    throttle: Arc<CadenceThrottle>,
    dataset_logger: Arc<dyn DatasetLogger>,
    params: GatewayParams,
}

impl InferenceGateway {
    pub fn new(adapter: Arc<dyn ProviderAdapter>, params: GatewayParams) -> Self {
        Self {
            adapter,
            classifier: Arc::new(ErrorClassifier::default()),
            throttle: Arc::new(CadenceThrottle::new(params.cooldown)),
            dataset_logger: Arc::new(NoDatasetLogger),
            params,
        }
    }

    pub fn with_classifier(mut self, classifier: Arc<ErrorClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    /// Share a throttle with other gateways of the same orchestrator.
    pub fn with_throttle(mut self, throttle: Arc<CadenceThrottle>) -> Self {
        self.throttle = throttle;
        self
    }

    pub fn with_dataset_logger(mut self, logger: Arc<dyn DatasetLogger>) -> Self {
        self.dataset_logger = logger;
        self
    }

    pub fn adapter(&self) -> &Arc<dyn ProviderAdapter> {
        &self.adapter
    }

    /// Text completion. Returns `None` only when `mark` went stale.
    pub async fn complete(
        &self,
        request: ConversationRequest,
        mark: &StalenessMark,
    ) -> Option<InferenceResult> {
        self.run(request, Call::Completion, mark).await
    }

    /// Completion with one attached image. Returns `None` only when `mark`
    /// went stale.
    pub async fn complete_vision(
        &self,
        request: ConversationRequest,
        image: &[u8],
        mark: &StalenessMark,
    ) -> Option<InferenceResult> {
        if !self.adapter.capabilities().supports_vision {
            info!(
                provider = %self.adapter.kind(),
                model = self.adapter.model_id(),
                "Vision requested from a backend without image input"
            );
            return Some(InferenceResult::failure(
                ErrorKind::UnsupportedCapability,
                messages::VISION_UNSUPPORTED,
            ));
        }
        self.run(request, Call::Vision(image), mark).await
    }

    async fn run(
        &self,
        mut request: ConversationRequest,
        call: Call<'_>,
        mark: &StalenessMark,
    ) -> Option<InferenceResult> {
        let markers = &self.params.markers;
        let provider = self.adapter.kind();
        let mut malformed = 0u32;

        loop {
            self.throttle.acquire().await;
            if mark.is_stale() {
                debug!("Newer message arrived before dispatch; dropping call");
                return None;
            }

            let outcome = match call {
                Call::Completion => self.adapter.send_completion(&request).await,
                Call::Vision(image) => self.adapter.send_vision(&request, image).await,
            };
            if mark.is_stale() {
                debug!("Newer message arrived during call; discarding result");
                return None;
            }

            let raw = match outcome {
                Ok(raw) => raw,
                Err(error) => {
                    let kind = self.classifier.classify(provider, &error);
                    warn!(
                        provider = %provider,
                        model = self.adapter.model_id(),
                        kind = %kind,
                        turns = request.len(),
                        "Backend call failed: {}",
                        error
                    );
                    if kind == ErrorKind::ContextOverflow {
                        if request.drop_oldest_turn().is_some() {
                            debug!(turns = request.len(), "Context overflow, retrying with fewer turns");
                            continue;
                        }
                        return Some(InferenceResult::failure(kind, error.message));
                    }
                    if kind == ErrorKind::UnsupportedCapability && matches!(call, Call::Vision(_)) {
                        return Some(InferenceResult::failure(kind, messages::VISION_UNSUPPORTED));
                    }
                    return Some(InferenceResult::placeholder(kind));
                }
            };

            let raw = match markers.inspect(&raw) {
                MarkerState::MissingOpen => markers.repair_missing_open(&raw),
                _ => raw,
            };

            let is_completion = matches!(call, Call::Completion);
            if is_completion {
                let input = request.transcript_json();
                self.dataset_logger
                    .record(text_category(markers, &raw), &input, &raw);
            }

            if markers.inspect(&raw) == MarkerState::MissingClose {
                malformed += 1;
                warn!(
                    attempt = malformed,
                    max_attempts = self.params.max_attempts,
                    "Unterminated reasoning in output: {}",
                    preview(&raw, 80)
                );
                if malformed >= self.params.max_attempts {
                    if is_completion {
                        self.dataset_logger.record(
                            LogCategory::Normal,
                            &request.transcript_json(),
                            messages::MALFORMED_FALLBACK,
                        );
                    }
                    return Some(InferenceResult::placeholder(
                        ErrorKind::MalformedPartialOutput,
                    ));
                }
                continue;
            }

            return Some(InferenceResult::success(markers.strip(&raw)));
        }
    }

    /// Embed `text`. Rate limits are retried with exponential backoff and
    /// jitter; every other failure is returned immediately.
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>, GatewayError> {
        let provider = self.adapter.kind();
        if !self.adapter.capabilities().supports_embedding {
            return Err(GatewayError::UnsupportedCapability {
                provider: provider.to_string(),
                capability: "embeddings",
            });
        }

        let max = self.params.embed_max_retries.max(1);
        let mut attempt = 0u32;
        loop {
            self.throttle.acquire().await;
            let error = match self.adapter.embed(text).await {
                Ok(vector) => return Ok(vector),
                Err(error) => error,
            };
            let kind = self.classifier.classify(provider, &error);
            attempt += 1;

            match kind {
                ErrorKind::RateLimited if attempt < max => {
                    let delay = self.backoff_delay(attempt - 1);
                    warn!(
                        provider = %provider,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "Embedding rate limited, backing off"
                    );
                    tokio::time::sleep(delay).await;
                }
                ErrorKind::RateLimited => {
                    return Err(GatewayError::RetriesExhausted {
                        attempts: attempt,
                        last: error,
                    });
                }
                ErrorKind::UnsupportedCapability => {
                    return Err(GatewayError::UnsupportedCapability {
                        provider: provider.to_string(),
                        capability: "embeddings",
                    });
                }
                kind => {
                    return Err(GatewayError::Backend {
                        kind,
                        message: error.to_string(),
                    });
                }
            }
        }
    }

    /// `base * 2^attempt` plus a uniform jitter in `[0, base]`.
    fn backoff_delay(&self, attempt: u32) -> Duration {
        let base = self.params.embed_base_delay;
        let exponential = base.saturating_mul(2u32.saturating_pow(attempt));
        let base_ms = base.as_millis() as u64;
        let jitter = if base_ms == 0 {
            0
        } else {
            rand::rng().random_range(0..=base_ms)
        };
        exponential + Duration::from_millis(jitter)
    }
}
