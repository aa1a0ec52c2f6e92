//! Application layer for mindgate
//!
//! This crate contains the inference gateway, the prompt orchestrator, the
//! pacing primitives they share, and the ports infrastructure adapters
//! implement. It depends only on the domain layer.

pub mod config;
pub mod pacing;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{CROSS_AGENT_TAG, GatewayParams, OrchestratorParams};
pub use pacing::{CadenceThrottle, MessageClock, StalenessMark};
pub use ports::{
    dataset_logger::{DatasetLogger, NoDatasetLogger},
    provider_adapter::ProviderAdapter,
};
pub use use_cases::inference_gateway::{GatewayError, InferenceGateway};
pub use use_cases::prompt_orchestrator::PromptOrchestrator;
