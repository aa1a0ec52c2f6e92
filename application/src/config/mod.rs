//! Application-level configuration.
//!
//! - [`GatewayParams`]: retry, repair and pacing control
//! - [`OrchestratorParams`]: prompt building and generation retries

pub mod gateway_params;
pub mod orchestrator_params;

pub use gateway_params::GatewayParams;
pub use orchestrator_params::{CROSS_AGENT_TAG, OrchestratorParams};
