//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod inference_gateway;
pub mod prompt_orchestrator;

#[cfg(test)]
pub(crate) mod test_support;
