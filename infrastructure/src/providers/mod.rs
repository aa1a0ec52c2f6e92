//! Provider adapters
//!
//! A single [`HttpProviderAdapter`] covers every [`ProviderKind`]: the kind
//! only selects a wire dialect, a default endpoint and the credential
//! variable. [`AdapterFactory`] resolves credentials and fails fast when a
//! required one is missing.
//!
//! [`ProviderKind`]: mindgate_domain::ProviderKind

mod factory;
mod http_adapter;
pub mod wire;

pub use factory::{AdapterBuildError, AdapterFactory};
pub use http_adapter::HttpProviderAdapter;
