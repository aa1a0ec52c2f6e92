//! Provider domain: backend kinds, capability flags and profiles.

pub mod kind;
pub mod profile;

pub use kind::{Capabilities, ProviderKind, ProviderSpec, WireDialect};
pub use profile::ProviderProfile;
