//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`]: domain-level errors
//! - [`messages`]: fixed user-facing placeholder texts

pub mod error;
pub mod messages;
