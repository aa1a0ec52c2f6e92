//! Configuration errors

use mindgate_domain::DomainError;
use thiserror::Error;

/// Errors raised while loading or resolving configuration. All of them stop
/// startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("Invalid [{section}]: {source}")]
    Profile {
        section: &'static str,
        #[source]
        source: DomainError,
    },

    #[error("Invalid [prompting.templates]: {0}")]
    Template(#[source] DomainError),
}
