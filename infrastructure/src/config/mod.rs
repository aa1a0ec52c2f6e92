//! Configuration file loading for mindgate
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment: `MINDGATE_` prefix, `__` separating nested keys
//!    (`MINDGATE_GATEWAY__COOLDOWN_MS=2000`)
//! 2. `--config <path>` specified file
//! 3. Project root: `./mindgate.toml` or `./.mindgate.toml`
//! 4. Global: `$XDG_CONFIG_HOME/mindgate/config.toml` (or the platform equivalent)
//! 5. Default values

mod error;
mod file_config;
mod issue;
mod loader;

pub use error::ConfigError;
pub use file_config::{
    FileConfig, FileGatewayConfig, FileLoggingConfig, FileProfileConfig, FilePromptingConfig,
    ResolvedConfig,
};
pub use issue::{ConfigIssue, ConfigIssueCode, Severity};
pub use loader::ConfigLoader;
