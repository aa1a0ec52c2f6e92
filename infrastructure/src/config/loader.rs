//! Configuration file loader with multi-source merging

use super::error::ConfigError;
use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const PROJECT_FILES: [&str; 2] = ["mindgate.toml", ".mindgate.toml"];
const ENV_PREFIX: &str = "MINDGATE_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `MINDGATE_*` environment variables
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./mindgate.toml` or `./.mindgate.toml`
    /// 4. Global: `<config dir>/mindgate/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, ConfigError> {
        let mut figment = Self::files(config_path);
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));
        Self::extract(figment)
    }

    /// Defaults and files only, without the environment layer.
    pub fn files(config_path: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(&path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment
    }

    pub fn extract(figment: Figment) -> Result<FileConfig, ConfigError> {
        figment.extract().map_err(|e| ConfigError::Load(Box::new(e)))
    }

    /// Load only default configuration
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// `<config dir>/mindgate/config.toml`
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("mindgate").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Human-readable list of the sources in priority order.
    pub fn describe_sources(config_path: Option<&Path>) -> Vec<String> {
        let mark = |found: bool| if found { "[FOUND]" } else { "[     ]" };
        let mut lines = vec![format!("{} Environment: {}*", mark(true), ENV_PREFIX)];
        if let Some(path) = config_path {
            lines.push(format!("{} Explicit: {}", mark(path.exists()), path.display()));
        }
        match Self::project_config_path() {
            Some(path) => lines.push(format!("{} Project: {}", mark(true), path.display())),
            None => lines.push(format!(
                "{} Project: ./{} or ./{}",
                mark(false),
                PROJECT_FILES[0],
                PROJECT_FILES[1]
            )),
        }
        if let Some(path) = Self::global_config_path() {
            lines.push(format!("{} Global: {}", mark(path.exists()), path.display()));
        }
        lines.push(format!("{} Default: built-in defaults", mark(true)));
        lines
    }
}
