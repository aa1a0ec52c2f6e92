//! Dataset logging configuration from TOML (`[logging]` section)

use crate::dataset::{DEFAULT_TEXT_SUMMARY_EVERY, DEFAULT_VISION_SUMMARY_EVERY};
use mindgate_domain::DatasetLogFlags;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw dataset logging settings
///
/// # Example
///
/// ```toml
/// [logging]
/// root = "./logs"
/// log_normal_data = true
/// log_reasoning_data = true
/// log_vision_data = false
/// text_summary_every = 20
/// vision_summary_every = 10
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    pub root: PathBuf,
    pub log_normal_data: bool,
    pub log_reasoning_data: bool,
    pub log_vision_data: bool,
    pub text_summary_every: u64,
    pub vision_summary_every: u64,
}

impl Default for FileLoggingConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("./logs"),
            log_normal_data: false,
            log_reasoning_data: false,
            log_vision_data: false,
            text_summary_every: DEFAULT_TEXT_SUMMARY_EVERY,
            vision_summary_every: DEFAULT_VISION_SUMMARY_EVERY,
        }
    }
}

impl FileLoggingConfig {
    pub fn flags(&self) -> DatasetLogFlags {
        DatasetLogFlags {
            normal: self.log_normal_data,
            reasoning: self.log_reasoning_data,
            vision: self.log_vision_data,
        }
    }

    /// Whether any category is enabled.
    pub fn any_enabled(&self) -> bool {
        self.log_normal_data || self.log_reasoning_data || self.log_vision_data
    }
}
