//! Dataset categories and their on-disk layout

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Directory (relative to the logs root) holding vision sidecar images
pub const IMAGE_DIR: &str = "images";

/// Category of a dataset record. Each category has its own store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogCategory {
    Normal,
    Reasoning,
    Vision,
}

impl LogCategory {
    pub const ALL: [LogCategory; 3] = [
        LogCategory::Normal,
        LogCategory::Reasoning,
        LogCategory::Vision,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogCategory::Normal => "normal",
            LogCategory::Reasoning => "reasoning",
            LogCategory::Vision => "vision",
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            LogCategory::Normal => "normal_logs.csv",
            LogCategory::Reasoning => "reasoning_logs.csv",
            LogCategory::Vision => "vision_logs.csv",
        }
    }

    pub fn header_fields(&self) -> [&'static str; 2] {
        match self {
            LogCategory::Normal | LogCategory::Reasoning => ["input", "output"],
            LogCategory::Vision => ["image_path", "text"],
        }
    }

    /// Header line, without the trailing newline.
    pub fn header(&self) -> String {
        self.header_fields().join(",")
    }

    pub fn is_text(&self) -> bool {
        !matches!(self, LogCategory::Vision)
    }
}

impl std::fmt::Display for LogCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for LogCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "normal" => Ok(LogCategory::Normal),
            "reasoning" => Ok(LogCategory::Reasoning),
            "vision" => Ok(LogCategory::Vision),
            other => Err(DomainError::UnknownCategory(other.to_string())),
        }
    }
}
