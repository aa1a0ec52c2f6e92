//! Infrastructure layer for mindgate
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the HTTP provider adapter, the CSV dataset
//! logger and exporter, and configuration file loading.

pub mod config;
pub mod dataset;
pub mod providers;

// Re-export commonly used types
pub use config::{
    ConfigError, ConfigIssue, ConfigLoader, FileConfig, FileLoggingConfig, ResolvedConfig,
    Severity,
};
pub use dataset::{
    CsvDatasetLogger, DatasetExporter, ExportError, ExportOptions, ExportReport, LoggerCounters,
};
pub use providers::{AdapterBuildError, AdapterFactory, HttpProviderAdapter};
