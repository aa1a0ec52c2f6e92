//! Dataset persistence: the CSV logger and the JSONL exporter.

mod csv_logger;
mod exporter;

pub use csv_logger::{
    CsvDatasetLogger, DEFAULT_TEXT_SUMMARY_EVERY, DEFAULT_VISION_SUMMARY_EVERY, LoggerCounters,
};
pub use exporter::{DatasetExporter, ExportError, ExportOptions, ExportReport};
