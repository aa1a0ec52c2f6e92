//! Converts the CSV stores into ShareGPT-style JSONL training files.

use mindgate_domain::dataset::codec::{parse_records, starts_with_header};
use mindgate_domain::dataset::export::{
    DEFAULT_NONCODING_RATIO, build_conversation, dedupe, noncoding_quota, partition_coding,
};
use mindgate_domain::{Conversation, LogCategory, ReasoningMarkers, VisionExample};
use rand::seq::SliceRandom;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("Failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("No dataset stores found under {0}")]
    NoInput(PathBuf),

    #[error("Failed to encode example: {0}")]
    Encode(#[from] serde_json::Error),
}

/// What to export and where.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub output: PathBuf,
    /// Export vision rows instead of text conversations
    pub vision: bool,
    /// Keep coding conversations plus a sample of the others
    pub code_only: bool,
    pub noncoding_ratio: f64,
}

impl ExportOptions {
    pub fn new(output: impl Into<PathBuf>) -> Self {
        Self {
            output: output.into(),
            vision: false,
            code_only: false,
            noncoding_ratio: DEFAULT_NONCODING_RATIO,
        }
    }

    pub fn vision(mut self) -> Self {
        self.vision = true;
        self
    }

    pub fn code_only(mut self) -> Self {
        self.code_only = true;
        self
    }
}

/// Outcome of one export run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExportReport {
    pub rows_read: usize,
    pub rejected: usize,
    pub duplicates: usize,
    pub written: usize,
}

pub struct DatasetExporter {
    root: PathBuf,
    markers: ReasoningMarkers,
}

impl DatasetExporter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            markers: ReasoningMarkers::default(),
        }
    }

    pub fn with_markers(mut self, markers: ReasoningMarkers) -> Self {
        self.markers = markers;
        self
    }

    pub fn export(&self, options: &ExportOptions) -> Result<ExportReport, ExportError> {
        let report = if options.vision {
            let (examples, mut report) = self.vision_examples()?;
            report.written = examples.len();
            write_jsonl(&options.output, &examples)?;
            report
        } else {
            let (conversations, mut report) = self.conversations()?;
            let conversations = if options.code_only {
                sample_coding(conversations, options.noncoding_ratio)
            } else {
                conversations
            };
            report.written = conversations.len();
            write_jsonl(&options.output, &conversations)?;
            report
        };

        info!(
            output = %options.output.display(),
            rows = report.rows_read,
            rejected = report.rejected,
            duplicates = report.duplicates,
            written = report.written,
            "Export finished"
        );
        Ok(report)
    }

    /// Deduplicated conversations from the normal and reasoning stores.
    pub fn conversations(&self) -> Result<(Vec<Conversation>, ExportReport), ExportError> {
        let mut report = ExportReport::default();
        let mut conversations = Vec::new();
        let mut found = false;

        for category in [LogCategory::Normal, LogCategory::Reasoning] {
            let Some(rows) = self.read_rows(category)? else {
                continue;
            };
            found = true;
            for row in rows {
                report.rows_read += 1;
                match build_conversation(&self.markers, &row[0], &row[1]) {
                    Some(conversation) => conversations.push(conversation),
                    None => report.rejected += 1,
                }
            }
        }
        if !found {
            return Err(ExportError::NoInput(self.root.clone()));
        }

        let before = conversations.len();
        let conversations = dedupe(conversations);
        report.duplicates = before - conversations.len();
        Ok((conversations, report))
    }

    /// Vision rows whose image is still on disk.
    pub fn vision_examples(&self) -> Result<(Vec<VisionExample>, ExportReport), ExportError> {
        let rows = self
            .read_rows(LogCategory::Vision)?
            .ok_or_else(|| ExportError::NoInput(self.root.clone()))?;
        let mut report = ExportReport::default();
        let mut examples = Vec::new();
        for row in rows {
            report.rows_read += 1;
            match VisionExample::from_row(&row[0], &row[1]) {
                Some(example) if self.root.join(&example.image_path).is_file() => {
                    examples.push(example)
                }
                Some(example) => {
                    debug!(image = %example.image_path, "Skipping vision row with missing image");
                    report.rejected += 1;
                }
                None => report.rejected += 1,
            }
        }
        Ok((examples, report))
    }

    /// Data rows of one store with at least two fields, or `None` if the
    /// store does not exist.
    fn read_rows(&self, category: LogCategory) -> Result<Option<Vec<Vec<String>>>, ExportError> {
        let path = self.root.join(category.file_name());
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(ExportError::Read { path, source }),
        };

        let mut records = parse_records(&text);
        if starts_with_header(&text, &category.header()) && !records.is_empty() {
            records.remove(0);
        }
        let total = records.len();
        let rows: Vec<Vec<String>> = records.into_iter().filter(|r| r.len() >= 2).collect();
        if rows.len() < total {
            warn!(
                store = category.file_name(),
                dropped = total - rows.len(),
                "Ignoring rows with missing fields"
            );
        }
        Ok(Some(rows))
    }
}

/// Keep every coding conversation plus a random share of the rest.
fn sample_coding(conversations: Vec<Conversation>, ratio: f64) -> Vec<Conversation> {
    let (mut coding, mut other) = partition_coding(conversations);
    let quota = noncoding_quota(coding.len(), other.len(), ratio);
    other.shuffle(&mut rand::rng());
    other.truncate(quota);
    debug!(coding = coding.len(), sampled = other.len(), "Code-only sampling");
    coding.append(&mut other);
    coding
}

fn write_jsonl<T: Serialize>(path: &Path, items: &[T]) -> Result<(), ExportError> {
    let write_err = |source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    let mut writer = BufWriter::new(File::create(path).map_err(write_err)?);
    for item in items {
        let line = serde_json::to_string(item)?;
        writeln!(writer, "{}", line).map_err(write_err)?;
    }
    writer.flush().map_err(write_err)
}
