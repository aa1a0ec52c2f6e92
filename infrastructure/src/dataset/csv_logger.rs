//! CSV dataset logger with self-healing headers and an image sidecar.
//!
//! Layout under the logs root:
//!
//! ```text
//! <root>/normal_logs.csv      input,output
//! <root>/reasoning_logs.csv   input,output
//! <root>/vision_logs.csv      image_path,text
//! <root>/images/vision_<epoch millis>_<6 chars>.jpg
//! ```
//!
//! All writes of one logger instance are serialized by a mutex. Separate
//! processes must use separate roots.

use mindgate_application::ports::dataset_logger::DatasetLogger;
use mindgate_domain::dataset::codec::{count_data_rows, encode_row, starts_with_header};
use mindgate_domain::{
    DatasetLogFlags, IMAGE_DIR, LogCategory, ReasoningMarkers, RecordDecision, SkipReason,
    decide_text, decide_vision,
};
use rand::Rng;
use serde::Serialize;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info, warn};

/// Accepted text records between two summaries
pub const DEFAULT_TEXT_SUMMARY_EVERY: u64 = 20;
/// Accepted vision records between two summaries
pub const DEFAULT_VISION_SUMMARY_EVERY: u64 = 10;

const SUFFIX_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Counters of one logger instance.
///
/// Accepted counts start from the rows already on disk, so after a restart
/// they equal the data rows in each store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoggerCounters {
    pub normal: u64,
    pub reasoning: u64,
    pub vision: u64,
    pub skipped_disabled: u64,
    pub skipped_empty: u64,
    pub images_saved: u64,
    pub errors: u64,
}

impl LoggerCounters {
    pub fn accepted(&self, category: LogCategory) -> u64 {
        match category {
            LogCategory::Normal => self.normal,
            LogCategory::Reasoning => self.reasoning,
            LogCategory::Vision => self.vision,
        }
    }

    fn accept(&mut self, category: LogCategory) {
        match category {
            LogCategory::Normal => self.normal += 1,
            LogCategory::Reasoning => self.reasoning += 1,
            LogCategory::Vision => self.vision += 1,
        }
    }

    fn skip(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::Empty => self.skipped_empty += 1,
            SkipReason::Disabled => self.skipped_disabled += 1,
        }
    }

    pub fn text_total(&self) -> u64 {
        self.normal + self.reasoning
    }
}

impl std::fmt::Display for LoggerCounters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "normal={} reasoning={} vision={} skipped_disabled={} skipped_empty={} images_saved={} errors={}",
            self.normal,
            self.reasoning,
            self.vision,
            self.skipped_disabled,
            self.skipped_empty,
            self.images_saved,
            self.errors
        )
    }
}

/// [`DatasetLogger`] writing one CSV file per category.
pub struct CsvDatasetLogger {
    root: PathBuf,
    flags: DatasetLogFlags,
    markers: ReasoningMarkers,
    text_summary_every: u64,
    vision_summary_every: u64,
    counters: Mutex<LoggerCounters>,
}

impl CsvDatasetLogger {
    /// Open the stores under `root`, counting the rows already present.
    ///
    /// Missing files count as empty; nothing is created until the first
    /// accepted record.
    pub fn open(root: impl Into<PathBuf>, flags: DatasetLogFlags) -> Self {
        let root = root.into();
        let counters = Self::scan(&root);
        info!(root = %root.display(), %counters, "Dataset logger ready");
        Self {
            root,
            flags,
            markers: ReasoningMarkers::default(),
            text_summary_every: DEFAULT_TEXT_SUMMARY_EVERY,
            vision_summary_every: DEFAULT_VISION_SUMMARY_EVERY,
            counters: Mutex::new(counters),
        }
    }

    pub fn with_markers(mut self, markers: ReasoningMarkers) -> Self {
        self.markers = markers;
        self
    }

    /// Emit a summary every `text` accepted text rows and every `vision`
    /// accepted vision rows. Zero disables the summary.
    pub fn with_summary_intervals(mut self, text: u64, vision: u64) -> Self {
        self.text_summary_every = text;
        self.vision_summary_every = vision;
        self
    }

    /// Count the data rows of every store under `root`.
    pub fn scan(root: &Path) -> LoggerCounters {
        let mut counters = LoggerCounters::default();
        for category in LogCategory::ALL {
            let path = root.join(category.file_name());
            let rows = match fs::read_to_string(&path) {
                Ok(text) => count_data_rows(&text, &category.header()) as u64,
                Err(e) if e.kind() == io::ErrorKind::NotFound => 0,
                Err(e) => {
                    warn!("Could not read {}: {}", path.display(), e);
                    0
                }
            };
            match category {
                LogCategory::Normal => counters.normal = rows,
                LogCategory::Reasoning => counters.reasoning = rows,
                LogCategory::Vision => counters.vision = rows,
            }
        }
        counters
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn store_path(&self, category: LogCategory) -> PathBuf {
        self.root.join(category.file_name())
    }

    pub fn counters(&self) -> LoggerCounters {
        *self.lock()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LoggerCounters> {
        self.counters.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn append(&self, category: LogCategory, fields: &[&str]) -> io::Result<()> {
        fs::create_dir_all(&self.root)?;
        let path = self.store_path(category);
        ensure_header(&path, &category.header())?;
        let mut file = OpenOptions::new().append(true).open(&path)?;
        file.write_all(encode_row(fields).as_bytes())
    }

    fn save_image(&self, image: &[u8]) -> io::Result<String> {
        let dir = self.root.join(IMAGE_DIR);
        fs::create_dir_all(&dir)?;
        let name = format!(
            "vision_{}_{}.jpg",
            chrono::Utc::now().timestamp_millis(),
            random_suffix()
        );
        fs::write(dir.join(&name), image)?;
        Ok(format!("{}/{}", IMAGE_DIR, name))
    }

    fn maybe_summarize(&self, counters: &LoggerCounters, category: LogCategory) {
        let (count, every) = if category.is_text() {
            (counters.text_total(), self.text_summary_every)
        } else {
            (counters.vision, self.vision_summary_every)
        };
        if every > 0 && count > 0 && count % every == 0 {
            info!(%counters, "Dataset summary");
        }
    }
}

impl DatasetLogger for CsvDatasetLogger {
    /// The stored category is derived from `output`; `_category` is only the
    /// caller's expectation.
    fn record(&self, _category: LogCategory, input: &str, output: &str) {
        let mut counters = self.lock();
        match decide_text(&self.flags, &self.markers, input, output) {
            RecordDecision::Skip(reason) => {
                counters.skip(reason);
                debug!(?reason, "Dataset record skipped");
            }
            RecordDecision::Write(category) => match self.append(category, &[input, output]) {
                Ok(()) => {
                    counters.accept(category);
                    self.maybe_summarize(&counters, category);
                }
                Err(e) => {
                    counters.errors += 1;
                    warn!(%category, "Failed to write dataset row: {}", e);
                }
            },
        }
    }

    fn record_vision(&self, image: &[u8], transcript: &str) {
        let mut counters = self.lock();
        if let RecordDecision::Skip(reason) = decide_vision(&self.flags, transcript) {
            counters.skip(reason);
            debug!(?reason, "Vision record skipped");
            return;
        }

        let relative = match self.save_image(image) {
            Ok(relative) => relative,
            Err(e) => {
                counters.errors += 1;
                warn!("Failed to save vision image: {}", e);
                return;
            }
        };
        counters.images_saved += 1;

        match self.append(LogCategory::Vision, &[&relative, transcript]) {
            Ok(()) => {
                counters.accept(LogCategory::Vision);
                self.maybe_summarize(&counters, LogCategory::Vision);
            }
            Err(e) => {
                counters.errors += 1;
                warn!(image = %relative, "Failed to write vision row: {}", e);
            }
        }
    }
}

/// Make sure `path` starts with `header`.
///
/// Creates the file with the header, writes the header into an empty file, or
/// prepends it to a file holding rows without one. Also terminates a last row
/// missing its newline so the next append starts a fresh record.
fn ensure_header(path: &Path, header: &str) -> io::Result<()> {
    let prefix = match read_prefix(path, header.len() + 5) {
        Ok(prefix) => prefix,
        Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(e),
    };

    if prefix.is_empty() {
        return fs::write(path, format!("{}\n", header));
    }

    if !starts_with_header(&prefix, header) {
        let existing = fs::read_to_string(path)?;
        let existing = existing.strip_prefix('\u{feff}').unwrap_or(&existing);
        let mut healed = format!("{}\n{}", header, existing);
        if !healed.ends_with('\n') {
            healed.push('\n');
        }
        let tmp = path.with_extension("csv.tmp");
        fs::write(&tmp, healed)?;
        fs::rename(&tmp, path)?;
        warn!(path = %path.display(), "Dataset file had no header, prepended one");
        return Ok(());
    }

    if !ends_with_newline(path)? {
        OpenOptions::new().append(true).open(path)?.write_all(b"\n")?;
    }
    Ok(())
}

fn read_prefix(path: &Path, len: usize) -> io::Result<String> {
    let mut buf = Vec::with_capacity(len);
    File::open(path)?.take(len as u64).read_to_end(&mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn ends_with_newline(path: &Path) -> io::Result<bool> {
    let mut file = File::open(path)?;
    if file.metadata()?.len() == 0 {
        return Ok(true);
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

fn random_suffix() -> String {
    let mut rng = rand::rng();
    (0..6)
        .map(|_| SUFFIX_CHARS[rng.random_range(0..SUFFIX_CHARS.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindgate_domain::dataset::codec::parse_records;
    use mindgate_domain::messages;
    use regex::Regex;

    fn logger(dir: &Path) -> CsvDatasetLogger {
        CsvDatasetLogger::open(dir, DatasetLogFlags::all())
    }

    fn read(dir: &Path, category: LogCategory) -> String {
        fs::read_to_string(dir.join(category.file_name())).unwrap()
    }

    // ==================== Filtering ====================

    #[test]
    fn test_echo_is_skipped_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let logger = logger(dir.path());

        logger.record(LogCategory::Normal, "hello", "hello");

        assert_eq!(logger.counters().skipped_empty, 1);
        assert_eq!(logger.counters().normal, 0);
        assert!(!dir.path().join("normal_logs.csv").exists());
    }

    #[test]
    fn test_placeholder_output_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let logger = logger(dir.path());

        logger.record(LogCategory::Normal, "[]", messages::NETWORK_FAILURE);
        logger.record(LogCategory::Normal, "", "");

        assert_eq!(logger.counters().skipped_empty, 2);
    }

    #[test]
    fn test_disabled_category_is_counted() {
        let dir = tempfile::tempdir().unwrap();
        let flags = DatasetLogFlags {
            normal: true,
            ..DatasetLogFlags::default()
        };
        let logger = CsvDatasetLogger::open(dir.path(), flags);

        logger.record(LogCategory::Normal, "in", "<think>plan</think>out");
        logger.record_vision(&[1, 2], "a tree");

        let counters = logger.counters();
        assert_eq!(counters.skipped_disabled, 2);
        assert_eq!(counters.images_saved, 0);
        assert!(!dir.path().join(IMAGE_DIR).exists());
    }

    // ==================== Writing ====================

    #[test]
    fn test_first_write_creates_header() {
        let dir = tempfile::tempdir().unwrap();
        let logger = logger(dir.path());

        logger.record(LogCategory::Normal, "in", "out");

        assert_eq!(read(dir.path(), LogCategory::Normal), "input,output\n\"in\",\"out\"\n");
        assert_eq!(logger.counters().normal, 1);
    }

    #[test]
    fn test_reasoning_routed_by_output() {
        let dir = tempfile::tempdir().unwrap();
        let logger = logger(dir.path());

        logger.record(LogCategory::Normal, "in", "<think>plan</think>done");
        logger.record(LogCategory::Normal, "in", "<think>undefined</think>done");

        let counters = logger.counters();
        assert_eq!(counters.reasoning, 1);
        assert_eq!(counters.normal, 1);
        assert!(read(dir.path(), LogCategory::Reasoning).contains("<think>plan</think>done"));
    }

    #[test]
    fn test_empty_file_gets_header() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("normal_logs.csv"), "").unwrap();
        let logger = logger(dir.path());

        logger.record(LogCategory::Normal, "a", "b");

        assert_eq!(read(dir.path(), LogCategory::Normal), "input,output\n\"a\",\"b\"\n");
    }

    #[test]
    fn test_headerless_file_is_healed() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("normal_logs.csv"),
            "\"first\",\"1\"\n\"second\",\"2\"",
        )
        .unwrap();
        let logger = logger(dir.path());
        assert_eq!(logger.counters().normal, 2);

        logger.record(LogCategory::Normal, "third", "3");

        assert_eq!(
            read(dir.path(), LogCategory::Normal),
            "input,output\n\"first\",\"1\"\n\"second\",\"2\"\n\"third\",\"3\"\n"
        );
        assert_eq!(logger.counters().normal, 3);
        assert!(!dir.path().join("normal_logs.csv.tmp").exists());
    }

    #[test]
    fn test_quoted_header_record_counts_as_data() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("normal_logs.csv"),
            "\"input\",\"output\"\n\"a\",\"b\"\n",
        )
        .unwrap();
        let logger = logger(dir.path());
        assert_eq!(logger.counters().normal, 2);

        logger.record(LogCategory::Normal, "c", "d");

        assert_eq!(
            read(dir.path(), LogCategory::Normal),
            "input,output\n\"input\",\"output\"\n\"a\",\"b\"\n\"c\",\"d\"\n"
        );
        assert_eq!(logger.counters().normal, 3);
        assert_eq!(CsvDatasetLogger::scan(dir.path()).normal, 3);
    }

    #[test]
    fn test_missing_trailing_newline_is_terminated() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("normal_logs.csv"), "input,output\n\"a\",\"b\"").unwrap();
        let logger = logger(dir.path());

        logger.record(LogCategory::Normal, "c", "d");

        let records = parse_records(&read(dir.path(), LogCategory::Normal));
        assert_eq!(records.len(), 3);
        assert_eq!(records[2], vec!["c", "d"]);
    }

    #[test]
    fn test_round_trip_through_csv_parser() {
        let dir = tempfile::tempdir().unwrap();
        let logger = logger(dir.path());
        let input = r#"[{"role":"user","content":"say "hi", then go"}]"#;
        let output = "line one\nline \"two\", done";

        logger.record(LogCategory::Normal, input, output);

        let records = parse_records(&read(dir.path(), LogCategory::Normal));
        assert_eq!(records[1], vec![input.to_string(), output.to_string()]);
    }

    #[test]
    fn test_rows_decode_with_csv_crate() {
        let dir = tempfile::tempdir().unwrap();
        let logger = logger(dir.path());
        let input = r#"[{"role":"user","content":"say "hi", then go"}]"#;
        let output = "line one\nline \"two\", done";

        logger.record(LogCategory::Normal, input, output);

        let text = read(dir.path(), LogCategory::Normal);
        let mut reader = csv::Reader::from_reader(text.as_bytes());
        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers, vec!["input", "output"]);
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], input);
        assert_eq!(&rows[0][1], output);
    }

    // ==================== Vision ====================

    #[test]
    fn test_vision_writes_image_and_row() {
        let dir = tempfile::tempdir().unwrap();
        let logger = logger(dir.path());

        logger.record_vision(&[0xff, 0xd8, 0xff], "a red cube");

        let text = read(dir.path(), LogCategory::Vision);
        let pattern = Regex::new(
            r#"^image_path,text\n"(images/vision_\d+_[a-z0-9]{6}\.jpg)","a red cube"\n$"#,
        )
        .unwrap();
        let captures = pattern.captures(&text).unwrap();
        let image = dir.path().join(&captures[1]);
        assert_eq!(fs::read(image).unwrap(), vec![0xff, 0xd8, 0xff]);

        let counters = logger.counters();
        assert_eq!(counters.vision, 1);
        assert_eq!(counters.images_saved, 1);
    }

    #[test]
    fn test_image_failure_is_an_error_not_a_skip() {
        let dir = tempfile::tempdir().unwrap();
        // A file where the image directory should be.
        fs::write(dir.path().join(IMAGE_DIR), b"not a dir").unwrap();
        let logger = logger(dir.path());

        logger.record_vision(&[1], "a red cube");

        let counters = logger.counters();
        assert_eq!(counters.errors, 1);
        assert_eq!(counters.skipped_empty, 0);
        assert_eq!(counters.vision, 0);
        assert!(!dir.path().join("vision_logs.csv").exists());
    }

    #[test]
    fn test_empty_transcript_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let logger = logger(dir.path());

        logger.record_vision(&[1], "  ");

        assert_eq!(logger.counters().skipped_empty, 1);
    }

    // ==================== Restart ====================

    #[test]
    fn test_counters_survive_restart() {
        let dir = tempfile::tempdir().unwrap();
        {
            let logger = logger(dir.path());
            logger.record(LogCategory::Normal, "q1", "a1");
            logger.record(LogCategory::Normal, "q2", "multi\nline");
            logger.record(LogCategory::Normal, "q3", "<think>r</think>a3");
            logger.record_vision(&[1], "a tree");
            logger.record(LogCategory::Normal, "same", "same");
        }

        let restarted = logger(dir.path());
        let counters = restarted.counters();
        assert_eq!(counters.normal, 2);
        assert_eq!(counters.reasoning, 1);
        assert_eq!(counters.vision, 1);
        assert_eq!(counters.skipped_empty, 0);
        assert_eq!(CsvDatasetLogger::scan(dir.path()), counters);
    }

    #[test]
    fn test_random_suffix_shape() {
        let suffix = random_suffix();
        assert_eq!(suffix.len(), 6);
        assert!(suffix.bytes().all(|b| SUFFIX_CHARS.contains(&b)));
    }
}
