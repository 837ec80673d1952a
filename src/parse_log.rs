//! Per-line diagnostics for the annotation parser.
//!
//! The parser reports every line it reads, and a summary per file, to a
//! [`ParseLog`] sink handed in by the caller. Sinks never fail the parse:
//! [`FileParseLog`] degrades to a no-op after the first write error.

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::task::Coord;

/// Default location of the append-only parse log.
pub const DEFAULT_LOG_FILE: &str = "logs/visdrone_parse_log.txt";

/// What happened to a single annotation line.
#[derive(Clone, Debug, PartialEq)]
pub enum LineOutcome {
    /// The line was blank after trimming.
    Empty,
    /// Fewer than the required number of comma-separated fields.
    InsufficientFields { found: usize, content: String },
    /// A detection was produced.
    Parsed { category_id: i64, bbox: [f64; 4] },
    /// A required field did not parse.
    Failed { content: String, error: String },
}

/// A line outcome tagged with its 1-based line number.
#[derive(Clone, Debug, PartialEq)]
pub struct LineEntry {
    pub line: usize,
    pub outcome: LineOutcome,
}

impl fmt::Display for LineEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[Line {}] ", self.line)?;
        match &self.outcome {
            LineOutcome::Empty => write!(f, "Empty line, skipping"),
            LineOutcome::InsufficientFields { found, content } => write!(
                f,
                "Insufficient fields: only {} found. Content: {}",
                found, content
            ),
            LineOutcome::Parsed { category_id, bbox } => write!(
                f,
                "Parsed successfully -> category_id={}, box=[{},{},{},{}]",
                category_id,
                Coord::Float(bbox[0]),
                Coord::Float(bbox[1]),
                Coord::Float(bbox[2]),
                Coord::Float(bbox[3])
            ),
            LineOutcome::Failed { content, error } => {
                write!(f, "Parsing failed: {}, Error: {}", content, error)
            }
        }
    }
}

/// Line counts for one annotation file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileSummary {
    pub path: PathBuf,
    pub total_lines: usize,
    pub parsed: usize,
}

impl FileSummary {
    /// Lines that did not produce a detection (blank lines included).
    pub fn failed(&self) -> usize {
        self.total_lines - self.parsed
    }
}

impl fmt::Display for FileSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[Summary] File {}: Total lines={}, Successfully parsed={}, Failed={}",
            self.path.display(),
            self.total_lines,
            self.parsed,
            self.failed()
        )
    }
}

/// A sink for parser diagnostics.
pub trait ParseLog {
    /// Record the outcome of one line.
    fn line(&mut self, entry: &LineEntry);

    /// Record the end-of-file summary.
    fn file_summary(&mut self, summary: &FileSummary);
}

/// Collects rendered log entries in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryParseLog {
    pub entries: Vec<String>,
}

impl MemoryParseLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ParseLog for MemoryParseLog {
    fn line(&mut self, entry: &LineEntry) {
        self.entries.push(entry.to_string());
    }

    fn file_summary(&mut self, summary: &FileSummary) {
        self.entries.push(summary.to_string());
    }
}

/// Appends log entries to a text file.
///
/// The file (and its parent directory) is opened lazily on the first entry.
/// If that fails, or any later write fails, a single warning goes to the
/// `log` facade and the sink stops writing.
#[derive(Debug)]
pub struct FileParseLog {
    path: PathBuf,
    state: FileState,
}

#[derive(Debug)]
enum FileState {
    Unopened,
    Open(File),
    Disabled,
}

impl FileParseLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: FileState::Unopened,
        }
    }

    /// Returns false once the sink has given up on its file.
    pub fn is_active(&self) -> bool {
        !matches!(self.state, FileState::Disabled)
    }

    fn open(path: &Path) -> std::io::Result<File> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        OpenOptions::new().create(true).append(true).open(path)
    }

    fn write_text(&mut self, text: &str) {
        if let FileState::Unopened = self.state {
            self.state = match Self::open(&self.path) {
                Ok(file) => FileState::Open(file),
                Err(e) => {
                    log::warn!(
                        "Cannot open parse log {}: {}; continuing without it",
                        self.path.display(),
                        e
                    );
                    FileState::Disabled
                }
            };
        }

        if let FileState::Open(file) = &mut self.state {
            if let Err(e) = file.write_all(text.as_bytes()) {
                log::warn!(
                    "Cannot write parse log {}: {}; continuing without it",
                    self.path.display(),
                    e
                );
                self.state = FileState::Disabled;
            }
        }
    }
}

impl ParseLog for FileParseLog {
    fn line(&mut self, entry: &LineEntry) {
        self.write_text(&format!("{}\n", entry));
    }

    fn file_summary(&mut self, summary: &FileSummary) {
        self.write_text(&format!("{}\n\n", summary));
    }
}
