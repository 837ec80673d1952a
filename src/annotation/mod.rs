//! VisDrone text annotation reader.
//!
//! Each `.txt` file in the annotations directory describes one image, one
//! detection per line. Every parsed detection becomes its own
//! single-detection [`DetectionTask`]; tasks from the same file share the
//! image filename and image id.

mod line;

pub use line::{class_label, detection_for, parse_annotation_line, MIN_FIELDS};

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::SftError;
use crate::parse_log::{FileSummary, LineEntry, LineOutcome, ParseLog};
use crate::task::io_json::{write_tasks_json, DETECTION_TASKS_FILE};
use crate::task::{Detection, DetectionTask, ImageId};

const ANNOTATION_EXTENSION: &str = "txt";

/// Options for turning annotation files into detection tasks.
#[derive(Clone, Debug)]
pub struct ParseOptions {
    /// Extension given to the derived image filename (without the dot).
    pub image_extension: String,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            image_extension: "jpg".to_string(),
        }
    }
}

/// What [`generate_detection_tasks`] wrote.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerateSummary {
    pub output_path: PathBuf,
    pub files: usize,
    pub tasks: usize,
}

/// Parse the contents of one annotation file.
///
/// Every line is reported to `log`, followed by a file summary under the
/// name `source`. Bad lines are skipped, never fatal.
pub fn parse_annotation_str(
    content: &str,
    source: &Path,
    log: &mut dyn ParseLog,
) -> Vec<Detection> {
    let mut detections = Vec::new();
    let mut total_lines = 0;

    for (line_idx, raw) in content.lines().enumerate() {
        total_lines += 1;
        let outcome = parse_annotation_line(raw);
        if let LineOutcome::Parsed { category_id, bbox } = &outcome {
            detections.push(detection_for(*category_id, *bbox));
        }
        log.line(&LineEntry {
            line: line_idx + 1,
            outcome,
        });
    }

    log.file_summary(&FileSummary {
        path: source.to_path_buf(),
        total_lines,
        parsed: detections.len(),
    });

    detections
}

/// Read and parse one annotation file.
///
/// Bytes that are not valid UTF-8 are replaced with U+FFFD, so they only
/// spoil the line they sit on.
pub fn parse_annotation_file(
    path: &Path,
    log: &mut dyn ParseLog,
) -> Result<Vec<Detection>, SftError> {
    let bytes = fs::read(path).map_err(SftError::Io)?;
    let content = String::from_utf8_lossy(&bytes);
    Ok(parse_annotation_str(&content, path, log))
}

/// Build one single-detection task per parsed detection in `annotations_dir`.
///
/// Files are visited in file name order and image ids are assigned from 1
/// in that order, so the same directory always yields the same ids.
pub fn collect_detection_tasks(
    annotations_dir: &Path,
    opts: &ParseOptions,
    log: &mut dyn ParseLog,
) -> Result<Vec<DetectionTask>, SftError> {
    let files = list_annotation_files(annotations_dir)?;
    tasks_from_files(&files, opts, log)
}

fn tasks_from_files(
    files: &[PathBuf],
    opts: &ParseOptions,
    log: &mut dyn ParseLog,
) -> Result<Vec<DetectionTask>, SftError> {
    let mut tasks = Vec::new();
    for (index, path) in files.iter().enumerate() {
        let detections = parse_annotation_file(path, log)?;
        let image_id = ImageId::new(index as i64 + 1);
        let image_file = image_file_for(path, &opts.image_extension);

        log::debug!(
            "{}: {} detection(s) -> {}",
            path.display(),
            detections.len(),
            image_file
        );

        tasks.extend(
            detections
                .into_iter()
                .map(|det| DetectionTask::new(image_id, image_file.clone(), vec![det])),
        );
    }

    Ok(tasks)
}

/// Parse `annotations_dir` and write `detection_tasks.json` into `output_dir`.
///
/// `output_dir` is created if it does not exist.
pub fn generate_detection_tasks(
    annotations_dir: &Path,
    output_dir: &Path,
    opts: &ParseOptions,
    log: &mut dyn ParseLog,
) -> Result<GenerateSummary, SftError> {
    let files = list_annotation_files(annotations_dir)?;
    let tasks = tasks_from_files(&files, opts, log)?;

    fs::create_dir_all(output_dir).map_err(SftError::Io)?;
    let output_path = output_dir.join(DETECTION_TASKS_FILE);
    write_tasks_json(&output_path, &tasks)?;

    log::info!(
        "Detection tasks generated: {}, total records: {}",
        output_path.display(),
        tasks.len()
    );

    Ok(GenerateSummary {
        output_path,
        files: files.len(),
        tasks: tasks.len(),
    })
}

/// Image filename for an annotation file: same stem, image extension.
pub fn image_file_for(annotation_path: &Path, image_extension: &str) -> String {
    let file_name = annotation_path
        .file_name()
        .map(Path::new)
        .unwrap_or(annotation_path);
    file_name
        .with_extension(image_extension)
        .to_string_lossy()
        .into_owned()
}

/// Annotation files directly inside `dir`, sorted by file name.
fn list_annotation_files(dir: &Path) -> Result<Vec<PathBuf>, SftError> {
    if !dir.is_dir() {
        return Err(SftError::AnnotationsDirInvalid {
            path: dir.to_path_buf(),
            message: "input must be a directory".to_string(),
        });
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true) {
        let entry = entry.map_err(|source| SftError::AnnotationsDirInvalid {
            path: dir.to_path_buf(),
            message: format!("failed while traversing directory: {source}"),
        })?;

        if entry.file_type().is_file() && has_annotation_extension(entry.path()) {
            files.push(entry.path().to_path_buf());
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    log::info!(
        "Found {} annotation file(s) in {}",
        files.len(),
        dir.display()
    );
    Ok(files)
}

fn has_annotation_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(ANNOTATION_EXTENSION))
        .unwrap_or(false)
}
