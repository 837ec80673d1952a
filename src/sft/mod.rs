//! Detection tasks → QA-style SFT records.
//!
//! Each task whose image exists and which has at least one complete
//! detection becomes one [`SftRecord`]: a human question listing the
//! distinct labels, and an assistant answer giving every box. Everything
//! else is recorded as a [`SkipEntry`] and the batch carries on.

pub mod io_json;
pub mod report;
mod template;

pub use report::{FormatReport, SkipEntry, SkipReason, SKIP_PREVIEW_LIMIT};
pub use template::{render_answer, render_question, CLAUSE_SEPARATOR};

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::category::CategoryMapping;
use crate::error::SftError;
use crate::task::io_json::read_tasks_json;
use crate::task::{Coord, DetectionTask};

/// Who speaks a conversation turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    Human,
    Gpt,
}

/// One turn of a conversation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub from: Speaker,
    pub value: String,
}

impl Turn {
    pub fn new(from: Speaker, value: impl Into<String>) -> Self {
        Self {
            from,
            value: value.into(),
        }
    }
}

/// A training example: an image plus a question/answer pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SftRecord {
    pub image_path: String,
    pub conversation: Vec<Turn>,
}

/// A detection that passed validation, with its label resolved through the
/// category mapping.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedDetection {
    pub bbox: [Coord; 4],
    pub label: String,
    pub category_id: i64,
}

/// Result of formatting a batch of tasks.
#[derive(Clone, Debug)]
pub struct FormatOutcome {
    pub records: Vec<SftRecord>,
    pub skipped: Vec<SkipEntry>,
    /// The input mapping plus any labels added for unseen ids.
    pub mapping: CategoryMapping,
    pub total_tasks: usize,
}

/// Format tasks, checking images on disk.
pub fn format_tasks(
    tasks: &[DetectionTask],
    images_dir: &Path,
    mapping: CategoryMapping,
) -> FormatOutcome {
    format_tasks_with(tasks, images_dir, mapping, |path| path.exists())
}

/// Format tasks with a caller-supplied image existence check.
///
/// Tasks are processed strictly in input order, and unseen category ids
/// are added to `mapping` with the first label seen for them.
pub fn format_tasks_with<F>(
    tasks: &[DetectionTask],
    images_dir: &Path,
    mut mapping: CategoryMapping,
    image_exists: F,
) -> FormatOutcome
where
    F: Fn(&Path) -> bool,
{
    let mut records = Vec::new();
    let mut skipped = Vec::new();

    for (task_idx, task) in tasks.iter().enumerate() {
        let Some(image_file) = task.image_file.as_deref() else {
            skipped.push(SkipEntry::unnamed_task(task_idx, task.detections.len()));
            continue;
        };

        let image_path = images_dir.join(image_file);
        if !image_exists(&image_path) {
            skipped.push(SkipEntry::task(
                image_file,
                SkipReason::ImageMissing,
                task.detections.len(),
            ));
            continue;
        }

        let valid = resolve_detections(image_file, task, &mut mapping, &mut skipped);
        if valid.is_empty() {
            skipped.push(SkipEntry::task(
                image_file,
                SkipReason::NoValidDetections,
                task.detections.len(),
            ));
            continue;
        }

        records.push(build_record(image_path.to_string_lossy().into_owned(), &valid));
    }

    log::debug!(
        "Formatted {} of {} task(s), {} skipped item(s)",
        records.len(),
        tasks.len(),
        skipped.len()
    );

    FormatOutcome {
        records,
        skipped,
        mapping,
        total_tasks: tasks.len(),
    }
}

/// Validate a task's detections and resolve their labels.
fn resolve_detections(
    image_file: &str,
    task: &DetectionTask,
    mapping: &mut CategoryMapping,
    skipped: &mut Vec<SkipEntry>,
) -> Vec<ResolvedDetection> {
    let mut valid = Vec::with_capacity(task.detections.len());

    for (idx, det) in task.detections.iter().enumerate() {
        let Some(bbox) = det.coords() else {
            skipped.push(SkipEntry::detection(
                image_file,
                idx,
                det.category_id,
                &det.label,
            ));
            continue;
        };

        let label = mapping.resolve(det.category_id, &det.label).to_string();

        valid.push(ResolvedDetection {
            bbox,
            label,
            category_id: det.category_id,
        });
    }

    valid
}

/// Build the question/answer record for one image.
pub fn build_record(image_path: String, detections: &[ResolvedDetection]) -> SftRecord {
    let mut labels: Vec<&str> = Vec::new();
    for det in detections {
        if !labels.contains(&det.label.as_str()) {
            labels.push(&det.label);
        }
    }

    SftRecord {
        image_path,
        conversation: vec![
            Turn::new(Speaker::Human, render_question(&labels)),
            Turn::new(Speaker::Gpt, render_answer(detections)),
        ],
    }
}

/// Read `detection_tasks.json`, format it and write the SFT dataset.
///
/// Per-task problems end up in the returned report; only I/O and JSON
/// errors on the input or output files are fatal.
pub fn convert_detection_tasks(
    tasks_json: &Path,
    output_path: &Path,
    images_dir: &Path,
    mapping: CategoryMapping,
) -> Result<FormatReport, SftError> {
    let tasks = read_tasks_json(tasks_json)?;
    log::info!(
        "Loaded {} detection task(s) from {}",
        tasks.len(),
        tasks_json.display()
    );

    let outcome = format_tasks(&tasks, images_dir, mapping);
    io_json::write_sft_json(output_path, &outcome.records)?;
    log::info!(
        "Wrote {} SFT record(s) to {}",
        outcome.records.len(),
        output_path.display()
    );

    Ok(FormatReport {
        total_tasks: outcome.total_tasks,
        processed: outcome.records.len(),
        skipped: outcome.skipped,
        output_path: output_path.to_path_buf(),
        mapping: outcome.mapping,
    })
}
