//! Skip diagnostics and the end-of-run summary for SFT formatting.
//!
//! Nothing that goes wrong inside a single task aborts the run; it is
//! recorded as a [`SkipEntry`] and reported at the end.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

use crate::category::CategoryMapping;

/// How many skip entries the summary lists before truncating.
pub const SKIP_PREVIEW_LIMIT: usize = 10;

/// Why a task or detection was left out of the SFT output.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum SkipReason {
    #[serde(rename = "Image file name is missing")]
    ImageFileMissing,
    #[serde(rename = "Image file does not exist")]
    ImageMissing,
    #[serde(rename = "Coordinates contain None values")]
    NullCoordinates,
    #[serde(rename = "No valid detections")]
    NoValidDetections,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::ImageFileMissing => "Image file name is missing",
            SkipReason::ImageMissing => "Image file does not exist",
            SkipReason::NullCoordinates => "Coordinates contain None values",
            SkipReason::NoValidDetections => "No valid detections",
        }
    }

    /// Returns true if the whole task was dropped, not just one detection.
    pub fn skips_task(&self) -> bool {
        !matches!(self, SkipReason::NullCoordinates)
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One skipped task or detection.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SkipEntry {
    /// Empty when the task has no usable image file name.
    pub image_file: String,

    pub reason: SkipReason,

    /// Position of the task in the input, for tasks without a file name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_idx: Option<usize>,

    /// Index of the skipped detection within its task.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detection_idx: Option<usize>,

    /// Number of detections dropped along with the task.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detections_skipped: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl SkipEntry {
    /// A task dropped as a whole.
    pub fn task(image_file: impl Into<String>, reason: SkipReason, detections: usize) -> Self {
        Self {
            image_file: image_file.into(),
            reason,
            task_idx: None,
            detection_idx: None,
            detections_skipped: Some(detections),
            category_id: None,
            label: None,
        }
    }

    /// A task dropped because it names no image file.
    pub fn unnamed_task(task_idx: usize, detections: usize) -> Self {
        Self {
            task_idx: Some(task_idx),
            ..Self::task("", SkipReason::ImageFileMissing, detections)
        }
    }

    /// A single detection dropped from a task.
    pub fn detection(
        image_file: impl Into<String>,
        detection_idx: usize,
        category_id: i64,
        label: impl Into<String>,
    ) -> Self {
        Self {
            image_file: image_file.into(),
            reason: SkipReason::NullCoordinates,
            task_idx: None,
            detection_idx: Some(detection_idx),
            detections_skipped: None,
            category_id: Some(category_id),
            label: Some(label.into()),
        }
    }
}

impl fmt::Display for SkipEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.task_idx {
            Some(idx) if self.image_file.is_empty() => {
                write!(f, "<task #{}> | Reason: {}", idx, self.reason)
            }
            _ => write!(f, "{} | Reason: {}", self.image_file, self.reason),
        }
    }
}

/// Summary of a completed formatting run.
#[derive(Clone, Debug)]
pub struct FormatReport {
    /// Tasks read from the input.
    pub total_tasks: usize,
    /// Tasks that produced an SFT record.
    pub processed: usize,
    pub skipped: Vec<SkipEntry>,
    pub output_path: PathBuf,
    /// The mapping after the run, including labels added along the way.
    pub mapping: CategoryMapping,
}

impl FormatReport {
    /// Tasks that produced no record.
    pub fn skipped_tasks(&self) -> usize {
        self.skipped
            .iter()
            .filter(|entry| entry.reason.skips_task())
            .count()
    }
}

impl fmt::Display for FormatReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Processing Summary ===")?;
        writeln!(f, "Total tasks: {}", self.total_tasks)?;
        writeln!(f, "Successfully processed: {}", self.processed)?;
        writeln!(f, "Skipped tasks: {}", self.skipped_tasks())?;
        writeln!(f, "Skip entries: {}", self.skipped.len())?;

        if !self.skipped.is_empty() {
            writeln!(f)?;
            let shown = self.skipped.len().min(SKIP_PREVIEW_LIMIT);
            writeln!(f, "First {} skipped record(s):", shown)?;
            for entry in self.skipped.iter().take(SKIP_PREVIEW_LIMIT) {
                writeln!(f, "- {}", entry)?;
            }
        }

        writeln!(f)?;
        writeln!(f, "SFT data saved to: {}", self.output_path.display())?;
        writeln!(f, "Category ID to Name Mapping:")?;
        for (id, label) in self.mapping.iter() {
            writeln!(f, "  {}: {}", id, label)?;
        }

        Ok(())
    }
}
