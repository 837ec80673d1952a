//! Detection task model shared by the parser and the SFT formatter.
//!
//! The parser always produces fully-populated detections. Task files can
//! also come from elsewhere, so every field is read leniently: a missing or
//! malformed value falls back to a default instead of failing the file.
//! Whether a task or detection is usable is decided by the formatter.

use serde::{Deserialize, Serialize};

use super::coord::Coord;
use super::ids::ImageId;
use super::lenient;

/// Label used when a detection carries no label of its own.
pub const UNKNOWN_LABEL: &str = "unknown";

/// Category id used when a detection carries no category of its own.
pub const UNKNOWN_CATEGORY_ID: i64 = -1;

/// One bounding box annotation for one object instance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    #[serde(default, deserialize_with = "lenient::coord")]
    pub x1: Option<Coord>,
    #[serde(default, deserialize_with = "lenient::coord")]
    pub y1: Option<Coord>,
    #[serde(default, deserialize_with = "lenient::coord")]
    pub x2: Option<Coord>,
    #[serde(default, deserialize_with = "lenient::coord")]
    pub y2: Option<Coord>,

    /// Label assigned at parse time (`class_<id>` for VisDrone input).
    #[serde(default = "default_label", deserialize_with = "lenient::label")]
    pub label: String,

    /// Numeric category identifier.
    #[serde(
        default = "default_category_id",
        deserialize_with = "lenient::category_id"
    )]
    pub category_id: i64,
}

fn default_label() -> String {
    UNKNOWN_LABEL.to_string()
}

fn default_category_id() -> i64 {
    UNKNOWN_CATEGORY_ID
}

impl Default for Detection {
    fn default() -> Self {
        Self {
            x1: None,
            y1: None,
            x2: None,
            y2: None,
            label: default_label(),
            category_id: default_category_id(),
        }
    }
}

impl Detection {
    /// Creates a detection with all four coordinates present.
    pub fn new(
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        category_id: i64,
        label: impl Into<String>,
    ) -> Self {
        Self {
            x1: Some(x1.into()),
            y1: Some(y1.into()),
            x2: Some(x2.into()),
            y2: Some(y2.into()),
            label: label.into(),
            category_id,
        }
    }

    /// Returns `[x1, y1, x2, y2]` if every coordinate is present.
    pub fn coords(&self) -> Option<[Coord; 4]> {
        Some([self.x1?, self.y1?, self.x2?, self.y2?])
    }
}

/// The kind of task a record describes. Only detection exists today.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    #[default]
    Detection,
}

/// One or more detections attached to a single image.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionTask {
    /// Identifier shared by all tasks of the same image.
    #[serde(default, deserialize_with = "lenient::image_id")]
    pub image_id: Option<ImageId>,

    /// Image filename, relative to the images directory. `None` when the
    /// task file has no usable name.
    #[serde(
        default,
        deserialize_with = "lenient::image_file",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_file: Option<String>,

    #[serde(default, deserialize_with = "lenient::task_type")]
    pub task_type: TaskType,

    #[serde(default, deserialize_with = "lenient::items")]
    pub detections: Vec<Detection>,
}

impl DetectionTask {
    /// Creates a detection task for an image.
    pub fn new(
        image_id: impl Into<ImageId>,
        image_file: impl Into<String>,
        detections: Vec<Detection>,
    ) -> Self {
        Self {
            image_id: Some(image_id.into()),
            image_file: Some(image_file.into()),
            task_type: TaskType::Detection,
            detections,
        }
    }
}
