//! Intermediate detection task representation.
//!
//! The annotation parser writes a list of [`DetectionTask`] records to
//! `detection_tasks.json`, and the SFT formatter reads them back. Every
//! task names one image and carries the detections attached to it.
//!
//! # Example
//!
//! ```
//! use visdrone_sft::task::{Coord, Detection, DetectionTask};
//!
//! let task = DetectionTask::new(
//!     1i64,
//!     "img1.jpg",
//!     vec![Detection::new(10.0, 20.0, 30.0, 40.0, 3, "class_3")],
//! );
//! let coords = task.detections[0].coords().expect("all coordinates set");
//! assert_eq!(coords[0], Coord::Float(10.0));
//! assert_eq!(coords[0].to_string(), "10.0");
//! ```

mod coord;
mod ids;
pub mod io_json;
mod lenient;
mod model;

pub use coord::Coord;
pub use ids::ImageId;
pub use model::{Detection, DetectionTask, TaskType, UNKNOWN_CATEGORY_ID, UNKNOWN_LABEL};
