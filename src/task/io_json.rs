//! JSON serialization for `detection_tasks.json`.
//!
//! The file is a plain JSON array of [`DetectionTask`] records. It is
//! written pretty-printed (2-space indent) with non-ASCII text left as-is.
//! On read, only a file that is not a JSON array is an error; each element
//! is converted on its own and malformed fields fall back to defaults.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde_json::Value;

use super::lenient;
use super::model::DetectionTask;
use crate::error::SftError;

/// File name of the intermediate task list inside the output directory.
pub const DETECTION_TASKS_FILE: &str = "detection_tasks.json";

/// Reads detection tasks from a JSON file.
///
/// # Errors
/// Returns an error if the file cannot be read or is not a JSON array.
pub fn read_tasks_json(path: &Path) -> Result<Vec<DetectionTask>, SftError> {
    let file = File::open(path).map_err(SftError::Io)?;
    let reader = BufReader::new(file);

    let values: Vec<Value> =
        serde_json::from_reader(reader).map_err(|source| SftError::TasksJsonParse {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(lenient::from_values(values))
}

/// Writes detection tasks to a JSON file, creating parent directories.
///
/// # Errors
/// Returns an error if the file cannot be written.
pub fn write_tasks_json(path: &Path, tasks: &[DetectionTask]) -> Result<(), SftError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(SftError::Io)?;
    }

    let file = File::create(path).map_err(SftError::Io)?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, tasks).map_err(|source| {
        SftError::TasksJsonWrite {
            path: path.to_path_buf(),
            source,
        }
    })?;
    writer.flush().map_err(SftError::Io)
}

/// Reads detection tasks from a JSON string.
///
/// Useful for testing without file I/O.
pub fn from_json_str(json: &str) -> Result<Vec<DetectionTask>, serde_json::Error> {
    let values: Vec<Value> = serde_json::from_str(json)?;
    Ok(lenient::from_values(values))
}

/// Writes detection tasks to a JSON string.
///
/// Useful for testing without file I/O.
pub fn to_json_string(tasks: &[DetectionTask]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(tasks)
}

/// Fuzz-only entrypoint for task list parsing.
#[cfg(feature = "fuzzing")]
pub fn fuzz_parse_tasks_json(input: &str) -> Result<(), serde_json::Error> {
    let _ = from_json_str(input)?;
    Ok(())
}
