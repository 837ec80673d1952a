//! JSON output for SFT records and skip lists.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use super::report::SkipEntry;
use super::SftRecord;
use crate::error::SftError;

/// Writes SFT records as a pretty-printed JSON array.
///
/// Parent directories are created as needed. Non-ASCII text is written
/// as-is.
pub fn write_sft_json(path: &Path, records: &[SftRecord]) -> Result<(), SftError> {
    write_pretty(path, records).map_err(|err| match err {
        WriteError::Io(e) => SftError::Io(e),
        WriteError::Json(source) => SftError::SftJsonWrite {
            path: path.to_path_buf(),
            source,
        },
    })
}

/// Reads SFT records back from a JSON file.
pub fn read_sft_json(path: &Path) -> Result<Vec<SftRecord>, SftError> {
    let file = File::open(path).map_err(SftError::Io)?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| SftError::SftJsonParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes the full skip list as a pretty-printed JSON array.
pub fn write_skipped_json(path: &Path, skipped: &[SkipEntry]) -> Result<(), SftError> {
    write_pretty(path, skipped).map_err(|err| match err {
        WriteError::Io(e) => SftError::Io(e),
        WriteError::Json(source) => SftError::SkippedJsonWrite {
            path: path.to_path_buf(),
            source,
        },
    })
}

/// Writes SFT records to a JSON string.
///
/// Useful for testing without file I/O.
pub fn to_json_string(records: &[SftRecord]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(records)
}

enum WriteError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

fn write_pretty<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), WriteError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(WriteError::Io)?;
    }

    let file = File::create(path).map_err(WriteError::Io)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value).map_err(WriteError::Json)?;
    writer.flush().map_err(WriteError::Io)
}
