use std::path::PathBuf;
use thiserror::Error;

/// The main error type for visdrone-sft operations.
///
/// Only fatal conditions live here. Per-line and per-task problems are
/// recorded as diagnostics (parse log entries and skip entries) instead.
#[derive(Debug, Error)]
pub enum SftError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse detection tasks JSON from {path}: {source}")]
    TasksJsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write detection tasks JSON to {path}: {source}")]
    TasksJsonWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse SFT JSON from {path}: {source}")]
    SftJsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write SFT JSON to {path}: {source}")]
    SftJsonWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write skip list JSON to {path}: {source}")]
    SkippedJsonWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid annotations directory {path}: {message}")]
    AnnotationsDirInvalid { path: PathBuf, message: String },

    #[error("Failed to parse category mapping JSON from {path}: {source}")]
    CategoryMapJsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse category mapping YAML from {path}: {source}")]
    CategoryMapYamlParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}
