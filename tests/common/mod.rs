#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

/// Scratch layout for one end-to-end run.
pub struct Workspace {
    pub root: tempfile::TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        fs::create_dir_all(root.path().join("annotations")).expect("create annotations dir");
        fs::create_dir_all(root.path().join("images")).expect("create images dir");
        Self { root }
    }

    pub fn annotations_dir(&self) -> PathBuf {
        self.root.path().join("annotations")
    }

    pub fn images_dir(&self) -> PathBuf {
        self.root.path().join("images")
    }

    pub fn tasks_dir(&self) -> PathBuf {
        self.root.path().join("outputs/tasks")
    }

    pub fn sft_path(&self) -> PathBuf {
        self.root.path().join("outputs/sft/sft_detection_qa.json")
    }

    pub fn log_path(&self) -> PathBuf {
        self.root.path().join("logs/visdrone_parse_log.txt")
    }

    pub fn write_annotation(&self, name: &str, content: &str) {
        fs::write(self.annotations_dir().join(name), content).expect("write annotation file");
    }

    /// Image contents are never read, only checked for existence.
    pub fn touch_image(&self, name: &str) {
        touch(&self.images_dir().join(name));
    }
}

pub fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, b"\xFF\xD8\xFF").expect("write image placeholder");
}
