//! Category id → display label mapping.
//!
//! The formatter grows the mapping as it meets new category ids: an id
//! with no entry yet takes the first label seen for it. The mapping is
//! passed to the formatter by value and handed back in its outcome.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SftError;

/// VisDrone2019-DET category names, indexed by category id.
pub const VISDRONE_CATEGORIES: [&str; 12] = [
    "pedestrian",
    "person",
    "bicycle",
    "car",
    "van",
    "truck",
    "tricycle",
    "awning_tricycle",
    "bus",
    "motorcycle",
    "others",
    "ignored",
];

/// Ordered mapping from category id to label.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryMapping(BTreeMap<i64, String>);

impl CategoryMapping {
    /// An empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// The 12-entry VisDrone2019-DET table.
    pub fn visdrone() -> Self {
        VISDRONE_CATEGORIES
            .iter()
            .enumerate()
            .map(|(id, name)| (id as i64, name.to_string()))
            .collect()
    }

    /// Returns the label for `category_id`, inserting `fallback` first if the
    /// id has no entry yet.
    pub fn resolve(&mut self, category_id: i64, fallback: &str) -> &str {
        self.0
            .entry(category_id)
            .or_insert_with(|| fallback.to_string())
    }

    pub fn get(&self, category_id: i64) -> Option<&str> {
        self.0.get(&category_id).map(String::as_str)
    }

    /// Inserts or replaces a label, returning the previous one.
    pub fn insert(&mut self, category_id: i64, label: impl Into<String>) -> Option<String> {
        self.0.insert(category_id, label.into())
    }

    /// Overlay `other` on top of this mapping; entries in `other` win.
    pub fn extend_from(&mut self, other: CategoryMapping) {
        self.0.extend(other.0);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, &str)> {
        self.0.iter().map(|(id, label)| (*id, label.as_str()))
    }
}

impl FromIterator<(i64, String)> for CategoryMapping {
    fn from_iter<I: IntoIterator<Item = (i64, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Starting table for a formatting run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum CategoryPreset {
    /// VisDrone2019-DET names.
    #[default]
    Visdrone,
    /// No names; every id keeps its parsed `class_<id>` label.
    None,
}

impl CategoryPreset {
    pub fn mapping(self) -> CategoryMapping {
        match self {
            CategoryPreset::Visdrone => CategoryMapping::visdrone(),
            CategoryPreset::None => CategoryMapping::new(),
        }
    }
}

/// Read a mapping file.
///
/// `.json` files hold an object keyed by id strings (`{"3": "car"}`);
/// `.yaml`/`.yml` files hold a mapping with integer keys (`3: car`).
pub fn read_category_mapping(path: &Path) -> Result<CategoryMapping, SftError> {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("json") => {
            let data = fs::read_to_string(path).map_err(SftError::Io)?;
            serde_json::from_str(&data).map_err(|source| SftError::CategoryMapJsonParse {
                path: path.to_path_buf(),
                source,
            })
        }
        Some("yaml") | Some("yml") => {
            let data = fs::read_to_string(path).map_err(SftError::Io)?;
            serde_yaml::from_str(&data).map_err(|source| SftError::CategoryMapYamlParse {
                path: path.to_path_buf(),
                source,
            })
        }
        _ => Err(SftError::UnsupportedFormat(format!(
            "category mapping file '{}' (supported extensions: json, yaml, yml)",
            path.display()
        ))),
    }
}
