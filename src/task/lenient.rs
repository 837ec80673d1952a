//! Forgiving readers for task file fields.
//!
//! One malformed field must not make the whole task file unreadable. Each
//! reader takes any JSON value and falls back to a default when the value
//! has the wrong shape; the formatter then skips whatever is unusable.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::coord::Coord;
use super::ids::ImageId;
use super::model::{TaskType, UNKNOWN_CATEGORY_ID, UNKNOWN_LABEL};

/// Converts each element on its own; elements of the wrong shape become
/// `T::default()`.
pub(super) fn from_values<T>(values: Vec<Value>) -> Vec<T>
where
    T: DeserializeOwned + Default,
{
    values
        .into_iter()
        .enumerate()
        .map(|(idx, value)| {
            serde_json::from_value(value).unwrap_or_else(|err| {
                log::debug!("Element {} has the wrong shape: {}", idx, err);
                T::default()
            })
        })
        .collect()
}

pub(super) fn items<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(values) => from_values(values),
        _ => Vec::new(),
    })
}

pub(super) fn coord<'de, D>(deserializer: D) -> Result<Option<Coord>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Coord::from_json(&Value::deserialize(deserializer)?))
}

pub(super) fn label<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => UNKNOWN_LABEL.to_string(),
    })
}

pub(super) fn category_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let id = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|v| v.fract() == 0.0 && v.abs() < i64::MAX as f64)
                .map(|v| v as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    Ok(id.unwrap_or(UNKNOWN_CATEGORY_ID))
}

pub(super) fn image_file<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) if !s.trim().is_empty() => Some(s),
        _ => None,
    })
}

pub(super) fn image_id<'de, D>(deserializer: D) -> Result<Option<ImageId>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Value::deserialize(deserializer)?
        .as_i64()
        .map(ImageId::new))
}

/// Detection is the only task type; whatever the file says is ignored.
pub(super) fn task_type<'de, D>(deserializer: D) -> Result<TaskType, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer)?;
    Ok(TaskType::Detection)
}
