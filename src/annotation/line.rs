//! Single-line parsing for VisDrone-style annotation rows.
//!
//! A row is `x1,y1,x2,y2,<score>,category_id[,...]`. Only the first four
//! fields and the sixth are read; everything else is ignored.

use crate::parse_log::LineOutcome;
use crate::task::Detection;

/// Minimum number of comma-separated fields on a usable row.
pub const MIN_FIELDS: usize = 6;

const CATEGORY_FIELD: usize = 5;
const COORD_NAMES: [&str; 4] = ["x1", "y1", "x2", "y2"];

/// Classify one raw annotation line.
pub fn parse_annotation_line(line: &str) -> LineOutcome {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return LineOutcome::Empty;
    }

    let fields: Vec<&str> = trimmed.split(',').collect();
    if fields.len() < MIN_FIELDS {
        return LineOutcome::InsufficientFields {
            found: fields.len(),
            content: trimmed.to_string(),
        };
    }

    match parse_fields(&fields) {
        Ok((bbox, category_id)) => LineOutcome::Parsed { category_id, bbox },
        Err(error) => LineOutcome::Failed {
            content: trimmed.to_string(),
            error,
        },
    }
}

/// Build the detection for a successfully parsed line.
pub fn detection_for(category_id: i64, bbox: [f64; 4]) -> Detection {
    Detection::new(
        bbox[0],
        bbox[1],
        bbox[2],
        bbox[3],
        category_id,
        class_label(category_id),
    )
}

/// Placeholder label used before any category names are known.
pub fn class_label(category_id: i64) -> String {
    format!("class_{}", category_id)
}

fn parse_fields(fields: &[&str]) -> Result<([f64; 4], i64), String> {
    let mut bbox = [0.0; 4];
    for (slot, (raw, name)) in bbox.iter_mut().zip(fields.iter().zip(COORD_NAMES)) {
        *slot = parse_coord(raw, name)?;
    }

    let raw = fields[CATEGORY_FIELD].trim();
    let category_id = raw
        .parse::<i64>()
        .map_err(|_| format!("invalid category_id '{raw}'; expected integer"))?;

    Ok((bbox, category_id))
}

fn parse_coord(raw: &str, name: &str) -> Result<f64, String> {
    let raw = raw.trim();
    let value = raw
        .parse::<f64>()
        .map_err(|_| format!("invalid {name} '{raw}'; expected floating-point number"))?;

    // JSON has no representation for NaN or infinity.
    if !value.is_finite() {
        return Err(format!("invalid {name} '{raw}'; expected finite number"));
    }
    Ok(value)
}
