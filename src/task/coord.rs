//! Box coordinate values as they appear in task files.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// One box coordinate.
///
/// Integers and floats are kept apart so a task file written by another
/// tool round-trips unchanged and renders the way it was written (`10`
/// stays `10`, `10.0` stays `10.0`). The annotation parser always
/// produces [`Coord::Float`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Coord {
    Int(i64),
    Float(f64),
}

impl Coord {
    /// Returns the coordinate as a float.
    pub fn as_f64(self) -> f64 {
        match self {
            Coord::Int(v) => v as f64,
            Coord::Float(v) => v,
        }
    }

    /// Reads a coordinate from any JSON value.
    ///
    /// Numbers are taken as-is and numeric strings are coerced. Anything
    /// else, `null` included, counts as absent.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => match n.as_i64() {
                Some(v) => Some(Coord::Int(v)),
                None => n.as_f64().map(Coord::Float),
            },
            Value::String(s) => {
                let s = s.trim();
                if let Ok(v) = s.parse::<i64>() {
                    return Some(Coord::Int(v));
                }
                s.parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .map(Coord::Float)
            }
            _ => None,
        }
    }
}

impl From<f64> for Coord {
    fn from(value: f64) -> Self {
        Coord::Float(value)
    }
}

impl From<i64> for Coord {
    fn from(value: i64) -> Self {
        Coord::Int(value)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coord::Int(v) => write!(f, "{}", v),
            Coord::Float(v) => f.write_str(&float_text(*v)),
        }
    }
}

/// Shortest round-trip float text with a fractional part (`10.0`, `0.5`).
///
/// Exponent form kicks in below 1e-4 and from 1e16 up, and is written with
/// a sign and at least two digits (`1e+16`, `2.5e-05`).
fn float_text(value: f64) -> String {
    let text = format!("{:?}", value);
    match text.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => text,
    }
}
