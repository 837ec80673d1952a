//! Newtype IDs for detection tasks.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier shared by every task derived from the same annotation file.
///
/// Signed so that task files produced by other tools (which may store
/// arbitrary hash values) still deserialize.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageId(pub i64);

impl ImageId {
    /// Creates a new ImageId.
    #[inline]
    pub fn new(id: i64) -> Self {
        Self(id)
    }
}

impl From<i64> for ImageId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl fmt::Debug for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ImageId({})", self.0)
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
