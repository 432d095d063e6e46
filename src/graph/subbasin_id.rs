//! Subbasin identifier type
//!
//! This module defines the SubbasinId type which uniquely identifies a
//! subbasin (and its reservoir) across every input table.
//!
//! # Design Decision
//!
//! The identifier is a newtype over the integer id used by the input files
//! rather than a bare `i64` because:
//! 1. It cannot be confused with volumes or discharges in function signatures
//! 2. It keeps the "no downstream" sentinel check in one place
//! 3. It renders consistently in logs and error messages

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a subbasin within a drainage network
///
/// # Examples
///
/// ```
/// use damcascade::SubbasinId;
///
/// let id = SubbasinId::new(42);
/// assert_eq!(id.get(), 42);
/// assert_eq!(id.to_string(), "42");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubbasinId(i64);

impl SubbasinId {
    /// Creates a new SubbasinId from the raw integer id
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the raw integer id
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Converts a cleaned numeric cell into an id.
    ///
    /// Fractional parts are truncated, matching an integer cast of the
    /// column. Returns `None` for non-finite values.
    pub fn from_cell(value: f64) -> Option<Self> {
        if value.is_finite() {
            Some(Self(value.trunc() as i64))
        } else {
            None
        }
    }

    /// Returns true if this id is the "no downstream" marker
    pub fn is_sentinel(self, sentinel: i64) -> bool {
        self.0 == sentinel
    }
}

impl fmt::Display for SubbasinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for SubbasinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SubbasinId({})", self.0)
    }
}

impl From<i64> for SubbasinId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

impl From<SubbasinId> for i64 {
    fn from(id: SubbasinId) -> Self {
        id.0
    }
}
