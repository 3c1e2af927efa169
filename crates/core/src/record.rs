//! The student record — the value object the whole service revolves around.
//!
//! Wire field names are camelCase to match the JSON API and the on-disk
//! mirror. `studentID` is the unique key across the store. Records are never
//! mutated in place: they are created whole and deleted whole.

use serde::{Deserialize, Serialize};

/// A single student entry.
///
/// Only `studentID` and `fullName` are always required; the remaining fields
/// are optional at this level, and the store's validation mode decides how
/// much more to demand. All fields default so that a partial create payload
/// deserializes and fails validation with a clear message instead of a serde
/// error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    /// Unique key across the store (e.g. "2025-001").
    #[serde(rename = "studentID", default)]
    pub student_id: String,

    /// The student's full name.
    #[serde(default)]
    pub full_name: String,

    /// Degree program (e.g. "BSIT").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub program: Option<String>,

    /// Year level as entered (kept as a string, e.g. "3").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year_level: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,

    /// Contact email. Must match a basic `local@domain.tld` shape when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gmail: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub university: Option<String>,
}

impl StudentRecord {
    /// Create a minimal record with only the required fields set.
    pub fn new(student_id: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self {
            student_id: student_id.into(),
            full_name: full_name.into(),
            program: None,
            year_level: None,
            gender: None,
            gmail: None,
            university: None,
        }
    }

    /// Whether `gmail` has a plausible `local@domain.tld` shape.
    ///
    /// Absent or empty values pass — presence requirements are the store's
    /// concern, not the shape check's.
    pub fn gmail_is_well_formed(&self) -> bool {
        let Some(addr) = self.gmail.as_deref() else {
            return true;
        };
        if addr.is_empty() {
            return true;
        }
        let Some((local, domain)) = addr.split_once('@') else {
            return false;
        };
        if local.is_empty() || domain.contains('@') {
            return false;
        }
        // Domain needs at least one dot with non-empty labels on both sides.
        match domain.rsplit_once('.') {
            Some((name, tld)) => !name.is_empty() && !tld.is_empty(),
            None => false,
        }
    }
}
