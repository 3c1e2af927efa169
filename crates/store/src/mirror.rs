//! JSON-file implementation of the persistence seam.
//!
//! The durable mirror is a single human-readable JSON array of student
//! records, rewritten in full on each mutation. No append log, no atomic
//! rename; the store holds its write guard across `save`, so there is exactly
//! one writer at a time.

use rosterhub_core::{RecordPersistence, StoreError, StudentRecord};
use std::path::PathBuf;

/// Persists the record snapshot as one pretty-printed JSON array file.
pub struct JsonFileMirror {
    path: PathBuf,
}

impl JsonFileMirror {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl RecordPersistence for JsonFileMirror {
    fn load(&self) -> Result<Vec<StudentRecord>, StoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            // Missing mirror is not an error — the store starts empty.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(StoreError::Persistence(format!(
                    "Failed to read {}: {e}",
                    self.path.display()
                )));
            }
        };

        serde_json::from_str(&content).map_err(|e| {
            StoreError::Persistence(format!(
                "Mirror at {} is not a valid record array: {e}",
                self.path.display()
            ))
        })
    }

    fn save(&self, records: &[StudentRecord]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::Persistence(format!("Failed to create mirror directory: {e}"))
            })?;
        }

        let content = serde_json::to_string_pretty(records)
            .map_err(|e| StoreError::Persistence(format!("Failed to serialize snapshot: {e}")))?;

        std::fs::write(&self.path, content).map_err(|e| {
            StoreError::Persistence(format!("Failed to write {}: {e}", self.path.display()))
        })
    }
}
