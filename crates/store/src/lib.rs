//! The record store — owns the in-memory student snapshot and its durable
//! mirror.
//!
//! Entries are loaded from the mirror once at construction and flushed to it
//! on every mutation. Reads are cheap clones of the snapshot; mutations hold
//! the write guard across the whole mutate-then-persist sequence, so two
//! concurrent creates cannot interleave their read-modify-write and the
//! mirror never lags the in-memory state.

pub mod mirror;

pub use mirror::JsonFileMirror;

use rosterhub_config::ValidationMode;
use rosterhub_core::{RecordPersistence, StoreError, StudentRecord};
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// The explicitly owned record collection.
///
/// Constructed once at startup via [`RecordStore::open`] and injected into the
/// HTTP layer; there is no ambient module-level state.
pub struct RecordStore {
    persistence: Box<dyn RecordPersistence>,
    mode: ValidationMode,
    records: RwLock<Vec<StudentRecord>>,
}

impl RecordStore {
    /// Open the store, reading the durable mirror once.
    ///
    /// A missing mirror starts the store empty. An unparsable mirror also
    /// starts it empty, with a warning — a half-written file from a crashed
    /// process must not keep the service from booting.
    pub fn open(persistence: Box<dyn RecordPersistence>, mode: ValidationMode) -> Self {
        let records = match persistence.load() {
            Ok(records) => {
                debug!(count = records.len(), "Record mirror loaded");
                records
            }
            Err(e) => {
                warn!(error = %e, "Record mirror unreadable, starting empty");
                Vec::new()
            }
        };

        Self {
            persistence,
            mode,
            records: RwLock::new(records),
        }
    }

    /// The current snapshot, in insertion order. Side-effect free.
    pub async fn list(&self) -> Vec<StudentRecord> {
        self.records.read().await.clone()
    }

    /// Number of records currently stored.
    pub async fn count(&self) -> usize {
        self.records.read().await.len()
    }

    /// Validate and append a record, persisting the full snapshot before
    /// returning. The returned record is the stored value verbatim.
    pub async fn create(&self, candidate: StudentRecord) -> Result<StudentRecord, StoreError> {
        validate(&candidate, self.mode)?;

        let mut records = self.records.write().await;

        if records
            .iter()
            .any(|r| r.student_id == candidate.student_id)
        {
            return Err(StoreError::Duplicate {
                student_id: candidate.student_id,
            });
        }

        records.push(candidate.clone());

        // Persist-or-rollback: memory and mirror must not diverge.
        if let Err(e) = self.persistence.save(&records) {
            records.pop();
            return Err(e);
        }

        debug!(student_id = %candidate.student_id, count = records.len(), "Record created");
        Ok(candidate)
    }

    /// Remove the unique record whose `studentID` equals `id`, persisting the
    /// snapshot before returning the removed record.
    pub async fn delete_by_id(&self, id: &str) -> Result<StudentRecord, StoreError> {
        let mut records = self.records.write().await;

        let index = records
            .iter()
            .position(|r| r.student_id == id)
            .ok_or_else(|| StoreError::NotFound {
                student_id: id.to_string(),
            })?;

        let removed = records.remove(index);

        if let Err(e) = self.persistence.save(&records) {
            records.insert(index, removed);
            return Err(e);
        }

        debug!(student_id = %id, count = records.len(), "Record deleted");
        Ok(removed)
    }
}

/// Field-presence and shape checks, per the configured mode.
fn validate(candidate: &StudentRecord, mode: ValidationMode) -> Result<(), StoreError> {
    if candidate.student_id.trim().is_empty() || candidate.full_name.trim().is_empty() {
        return Err(StoreError::Validation(
            "studentID and fullName are required.".into(),
        ));
    }

    if mode == ValidationMode::Strict {
        let missing: Vec<&str> = [
            ("program", &candidate.program),
            ("yearLevel", &candidate.year_level),
            ("gender", &candidate.gender),
            ("gmail", &candidate.gmail),
            ("university", &candidate.university),
        ]
        .iter()
        .filter(|(_, value)| value.as_deref().is_none_or(|v| v.trim().is_empty()))
        .map(|(name, _)| *name)
        .collect();

        if !missing.is_empty() {
            return Err(StoreError::Validation(format!(
                "Missing required fields: {}.",
                missing.join(", ")
            )));
        }
    }

    // Shape check applies in both modes whenever the field is present.
    if !candidate.gmail_is_well_formed() {
        return Err(StoreError::Validation(
            "gmail must look like local@domain.tld.".into(),
        ));
    }

    Ok(())
}
