//! The persistence seam for the record store's durable mirror.
//!
//! The store reads the mirror once at startup and rewrites it wholesale on
//! every mutation. Keeping the strategy behind this trait lets a future
//! implementation swap in atomic rename-on-write or an embedded database
//! without touching the store's API contract.

use crate::error::StoreError;
use crate::record::StudentRecord;

/// Load/save strategy for the durable mirror of the record snapshot.
///
/// Implementations must be usable from async contexts; the store calls them
/// while holding its write guard, so `save` is the serialization point for
/// concurrent mutations.
pub trait RecordPersistence: Send + Sync {
    /// Read the full snapshot from durable storage.
    ///
    /// A missing mirror is not an error — return an empty snapshot. An
    /// unparsable mirror IS an error; the store decides how to degrade.
    fn load(&self) -> std::result::Result<Vec<StudentRecord>, StoreError>;

    /// Overwrite durable storage with the full snapshot.
    fn save(&self, records: &[StudentRecord]) -> std::result::Result<(), StoreError>;
}
