//! # Record Storage
//!
//! The injectable store behind the archive.
//!
//! - `MemoryStore`: volatile, for tests and throwaway sessions
//! - `RedbStore`: disk-backed, ACID, survives restarts
//!
//! Both keep a bounded LIFO stack of deleted records so the most recent
//! deletions can be undone. Restored records keep their original id.

mod memory;
mod redb_store;

pub use memory::MemoryStore;
pub use redb_store::RedbStore;

use crate::record::{MaturityRecord, NewRecord};
use crate::{MaturogramError, RecordId};

/// Storage interface for scored submissions.
pub trait RecordStore {
    /// Store a new record and return its id.
    fn append(&mut self, record: NewRecord) -> Result<RecordId, MaturogramError>;

    /// Fetch a record by id.
    fn get(&self, id: RecordId) -> Result<Option<MaturityRecord>, MaturogramError>;

    /// All live records in ascending id order.
    fn list(&self) -> Result<Vec<MaturityRecord>, MaturogramError>;

    /// Delete a record, push it on the undo stack and return it.
    ///
    /// Returns `RecordNotFound` if the id is unknown.
    fn delete_by_id(&mut self, id: RecordId) -> Result<MaturityRecord, MaturogramError>;

    /// Restore the most recently deleted record.
    ///
    /// Returns `NothingToUndo` if the undo stack is empty.
    fn undo_last_delete(&mut self) -> Result<MaturityRecord, MaturogramError>;

    /// Number of live records.
    fn len(&self) -> Result<usize, MaturogramError>;

    /// Check if the store holds no live records.
    fn is_empty(&self) -> Result<bool, MaturogramError> {
        Ok(self.len()? == 0)
    }

    /// Number of deletions that can still be undone.
    fn undo_depth(&self) -> Result<usize, MaturogramError>;
}
