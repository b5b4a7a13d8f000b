//! In-memory record store.

use super::RecordStore;
use crate::primitives::DEFAULT_UNDO_DEPTH;
use crate::record::{MaturityRecord, NewRecord};
use crate::{MaturogramError, RecordId};
use std::collections::{BTreeMap, VecDeque};

/// Volatile store: a `BTreeMap` of live records and a bounded trash stack.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    records: BTreeMap<RecordId, MaturityRecord>,
    trash: VecDeque<MaturityRecord>,
    next_id: u64,
    max_undo: usize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create an empty store with the default undo depth.
    #[must_use]
    pub fn new() -> Self {
        Self::with_undo_depth(DEFAULT_UNDO_DEPTH)
    }

    /// Create an empty store keeping at most `max_undo` deletions.
    #[must_use]
    pub fn with_undo_depth(max_undo: usize) -> Self {
        Self {
            records: BTreeMap::new(),
            trash: VecDeque::new(),
            next_id: 1,
            max_undo,
        }
    }
}

impl RecordStore for MemoryStore {
    fn append(&mut self, record: NewRecord) -> Result<RecordId, MaturogramError> {
        let id = RecordId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.records.insert(id, record.with_id(id));
        Ok(id)
    }

    fn get(&self, id: RecordId) -> Result<Option<MaturityRecord>, MaturogramError> {
        Ok(self.records.get(&id).cloned())
    }

    fn list(&self) -> Result<Vec<MaturityRecord>, MaturogramError> {
        Ok(self.records.values().cloned().collect())
    }

    fn delete_by_id(&mut self, id: RecordId) -> Result<MaturityRecord, MaturogramError> {
        let record = self
            .records
            .remove(&id)
            .ok_or(MaturogramError::RecordNotFound(id))?;

        if self.max_undo > 0 {
            self.trash.push_back(record.clone());
            while self.trash.len() > self.max_undo {
                self.trash.pop_front();
            }
        }
        Ok(record)
    }

    fn undo_last_delete(&mut self) -> Result<MaturityRecord, MaturogramError> {
        let record = self.trash.pop_back().ok_or(MaturogramError::NothingToUndo)?;
        self.records.insert(record.id, record.clone());
        Ok(record)
    }

    fn len(&self) -> Result<usize, MaturogramError> {
        Ok(self.records.len())
    }

    fn undo_depth(&self) -> Result<usize, MaturogramError> {
        Ok(self.trash.len())
    }
}
