//! # redb-backed Record Storage
//!
//! Persists scored submissions in an embedded redb database.
//!
//! Layout:
//! - `records`: record id -> postcard-encoded `MaturityRecord`
//! - `trash`: deletion sequence -> postcard-encoded `MaturityRecord`
//! - `metadata`: counters (`next_record_id`, `next_trash_seq`)
//!
//! Record ids come from a persisted counter and are never reused, even
//! after the record with the highest id is deleted.

use super::RecordStore;
use crate::primitives::DEFAULT_UNDO_DEPTH;
use crate::record::{MaturityRecord, NewRecord};
use crate::{MaturogramError, RecordId};
use redb::{Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition};
use std::path::Path;

/// Table for live records: RecordId(u64) -> serialized record
const RECORDS: TableDefinition<u64, &[u8]> = TableDefinition::new("records");

/// Table for deleted records, keyed by deletion order
const TRASH: TableDefinition<u64, &[u8]> = TableDefinition::new("trash");

/// Table for metadata: key string -> value u64
const METADATA: TableDefinition<&str, u64> = TableDefinition::new("metadata");

const NEXT_RECORD_ID: &str = "next_record_id";
const NEXT_TRASH_SEQ: &str = "next_trash_seq";

fn io_err(e: impl std::fmt::Display) -> MaturogramError {
    MaturogramError::IoError(e.to_string())
}

fn encode(record: &MaturityRecord) -> Result<Vec<u8>, MaturogramError> {
    postcard::to_allocvec(record).map_err(|e| MaturogramError::SerializationError(e.to_string()))
}

fn decode(bytes: &[u8]) -> Result<MaturityRecord, MaturogramError> {
    postcard::from_bytes(bytes).map_err(|e| MaturogramError::DeserializationError(e.to_string()))
}

/// A disk-backed record store using redb.
pub struct RedbStore {
    db: Database,
    max_undo: usize,
}

impl std::fmt::Debug for RedbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbStore")
            .field("max_undo", &self.max_undo)
            .finish_non_exhaustive()
    }
}

impl RedbStore {
    /// Open or create a record database at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, MaturogramError> {
        Self::open_with_undo_depth(path, DEFAULT_UNDO_DEPTH)
    }

    /// Open or create a record database keeping at most `max_undo` deletions.
    pub fn open_with_undo_depth(
        path: impl AsRef<Path>,
        max_undo: usize,
    ) -> Result<Self, MaturogramError> {
        let db = Database::create(path.as_ref()).map_err(io_err)?;

        {
            let write_txn = db.begin_write().map_err(io_err)?;
            let _ = write_txn.open_table(RECORDS).map_err(io_err)?;
            let _ = write_txn.open_table(TRASH).map_err(io_err)?;
            let _ = write_txn.open_table(METADATA).map_err(io_err)?;
            write_txn.commit().map_err(io_err)?;
        }

        Ok(Self { db, max_undo })
    }

    /// Compact the database file.
    pub fn compact(&mut self) -> Result<(), MaturogramError> {
        self.db.compact().map_err(io_err)?;
        Ok(())
    }
}

impl RecordStore for RedbStore {
    fn append(&mut self, record: NewRecord) -> Result<RecordId, MaturogramError> {
        let write_txn = self.db.begin_write().map_err(io_err)?;
        let id = {
            let mut meta = write_txn.open_table(METADATA).map_err(io_err)?;
            let next = meta
                .get(NEXT_RECORD_ID)
                .map_err(io_err)?
                .map(|v| v.value())
                .unwrap_or(1);
            meta.insert(NEXT_RECORD_ID, next.saturating_add(1))
                .map_err(io_err)?;

            let id = RecordId(next);
            let bytes = encode(&record.with_id(id))?;
            let mut records = write_txn.open_table(RECORDS).map_err(io_err)?;
            records.insert(id.0, bytes.as_slice()).map_err(io_err)?;
            id
        };
        write_txn.commit().map_err(io_err)?;
        Ok(id)
    }

    fn get(&self, id: RecordId) -> Result<Option<MaturityRecord>, MaturogramError> {
        let read_txn = self.db.begin_read().map_err(io_err)?;
        let table = read_txn.open_table(RECORDS).map_err(io_err)?;
        match table.get(id.0).map_err(io_err)? {
            Some(data) => Ok(Some(decode(data.value())?)),
            None => Ok(None),
        }
    }

    fn list(&self) -> Result<Vec<MaturityRecord>, MaturogramError> {
        let read_txn = self.db.begin_read().map_err(io_err)?;
        let table = read_txn.open_table(RECORDS).map_err(io_err)?;
        let mut records = Vec::new();
        for entry in table.iter().map_err(io_err)? {
            let (_, value) = entry.map_err(io_err)?;
            records.push(decode(value.value())?);
        }
        Ok(records)
    }

    fn delete_by_id(&mut self, id: RecordId) -> Result<MaturityRecord, MaturogramError> {
        let write_txn = self.db.begin_write().map_err(io_err)?;
        let record = {
            let mut records = write_txn.open_table(RECORDS).map_err(io_err)?;
            let removed = records.remove(id.0).map_err(io_err)?;
            let record = match removed {
                Some(data) => decode(data.value())?,
                None => return Err(MaturogramError::RecordNotFound(id)),
            };

            if self.max_undo > 0 {
                let mut meta = write_txn.open_table(METADATA).map_err(io_err)?;
                let seq = meta
                    .get(NEXT_TRASH_SEQ)
                    .map_err(io_err)?
                    .map(|v| v.value())
                    .unwrap_or(0);
                meta.insert(NEXT_TRASH_SEQ, seq.saturating_add(1))
                    .map_err(io_err)?;

                let mut trash = write_txn.open_table(TRASH).map_err(io_err)?;
                let bytes = encode(&record)?;
                trash.insert(seq, bytes.as_slice()).map_err(io_err)?;

                // Oldest deletions fall off the bottom of the stack.
                while trash.len().map_err(io_err)? > self.max_undo as u64 {
                    let _ = trash.pop_first().map_err(io_err)?;
                }
            }
            record
        };
        write_txn.commit().map_err(io_err)?;
        Ok(record)
    }

    fn undo_last_delete(&mut self) -> Result<MaturityRecord, MaturogramError> {
        let write_txn = self.db.begin_write().map_err(io_err)?;
        let record = {
            let mut trash = write_txn.open_table(TRASH).map_err(io_err)?;
            let popped = trash.pop_last().map_err(io_err)?;
            let record = match popped {
                Some((_, data)) => decode(data.value())?,
                None => return Err(MaturogramError::NothingToUndo),
            };

            let bytes = encode(&record)?;
            let mut records = write_txn.open_table(RECORDS).map_err(io_err)?;
            records.insert(record.id.0, bytes.as_slice()).map_err(io_err)?;
            record
        };
        write_txn.commit().map_err(io_err)?;
        Ok(record)
    }

    fn len(&self) -> Result<usize, MaturogramError> {
        let read_txn = self.db.begin_read().map_err(io_err)?;
        let table = read_txn.open_table(RECORDS).map_err(io_err)?;
        let len = table.len().map_err(io_err)?;
        usize::try_from(len).map_err(io_err)
    }

    fn undo_depth(&self) -> Result<usize, MaturogramError> {
        let read_txn = self.db.begin_read().map_err(io_err)?;
        let table = read_txn.open_table(TRASH).map_err(io_err)?;
        let len = table.len().map_err(io_err)?;
        usize::try_from(len).map_err(io_err)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::checklist::ChecklistResponse;
    use crate::primitives::CHECKLIST_ITEM_COUNT;
    use crate::scorer::MaturityScorer;
    use tempfile::tempdir;

    /// Builds a record from a prefix of answers; the rest are zero.
    fn new_record(age: i64, answers: &[i64]) -> NewRecord {
        let mut padded = vec![0i64; CHECKLIST_ITEM_COUNT];
        padded[..answers.len()].copy_from_slice(answers);
        let response = ChecklistResponse::from_answers(&padded).expect("answers");
        NewRecord::evaluate(&MaturityScorer::new(), age, response).expect("evaluate")
    }

    #[test]
    fn append_and_get() {
        let temp = tempdir().expect("temp dir");
        let mut store = RedbStore::open(temp.path().join("records.redb")).expect("open");

        let id = store.append(new_record(30, &[1, 2, 3])).expect("append");
        let record = store.get(id).expect("get").expect("present");
        assert_eq!(record.id, id);
        assert_eq!(record.age, 30);
        assert_eq!(record.responses.answer(1), Some(2));
        assert_eq!(store.len().expect("len"), 1);
    }

    #[test]
    fn get_unknown_returns_none() {
        let temp = tempdir().expect("temp dir");
        let store = RedbStore::open(temp.path().join("records.redb")).expect("open");
        assert!(store.get(RecordId(7)).expect("get").is_none());
        assert!(store.is_empty().expect("empty"));
    }

    #[test]
    fn records_persist_after_reopen() {
        let temp = tempdir().expect("temp dir");
        let path = temp.path().join("records.redb");

        let (a, b) = {
            let mut store = RedbStore::open(&path).expect("open");
            let a = store.append(new_record(25, &[])).expect("append");
            let b = store.append(new_record(45, &[5; 12])).expect("append");
            store.delete_by_id(a).expect("delete");
            (a, b)
        };

        let mut store = RedbStore::open(&path).expect("reopen");
        assert_eq!(store.len().expect("len"), 1);
        assert_eq!(store.undo_depth().expect("depth"), 1);
        assert_eq!(store.list().expect("list")[0].id, b);

        let restored = store.undo_last_delete().expect("undo");
        assert_eq!(restored.id, a);
        assert_eq!(store.len().expect("len"), 2);
    }

    #[test]
    fn compact_preserves_records_and_trash() {
        let temp = tempdir().expect("temp dir");
        let path = temp.path().join("records.redb");

        let (kept, dropped) = {
            let mut store = RedbStore::open(&path).expect("open");
            let ids: Vec<RecordId> = (0..20)
                .map(|i| store.append(new_record(20 + i, &[3; 6])).expect("append"))
                .collect();
            for id in &ids[1..] {
                store.delete_by_id(*id).expect("delete");
            }
            store.compact().expect("compact");
            (ids[0], ids[19])
        };

        let mut store = RedbStore::open(&path).expect("reopen");
        assert_eq!(store.len().expect("len"), 1);
        assert_eq!(store.get(kept).expect("get").expect("present").age, 20);
        assert_eq!(store.undo_last_delete().expect("undo").id, dropped);
    }

    #[test]
    fn ids_survive_reopen_without_reuse() {
        let temp = tempdir().expect("temp dir");
        let path = temp.path().join("records.redb");

        let first = {
            let mut store = RedbStore::open(&path).expect("open");
            let id = store.append(new_record(20, &[])).expect("append");
            store.delete_by_id(id).expect("delete");
            id
        };

        let mut store = RedbStore::open(&path).expect("reopen");
        let second = store.append(new_record(20, &[])).expect("append");
        assert!(second > first);
    }

    #[test]
    fn undo_restores_in_lifo_order() {
        let temp = tempdir().expect("temp dir");
        let mut store = RedbStore::open(temp.path().join("records.redb")).expect("open");

        let ids: Vec<RecordId> = (0..3)
            .map(|i| store.append(new_record(30 + i, &[])).expect("append"))
            .collect();
        store.delete_by_id(ids[0]).expect("delete");
        store.delete_by_id(ids[2]).expect("delete");

        assert_eq!(store.undo_last_delete().expect("undo").id, ids[2]);
        assert_eq!(store.undo_last_delete().expect("undo").id, ids[0]);
        assert!(matches!(
            store.undo_last_delete(),
            Err(MaturogramError::NothingToUndo)
        ));

        let listed: Vec<RecordId> = store.list().expect("list").iter().map(|r| r.id).collect();
        assert_eq!(listed, ids);
    }

    #[test]
    fn undo_depth_is_bounded() {
        let temp = tempdir().expect("temp dir");
        let mut store =
            RedbStore::open_with_undo_depth(temp.path().join("records.redb"), 2).expect("open");

        let ids: Vec<RecordId> = (0..4)
            .map(|i| store.append(new_record(40 + i, &[])).expect("append"))
            .collect();
        for id in &ids {
            store.delete_by_id(*id).expect("delete");
        }

        assert_eq!(store.undo_depth().expect("depth"), 2);
        assert_eq!(store.undo_last_delete().expect("undo").id, ids[3]);
        assert_eq!(store.undo_last_delete().expect("undo").id, ids[2]);
        assert!(store.undo_last_delete().is_err());
    }

    #[test]
    fn delete_unknown_id_leaves_store_untouched() {
        let temp = tempdir().expect("temp dir");
        let mut store = RedbStore::open(temp.path().join("records.redb")).expect("open");
        store.append(new_record(30, &[])).expect("append");

        assert!(matches!(
            store.delete_by_id(RecordId(42)),
            Err(MaturogramError::RecordNotFound(RecordId(42)))
        ));
        assert_eq!(store.len().expect("len"), 1);
        assert_eq!(store.undo_depth().expect("depth"), 0);
    }
}
