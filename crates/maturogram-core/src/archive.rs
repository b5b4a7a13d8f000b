//! # Archive Module
//!
//! The scorer bound to a record store.
//!
//! ## Storage Backends
//!
//! - `InMemory`: `MemoryStore`, volatile
//! - `Persistent`: `RedbStore`, disk-backed ACID storage
//!
//! Scoring never touches the store; `submit` scores first and only stores
//! the record once the result is known to be valid.

use crate::checklist::ChecklistResponse;
use crate::export::{HeaderStyle, checksum, export_csv};
use crate::primitives::DEFAULT_UNDO_DEPTH;
use crate::query::{RecordPage, RecordQuery};
use crate::record::{MaturityRecord, NewRecord};
use crate::scorer::{AgePolicy, MaturityScorer};
use crate::storage::{MemoryStore, RecordStore, RedbStore};
use crate::{MaturityResult, MaturogramError, RecordId};
use std::path::Path;

/// Storage backend for an archive.
#[derive(Debug)]
pub enum StorageBackend {
    /// In-memory store (fast, volatile).
    InMemory(MemoryStore),
    /// Disk-backed store using redb (ACID, persistent).
    Persistent(RedbStore),
}

impl Default for StorageBackend {
    fn default() -> Self {
        Self::InMemory(MemoryStore::new())
    }
}

/// A CSV export plus its integrity checksum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub data: String,
    pub checksum: u64,
    pub record_count: usize,
}

/// Scorer and record store.
#[derive(Debug, Default)]
pub struct Archive {
    backend: StorageBackend,
    scorer: MaturityScorer,
}

impl Archive {
    /// Create an empty in-memory archive with the strict age policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an archive over an existing backend.
    #[must_use]
    pub fn with_backend(backend: StorageBackend, scorer: MaturityScorer) -> Self {
        Self { backend, scorer }
    }

    /// Create an in-memory archive with explicit undo depth.
    #[must_use]
    pub fn in_memory(scorer: MaturityScorer, undo_depth: usize) -> Self {
        Self::with_backend(
            StorageBackend::InMemory(MemoryStore::with_undo_depth(undo_depth)),
            scorer,
        )
    }

    /// Open (or create) a redb-backed archive.
    pub fn with_redb(path: impl AsRef<Path>) -> Result<Self, MaturogramError> {
        Self::open_redb(path, MaturityScorer::new(), DEFAULT_UNDO_DEPTH)
    }

    /// Open (or create) a redb-backed archive with explicit settings.
    pub fn open_redb(
        path: impl AsRef<Path>,
        scorer: MaturityScorer,
        undo_depth: usize,
    ) -> Result<Self, MaturogramError> {
        let store = RedbStore::open_with_undo_depth(path, undo_depth)?;
        Ok(Self::with_backend(StorageBackend::Persistent(store), scorer))
    }

    /// Check if this archive persists to disk.
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        matches!(self.backend, StorageBackend::Persistent(_))
    }

    /// The scorer used for every evaluation.
    #[must_use]
    pub fn scorer(&self) -> &MaturityScorer {
        &self.scorer
    }

    #[must_use]
    pub fn age_policy(&self) -> AgePolicy {
        self.scorer.policy()
    }

    fn store(&self) -> &dyn RecordStore {
        match &self.backend {
            StorageBackend::InMemory(store) => store,
            StorageBackend::Persistent(store) => store,
        }
    }

    fn store_mut(&mut self) -> &mut dyn RecordStore {
        match &mut self.backend {
            StorageBackend::InMemory(store) => store,
            StorageBackend::Persistent(store) => store,
        }
    }

    // =========================================================================
    // SCORING
    // =========================================================================

    /// Score precomputed lustrum totals without storing anything.
    pub fn evaluate(&self, age: i64, totals: &[i64]) -> Result<MaturityResult, MaturogramError> {
        self.scorer.compute(age, totals)
    }

    /// Score a full checklist response without storing anything.
    pub fn evaluate_response(
        &self,
        age: i64,
        responses: ChecklistResponse,
    ) -> Result<NewRecord, MaturogramError> {
        NewRecord::evaluate(&self.scorer, age, responses)
    }

    /// Score a checklist response and store it.
    ///
    /// Nothing is stored if scoring fails.
    pub fn submit(
        &mut self,
        age: i64,
        responses: ChecklistResponse,
    ) -> Result<MaturityRecord, MaturogramError> {
        let record = self.evaluate_response(age, responses)?;
        let id = self.store_mut().append(record.clone())?;
        Ok(record.with_id(id))
    }

    // =========================================================================
    // RECORDS
    // =========================================================================

    pub fn get(&self, id: RecordId) -> Result<Option<MaturityRecord>, MaturogramError> {
        self.store().get(id)
    }

    /// All records in id order.
    pub fn records(&self) -> Result<Vec<MaturityRecord>, MaturogramError> {
        self.store().list()
    }

    /// Filtered, sorted, paged listing.
    pub fn query(&self, query: &RecordQuery) -> Result<RecordPage, MaturogramError> {
        query.validate()?;
        query.execute(self.store().list()?)
    }

    pub fn delete(&mut self, id: RecordId) -> Result<MaturityRecord, MaturogramError> {
        self.store_mut().delete_by_id(id)
    }

    /// Restore the most recently deleted record.
    pub fn undo_delete(&mut self) -> Result<MaturityRecord, MaturogramError> {
        self.store_mut().undo_last_delete()
    }

    pub fn record_count(&self) -> Result<usize, MaturogramError> {
        self.store().len()
    }

    pub fn undo_depth(&self) -> Result<usize, MaturogramError> {
        self.store().undo_depth()
    }

    /// Reclaim free space in the database file.
    ///
    /// Returns `false` for the in-memory backend, which has nothing to compact.
    pub fn compact(&mut self) -> Result<bool, MaturogramError> {
        match &mut self.backend {
            StorageBackend::InMemory(_) => Ok(false),
            StorageBackend::Persistent(store) => {
                store.compact()?;
                Ok(true)
            }
        }
    }

    // =========================================================================
    // EXPORT
    // =========================================================================

    /// Export every record as CSV.
    pub fn export_csv(&self, style: HeaderStyle) -> Result<CsvExport, MaturogramError> {
        let records = self.store().list()?;
        let data = export_csv(&records, style);
        Ok(CsvExport {
            checksum: checksum(data.as_bytes()),
            record_count: records.len(),
            data,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::primitives::LUSTRUM_COUNT;
    use crate::{MaturityZone, Percentage};
    use tempfile::tempdir;

    fn response_peaking_at(group: usize) -> ChecklistResponse {
        let mut answers = vec![0i64; 144];
        let start = (group - 1) * 6;
        answers[start..start + 6].copy_from_slice(&[1; 6]);
        ChecklistResponse::from_answers(&answers).expect("answers")
    }

    #[test]
    fn new_archive_is_empty_and_volatile() {
        let archive = Archive::new();
        assert!(!archive.is_persistent());
        assert_eq!(archive.record_count().unwrap(), 0);
        assert_eq!(archive.age_policy(), AgePolicy::Strict);
    }

    #[test]
    fn evaluate_does_not_store() {
        let archive = Archive::new();
        let mut totals = [0i64; LUSTRUM_COUNT];
        totals[5] = 6;
        let result = archive.evaluate(30, &totals).unwrap();
        assert_eq!(result.percentage, Percentage::from_percent(100));
        assert_eq!(result.zone, MaturityZone::Blue);
        assert_eq!(archive.record_count().unwrap(), 0);
    }

    #[test]
    fn submit_stores_scored_record() {
        let mut archive = Archive::new();
        let record = archive.submit(30, response_peaking_at(6)).unwrap();
        assert_eq!(record.result.observed.value, 65);
        assert_eq!(archive.get(record.id).unwrap(), Some(record));
    }

    #[test]
    fn failed_submit_stores_nothing() {
        let mut archive = Archive::new();
        assert!(archive.submit(0, ChecklistResponse::empty()).is_err());
        assert_eq!(archive.record_count().unwrap(), 0);
    }

    #[test]
    fn delete_and_undo_round() {
        let mut archive = Archive::new();
        let record = archive.submit(42, ChecklistResponse::empty()).unwrap();
        archive.delete(record.id).unwrap();
        assert_eq!(archive.record_count().unwrap(), 0);
        assert_eq!(archive.undo_depth().unwrap(), 1);
        assert_eq!(archive.undo_delete().unwrap(), record);
        assert!(matches!(
            archive.undo_delete(),
            Err(MaturogramError::NothingToUndo)
        ));
    }

    #[test]
    fn redb_archive_persists() {
        let temp = tempdir().expect("temp dir");
        let path = temp.path().join("archive.redb");
        let id = {
            let mut archive = Archive::with_redb(&path).expect("open");
            assert!(archive.is_persistent());
            archive.submit(30, response_peaking_at(6)).unwrap().id
        };
        let archive = Archive::with_redb(&path).expect("reopen");
        let record = archive.get(id).unwrap().expect("stored");
        assert_eq!(record.result.zone, MaturityZone::Blue);
    }

    #[test]
    fn compact_only_touches_persistent_archives() {
        let mut volatile = Archive::new();
        assert!(!volatile.compact().unwrap());

        let temp = tempdir().expect("temp dir");
        let mut archive = Archive::with_redb(temp.path().join("archive.redb")).expect("open");
        let kept = archive.submit(30, response_peaking_at(6)).unwrap();
        let gone = archive.submit(40, response_peaking_at(8)).unwrap();
        archive.delete(gone.id).unwrap();

        assert!(archive.compact().unwrap());
        assert_eq!(archive.records().unwrap(), vec![kept]);
        assert_eq!(archive.undo_delete().unwrap(), gone);
    }

    #[test]
    fn legacy_policy_accepts_age_zero() {
        let mut archive = Archive::in_memory(MaturityScorer::with_policy(AgePolicy::Legacy), 5);
        let record = archive.submit(0, ChecklistResponse::empty()).unwrap();
        assert_eq!(record.result.zone, MaturityZone::Red);
    }

    #[test]
    fn csv_export_counts_records() {
        let mut archive = Archive::new();
        archive.submit(30, ChecklistResponse::empty()).unwrap();
        archive.submit(31, ChecklistResponse::empty()).unwrap();
        let export = archive.export_csv(HeaderStyle::Keys).unwrap();
        assert_eq!(export.record_count, 2);
        assert_eq!(export.data.lines().count(), 3);
        assert_eq!(export.checksum, checksum(export.data.as_bytes()));
    }
}
