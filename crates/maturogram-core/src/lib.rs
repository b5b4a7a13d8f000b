//! # maturogram-core
//!
//! The deterministic scoring engine for the Human Maturogram.
//!
//! A respondent's chronological age and their 24 lustrum checklist totals
//! go in; an observed score, a predicted score, their ratio as a
//! fixed-point percentage and a maturity zone come out.
//!
//! ## Architectural Constraints
//!
//! - Pure integer arithmetic; floats are denied workspace-wide
//! - No async, no network, no logging: the app layer does that
//! - Same input, same output, on every platform
//! - Storage is injected through `RecordStore`; the scorer never sees it

// =============================================================================
// MODULES
// =============================================================================

pub mod archive;
pub mod checklist;
pub mod export;
pub mod primitives;
pub mod query;
pub mod record;
pub mod schema;
pub mod scorer;
pub mod storage;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types
// =============================================================================

pub use types::{
    MaturityResult, MaturityZone, MaturogramError, Percentage, RecordId, ScoreComponents,
};

// =============================================================================
// RE-EXPORTS: Scoring
// =============================================================================

pub use checklist::ChecklistResponse;
pub use scorer::{AgePolicy, MaturityScorer, compute};

// =============================================================================
// RE-EXPORTS: Records & Storage
// =============================================================================

pub use archive::{Archive, CsvExport, StorageBackend};
pub use export::{HeaderStyle, checksum, export_csv, verify_checksum};
pub use query::{RecordPage, RecordQuery, SortColumn, SortDirection};
pub use record::{MaturityRecord, NewRecord};
pub use schema::{ChecklistItem, Column, LUSTRUMS, LustrumGroup, record_columns};
pub use storage::{MemoryStore, RecordStore, RedbStore};

#[cfg(feature = "crypto-hash")]
pub use export::compute_blake3_hash;
