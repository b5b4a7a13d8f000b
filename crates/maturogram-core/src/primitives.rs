//! # Fixed Primitives
//!
//! Compiled-in constants of the Human Maturogram instrument.
//!
//! The checklist shape and the scoring tables are part of the instrument
//! itself, not configuration. Changing any of these values changes the
//! meaning of every stored record.

/// Number of life-stage groups (lustrums) in the checklist.
pub const LUSTRUM_COUNT: usize = 24;

/// Number of checklist items per lustrum.
pub const ITEMS_PER_LUSTRUM: usize = 6;

/// Total number of checklist items (24 x 6).
pub const CHECKLIST_ITEM_COUNT: usize = LUSTRUM_COUNT * ITEMS_PER_LUSTRUM;

/// Highest score a single checklist item may carry.
///
/// Items are yes/no (0/1) or Likert-style (0..=5) answers.
pub const MAX_ITEM_SCORE: u8 = 5;

/// Lowest age accepted by the strict age policy.
pub const MIN_AGE: i64 = 1;

/// Highest age accepted by the strict age policy.
pub const MAX_AGE: i64 = 150;

/// Fixed-point scale of a percentage: 1% == 100 hundredths.
pub const HUNDREDTHS_PER_PERCENT: i64 = 100;

/// Default number of deleted records kept for undo.
///
/// Older deletions fall off the undo stack and become permanent.
pub const DEFAULT_UNDO_DEPTH: usize = 20;

/// Maximum page length accepted by record listing queries.
pub const MAX_PAGE_LENGTH: usize = 1000;

/// Maximum length of a listing search string.
pub const MAX_SEARCH_LENGTH: usize = 256;
