//! # Core Type Definitions
//!
//! This module contains the value types shared by the scorer, the archive
//! and the outer surfaces:
//! - Record identifiers (`RecordId`)
//! - Score structures (`ScoreComponents`, `Percentage`, `MaturityZone`, `MaturityResult`)
//! - Error types (`MaturogramError`)
//!
//! ## Determinism Guarantees
//!
//! All types in this module:
//! - Use integer arithmetic only (no floating-point)
//! - Implement `Ord` where they are used as keys or sort criteria

use crate::primitives::HUNDREDTHS_PER_PERCENT;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// RECORD IDENTIFIER
// =============================================================================

/// Identifier of a stored submission.
///
/// Ids are assigned by the record store in increasing order and are never
/// reused, not even after a delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordId(pub u64);

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// SCORE COMPONENTS
// =============================================================================

/// The four factors and the final value of one maturogram score.
///
/// Both the observed and the predicted score are built the same way:
/// `value = (age - 1) + lustrum * decade * generation * life_stage`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreComponents {
    /// Factor `a`: lustrum position (observed) or `ceil(age / 5)` (predicted).
    pub lustrum: i64,
    /// Factor `b`: `ceil(a / 2)` (observed) or `ceil(age / 10)` (predicted).
    pub decade: i64,
    /// Factor `c`: four-step generation table.
    pub generation: i64,
    /// Factor `d`: three-step life stage table.
    pub life_stage: i64,
    /// Final score.
    pub value: i64,
}

// =============================================================================
// PERCENTAGE
// =============================================================================

/// A percentage held as a whole number of hundredths.
///
/// `Percentage::from_hundredths(10_000)` is `100.00%`. The core never touches
/// floating-point values; display code formats the two decimals.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct Percentage(i64);

impl Percentage {
    /// Create a percentage from a raw count of hundredths.
    #[must_use]
    pub const fn from_hundredths(hundredths: i64) -> Self {
        Self(hundredths)
    }

    /// Create a percentage from a whole number of percent.
    #[must_use]
    pub const fn from_percent(percent: i64) -> Self {
        Self(percent.saturating_mul(HUNDREDTHS_PER_PERCENT))
    }

    /// `numerator / denominator * 100`, rounded to two decimals.
    ///
    /// The quotient is computed exactly on integers and rounded half away
    /// from zero, so `1/32` gives `3.13` and `-1/32` gives `-3.13`.
    ///
    /// # Errors
    ///
    /// - `DivisionByZero` when `denominator == 0`
    /// - `InvalidResult` when the result does not fit in an `i64`
    pub fn from_ratio(numerator: i64, denominator: i64) -> Result<Self, MaturogramError> {
        if denominator == 0 {
            return Err(MaturogramError::DivisionByZero);
        }

        let scale = i128::from(HUNDREDTHS_PER_PERCENT) * 100;
        let mut num = i128::from(numerator) * scale;
        let mut den = i128::from(denominator);
        if den < 0 {
            num = -num;
            den = -den;
        }

        let rounded = if num >= 0 {
            (2 * num + den) / (2 * den)
        } else {
            -((2 * -num + den) / (2 * den))
        };

        i64::try_from(rounded)
            .map(Self)
            .map_err(|_| MaturogramError::InvalidResult("percentage out of range".to_string()))
    }

    /// Raw hundredths value.
    #[must_use]
    pub const fn hundredths(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for Percentage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let scale = HUNDREDTHS_PER_PERCENT.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / scale, abs % scale)
    }
}

// =============================================================================
// MATURITY ZONE
// =============================================================================

/// Categorical label derived from the observed/predicted percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MaturityZone {
    /// `1 <= p < 50`, and every percentage below 1.
    Red,
    /// `50 <= p < 85`
    Yellow,
    /// `85 <= p < 95`
    Green,
    /// `95 <= p <= 100`
    Blue,
    /// `p > 100`
    Violet,
}

impl MaturityZone {
    /// All zones in ascending band order.
    pub const ALL: [MaturityZone; 5] = [
        MaturityZone::Red,
        MaturityZone::Yellow,
        MaturityZone::Green,
        MaturityZone::Blue,
        MaturityZone::Violet,
    ];

    /// Select the zone for a percentage.
    ///
    /// Bands are checked in order and the first match wins. Anything that
    /// matches no band (below 1%, zero, negative) falls back to Red, so the
    /// label alone does not tell a low score from a degenerate one.
    #[must_use]
    pub fn for_percentage(percentage: Percentage) -> Self {
        match percentage.hundredths() {
            100..=4_999 => MaturityZone::Red,
            5_000..=8_499 => MaturityZone::Yellow,
            8_500..=9_499 => MaturityZone::Green,
            9_500..=10_000 => MaturityZone::Blue,
            p if p > 10_000 => MaturityZone::Violet,
            _ => MaturityZone::Red,
        }
    }

    /// Display label stored with each record.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            MaturityZone::Red => "Red Zone (Formative Maturity)",
            MaturityZone::Yellow => "Yellow Zone (Functional Maturity)",
            MaturityZone::Green => "Green Zone (Fulfilled Maturity)",
            MaturityZone::Blue => "Blue Zone (Transcendent Maturity)",
            MaturityZone::Violet => "Violet Zone (Cosmetic Maturity)",
        }
    }
}

impl std::fmt::Display for MaturityZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// MATURITY RESULT
// =============================================================================

/// Output of one scorer call. Entirely derived from `(age, totals)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaturityResult {
    /// Observed Human Maturogram (OHM).
    pub observed: ScoreComponents,
    /// Predicted Human Maturogram (PHM).
    pub predicted: ScoreComponents,
    /// `observed.value / predicted.value * 100`, two decimals.
    pub percentage: Percentage,
    /// Zone selected from `percentage`.
    pub zone: MaturityZone,
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the Maturogram system.
///
/// - No silent failures
/// - Use `Result<T, MaturogramError>` for fallible operations
/// - The core never panics; all errors are recoverable
#[derive(Debug, Error)]
pub enum MaturogramError {
    /// The caller supplied input outside the scorer's contract.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The predicted score is zero, so no percentage exists.
    #[error("Division by zero: predicted maturogram is 0")]
    DivisionByZero,

    /// The arithmetic produced a value that cannot be represented.
    #[error("Invalid result: {0}")]
    InvalidResult(String),

    /// The requested record does not exist.
    #[error("Record not found: {0}")]
    RecordNotFound(RecordId),

    /// Undo was requested but no deletion is pending.
    #[error("Nothing to undo")]
    NothingToUndo,

    /// A serialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// A deserialization error occurred.
    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

// =============================================================================
// TESTS
// =============================================================================
