//! # Maturity Scorer
//!
//! Pure arithmetic from `(age, 24 lustrum totals)` to a [`MaturityResult`].
//!
//! - Observed (OHM): driven by the latest lustrum holding the peak total
//! - Predicted (PHM): driven by chronological age alone
//! - Percentage: OHM / PHM in hundredths, rounded half away from zero
//!
//! The scorer holds no state beyond its age policy, performs no I/O and
//! never logs. All arithmetic is checked; nothing here can panic.

use crate::primitives::{LUSTRUM_COUNT, MAX_AGE, MIN_AGE};
use crate::{MaturityResult, MaturityZone, MaturogramError, Percentage, ScoreComponents};
use serde::{Deserialize, Serialize};

// =============================================================================
// AGE POLICY
// =============================================================================

/// How the scorer treats ages outside the human range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgePolicy {
    /// Reject ages outside `MIN_AGE..=MAX_AGE`.
    #[default]
    Strict,
    /// Feed any age into the formulas, including zero and negative ages.
    Legacy,
}

impl AgePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            AgePolicy::Strict => "strict",
            AgePolicy::Legacy => "legacy",
        }
    }

    /// Check an age against this policy.
    pub fn check(self, age: i64) -> Result<(), MaturogramError> {
        match self {
            AgePolicy::Strict if !(MIN_AGE..=MAX_AGE).contains(&age) => {
                Err(MaturogramError::InvalidInput(format!(
                    "age {} outside {}..={}",
                    age, MIN_AGE, MAX_AGE
                )))
            }
            _ => Ok(()),
        }
    }
}

impl std::str::FromStr for AgePolicy {
    type Err = MaturogramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(AgePolicy::Strict),
            "legacy" => Ok(AgePolicy::Legacy),
            other => Err(MaturogramError::InvalidInput(format!(
                "unknown age policy '{}' (use strict|legacy)",
                other
            ))),
        }
    }
}

// =============================================================================
// SCORER
// =============================================================================

/// The Maturity Scorer.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaturityScorer {
    policy: AgePolicy,
}

impl MaturityScorer {
    /// Create a scorer with the strict age policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scorer with an explicit age policy.
    #[must_use]
    pub fn with_policy(policy: AgePolicy) -> Self {
        Self { policy }
    }

    /// The age policy in effect.
    #[must_use]
    pub fn policy(&self) -> AgePolicy {
        self.policy
    }

    /// Compute the full maturity result.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if `totals` is not exactly 24 long or the age is
    ///   rejected by the policy
    /// - `DivisionByZero` if the predicted score is 0
    /// - `InvalidResult` on arithmetic overflow
    pub fn compute(&self, age: i64, totals: &[i64]) -> Result<MaturityResult, MaturogramError> {
        if totals.len() != LUSTRUM_COUNT {
            return Err(MaturogramError::InvalidInput(format!(
                "expected {} lustrum totals, got {}",
                LUSTRUM_COUNT,
                totals.len()
            )));
        }
        self.policy.check(age)?;

        let observed = observed_components(age, totals)?;
        let predicted = predicted_components(age)?;
        let percentage = Percentage::from_ratio(observed.value, predicted.value)?;

        Ok(MaturityResult {
            observed,
            predicted,
            percentage,
            zone: MaturityZone::for_percentage(percentage),
        })
    }
}

/// Compute with the default (strict) scorer.
pub fn compute(age: i64, totals: &[i64]) -> Result<MaturityResult, MaturogramError> {
    MaturityScorer::new().compute(age, totals)
}

// =============================================================================
// OBSERVED HUMAN MATUROGRAM
// =============================================================================

/// 1-based position of the last occurrence of the maximum total.
///
/// Ties go to the latest life-stage group. Returns `None` for an empty slice.
#[must_use]
pub fn peak_lustrum(totals: &[i64]) -> Option<usize> {
    let max = totals.iter().max()?;
    totals.iter().rposition(|t| t == max).map(|idx| idx + 1)
}

/// Generation factor `c` of the observed score.
#[must_use]
pub fn observed_generation(lustrum: i64) -> i64 {
    match lustrum {
        i64::MIN..=6 => 1,
        7..=12 => 2,
        13..=18 => 3,
        _ => 4,
    }
}

/// Life stage factor `d` of the observed score.
#[must_use]
pub fn observed_life_stage(lustrum: i64) -> i64 {
    match lustrum {
        i64::MIN..=3 => 1,
        4..=6 => 2,
        _ => 3,
    }
}

fn observed_components(age: i64, totals: &[i64]) -> Result<ScoreComponents, MaturogramError> {
    let lustrum = peak_lustrum(totals)
        .ok_or_else(|| MaturogramError::InvalidInput("no lustrum totals".to_string()))?
        as i64;
    let decade = ceil_div(lustrum, 2);
    let generation = observed_generation(lustrum);
    let life_stage = observed_life_stage(lustrum);

    assemble(age, lustrum, decade, generation, life_stage)
}

// =============================================================================
// PREDICTED HUMAN MATUROGRAM
// =============================================================================

/// Generation factor `c` of the predicted score.
#[must_use]
pub fn predicted_generation(age: i64) -> i64 {
    match age {
        i64::MIN..=30 => 1,
        31..=60 => 2,
        61..=90 => 3,
        _ => 4,
    }
}

/// Life stage factor `d` of the predicted score.
#[must_use]
pub fn predicted_life_stage(age: i64) -> i64 {
    match age {
        i64::MIN..=15 => 1,
        16..=30 => 2,
        _ => 3,
    }
}

fn predicted_components(age: i64) -> Result<ScoreComponents, MaturogramError> {
    let lustrum = ceil_div(age, 5);
    let decade = ceil_div(age, 10);
    let generation = predicted_generation(age);
    let life_stage = predicted_life_stage(age);

    assemble(age, lustrum, decade, generation, life_stage)
}

// =============================================================================
// ARITHMETIC HELPERS
// =============================================================================

/// Ceiling division for a positive divisor, correct for negative dividends.
#[must_use]
pub fn ceil_div(n: i64, d: i64) -> i64 {
    let q = n / d;
    if n % d > 0 { q + 1 } else { q }
}

/// `(age - 1) + a*b*c*d` with overflow checks.
fn assemble(
    age: i64,
    lustrum: i64,
    decade: i64,
    generation: i64,
    life_stage: i64,
) -> Result<ScoreComponents, MaturogramError> {
    let overflow = || MaturogramError::InvalidResult(format!("score overflow at age {}", age));

    let product = lustrum
        .checked_mul(decade)
        .and_then(|p| p.checked_mul(generation))
        .and_then(|p| p.checked_mul(life_stage))
        .ok_or_else(overflow)?;
    let value = age
        .checked_sub(1)
        .and_then(|base| base.checked_add(product))
        .ok_or_else(overflow)?;

    Ok(ScoreComponents {
        lustrum,
        decade,
        generation,
        life_stage,
        value,
    })
}

// =============================================================================
// TESTS
// =============================================================================
