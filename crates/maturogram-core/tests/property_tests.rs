//! # Property-Based Tests
//!
//! Determinism and structural invariants of the scorer, checked with proptest.

use maturogram_core::scorer::{
    ceil_div, observed_generation, observed_life_stage, peak_lustrum, predicted_generation,
    predicted_life_stage,
};
use maturogram_core::{
    AgePolicy, ChecklistResponse, MaturityScorer, MaturityZone, Percentage, compute,
};
use proptest::collection::vec;
use proptest::prelude::*;

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// Same input produces identical output.
    #[test]
    fn determinism_identical_input_produces_identical_output(
        age in 1i64..=150,
        totals in vec(0i64..=30, 24)
    ) {
        let first = compute(age, &totals).expect("compute");
        let second = compute(age, &totals).expect("compute");
        prop_assert_eq!(first, second);
    }

    /// The observed lustrum points at the last maximum.
    #[test]
    fn observed_lustrum_is_last_maximum(totals in vec(0i64..=30, 24)) {
        let result = compute(30, &totals).expect("compute");
        let a = result.observed.lustrum as usize;
        let max = *totals.iter().max().expect("non-empty");

        prop_assert_eq!(totals[a - 1], max);
        prop_assert!(totals[a..].iter().all(|t| *t < max));
        prop_assert_eq!(peak_lustrum(&totals), Some(a));
    }

    /// Component step tables never decrease.
    #[test]
    fn step_tables_are_monotonic(x in 1i64..200) {
        prop_assert!(observed_generation(x) <= observed_generation(x + 1));
        prop_assert!(observed_life_stage(x) <= observed_life_stage(x + 1));
        prop_assert!(predicted_generation(x) <= predicted_generation(x + 1));
        prop_assert!(predicted_life_stage(x) <= predicted_life_stage(x + 1));
    }

    /// `ceil_div` is the smallest integer not below the exact quotient.
    #[test]
    fn ceil_div_matches_definition(n in -10_000i64..10_000, d in 1i64..50) {
        let q = ceil_div(n, d);
        prop_assert!(q * d >= n);
        prop_assert!((q - 1) * d < n);
    }

    /// Observed and predicted values keep the `(age - 1) + a*b*c*d` shape.
    #[test]
    fn values_follow_component_product(
        age in 1i64..=150,
        totals in vec(0i64..=30, 24)
    ) {
        let r = compute(age, &totals).expect("compute");
        for c in [r.observed, r.predicted] {
            prop_assert_eq!(
                c.value,
                (age - 1) + c.lustrum * c.decade * c.generation * c.life_stage
            );
        }
    }

    /// The zone is a pure function of the percentage.
    #[test]
    fn zone_follows_percentage(age in 1i64..=150, totals in vec(0i64..=30, 24)) {
        let r = compute(age, &totals).expect("compute");
        prop_assert_eq!(r.zone, MaturityZone::for_percentage(r.percentage));
    }

    /// Rounded percentage is within half a hundredth of the exact ratio.
    #[test]
    fn percentage_rounding_error_is_bounded(num in -100_000i64..100_000, den in 1i64..10_000) {
        let p = Percentage::from_ratio(num, den).expect("ratio").hundredths();
        // |p/10000 - num/den| <= 1/20000  <=>  |20000*num - 2*p*den| <= den
        let diff = (20_000 * i128::from(num) - 2 * i128::from(p) * i128::from(den)).abs();
        prop_assert!(diff <= i128::from(den));
    }

    /// Legacy scoring never panics, whatever the age.
    #[test]
    fn legacy_scoring_never_panics(age in any::<i64>(), totals in vec(any::<i64>(), 24)) {
        let scorer = MaturityScorer::with_policy(AgePolicy::Legacy);
        let _ = scorer.compute(age, &totals);
    }

    /// Bucketed totals are per-group sums of six answers.
    #[test]
    fn bucketing_sums_six_answers(answers in vec(0i64..=5, 144)) {
        let response = ChecklistResponse::from_answers(&answers).expect("answers");
        let totals = response.lustrum_totals();
        for (group, total) in totals.iter().enumerate() {
            let expected: i64 = answers[group * 6..group * 6 + 6].iter().sum();
            prop_assert_eq!(*total, expected);
        }
    }
}
