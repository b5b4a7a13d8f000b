//! # Checklist Responses
//!
//! Raw answers to the 144 checklist prompts and their bucketing into the
//! 24 lustrum totals the scorer consumes.
//!
//! - Exactly 144 answers, each in `0..=MAX_ITEM_SCORE`
//! - Form intake: `l{group}_q{item}` fields, missing fields count as 0
//! - Totals: sum of each consecutive block of 6 answers

use crate::primitives::{CHECKLIST_ITEM_COUNT, ITEMS_PER_LUSTRUM, LUSTRUM_COUNT, MAX_ITEM_SCORE};
use crate::schema::{LUSTRUMS, LustrumGroup, item_by_key};
use crate::MaturogramError;
use serde::{Deserialize, Serialize};

/// A validated set of 144 checklist answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistResponse {
    answers: Vec<u8>,
}

impl ChecklistResponse {
    /// Build a response from answers in form order.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if there are not exactly 144 answers or an answer is
    /// outside `0..=MAX_ITEM_SCORE`.
    pub fn from_answers(answers: &[i64]) -> Result<Self, MaturogramError> {
        if answers.len() != CHECKLIST_ITEM_COUNT {
            return Err(MaturogramError::InvalidInput(format!(
                "expected {} checklist answers, got {}",
                CHECKLIST_ITEM_COUNT,
                answers.len()
            )));
        }

        let answers = answers
            .iter()
            .enumerate()
            .map(|(index, &value)| validate_answer(index, value))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { answers })
    }

    /// Build a response from form fields (`l{group}_q{item}` -> value).
    ///
    /// Fields that are absent count as 0. Blank values also count as 0.
    ///
    /// # Errors
    ///
    /// `InvalidInput` on an unknown key, a non-integer value, an out-of-range
    /// value, or the same key given twice.
    pub fn from_fields<'a, I>(fields: I) -> Result<Self, MaturogramError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut answers = vec![0u8; CHECKLIST_ITEM_COUNT];
        let mut seen = vec![false; CHECKLIST_ITEM_COUNT];

        for (key, raw) in fields {
            let item = item_by_key(key.trim()).ok_or_else(|| {
                MaturogramError::InvalidInput(format!("unknown checklist field '{}'", key))
            })?;

            if std::mem::replace(&mut seen[item.index], true) {
                return Err(MaturogramError::InvalidInput(format!(
                    "checklist field '{}' given twice",
                    item.key
                )));
            }

            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }
            let value: i64 = raw.parse().map_err(|_| {
                MaturogramError::InvalidInput(format!(
                    "checklist field '{}' is not an integer: '{}'",
                    item.key, raw
                ))
            })?;
            answers[item.index] = validate_answer(item.index, value)?;
        }

        Ok(Self { answers })
    }

    /// A response with every answer set to 0.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            answers: vec![0; CHECKLIST_ITEM_COUNT],
        }
    }

    /// All 144 answers in form order.
    #[must_use]
    pub fn answers(&self) -> &[u8] {
        &self.answers
    }

    /// Answer at a 0-based position.
    #[must_use]
    pub fn answer(&self, index: usize) -> Option<u8> {
        self.answers.get(index).copied()
    }

    /// The six answers belonging to a lustrum group.
    #[must_use]
    pub fn group_answers(&self, group: &LustrumGroup) -> &[u8] {
        let start = (group.number - 1) * ITEMS_PER_LUSTRUM;
        self.answers
            .get(start..start + ITEMS_PER_LUSTRUM)
            .unwrap_or_default()
    }

    /// Sum the answers of each lustrum group, earliest first.
    #[must_use]
    pub fn lustrum_totals(&self) -> [i64; LUSTRUM_COUNT] {
        let mut totals = [0i64; LUSTRUM_COUNT];
        for (total, group) in totals.iter_mut().zip(LUSTRUMS.iter()) {
            *total = self.group_answers(group).iter().map(|&a| i64::from(a)).sum();
        }
        totals
    }
}

fn validate_answer(index: usize, value: i64) -> Result<u8, MaturogramError> {
    u8::try_from(value)
        .ok()
        .filter(|v| *v <= MAX_ITEM_SCORE)
        .ok_or_else(|| {
            MaturogramError::InvalidInput(format!(
                "answer {} at position {} outside 0..={}",
                value,
                index + 1,
                MAX_ITEM_SCORE
            ))
        })
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::LUSTRUMS;

    #[test]
    fn totals_sum_blocks_of_six() {
        let mut answers = vec![0i64; CHECKLIST_ITEM_COUNT];
        for a in answers.iter_mut().take(6) {
            *a = 1;
        }
        answers[6] = 5;
        answers[143] = 3;

        let response = ChecklistResponse::from_answers(&answers).expect("valid");
        let totals = response.lustrum_totals();
        assert_eq!(totals[0], 6);
        assert_eq!(totals[1], 5);
        assert_eq!(totals[23], 3);
        assert_eq!(totals.iter().sum::<i64>(), 14);
    }

    #[test]
    fn wrong_answer_count_is_rejected() {
        assert!(ChecklistResponse::from_answers(&[0; 143]).is_err());
        assert!(ChecklistResponse::from_answers(&[0; 145]).is_err());
    }

    #[test]
    fn out_of_range_answer_is_rejected() {
        let mut answers = vec![0i64; CHECKLIST_ITEM_COUNT];
        answers[10] = i64::from(MAX_ITEM_SCORE) + 1;
        assert!(ChecklistResponse::from_answers(&answers).is_err());

        answers[10] = -1;
        assert!(ChecklistResponse::from_answers(&answers).is_err());
    }

    #[test]
    fn form_fields_default_to_zero() {
        let response =
            ChecklistResponse::from_fields([("l1_q1", "1"), ("l2_q3", "4"), ("l3_q1", " ")])
                .expect("valid");

        let totals = response.lustrum_totals();
        assert_eq!(totals[0], 1);
        assert_eq!(totals[1], 4);
        assert_eq!(totals[2], 0);
        assert_eq!(response.answer(8), Some(4));
    }

    #[test]
    fn form_fields_reject_unknown_and_duplicate_keys() {
        assert!(ChecklistResponse::from_fields([("l0_q1", "1")]).is_err());
        assert!(ChecklistResponse::from_fields([("age", "30")]).is_err());
        assert!(ChecklistResponse::from_fields([("l1_q1", "1"), ("l1_q1", "0")]).is_err());
        assert!(ChecklistResponse::from_fields([("l1_q1", "yes")]).is_err());
    }

    #[test]
    fn group_answers_slice() {
        let mut answers = vec![0i64; CHECKLIST_ITEM_COUNT];
        answers[12..18].copy_from_slice(&[1, 2, 3, 4, 5, 0]);
        let response = ChecklistResponse::from_answers(&answers).expect("valid");
        assert_eq!(response.group_answers(&LUSTRUMS[2]), &[1, 2, 3, 4, 5, 0]);

        let totals = response.lustrum_totals();
        assert_eq!(totals[2], 15);
        assert_eq!(totals.iter().sum::<i64>(), 15);
    }
}
