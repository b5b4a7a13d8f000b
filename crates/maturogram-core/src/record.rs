//! # Records
//!
//! A submission as it is persisted: the raw answers, the lustrum totals
//! derived from them, and the full scorer output.

use crate::checklist::ChecklistResponse;
use crate::primitives::LUSTRUM_COUNT;
use crate::schema::{Column, ScoreField};
use crate::scorer::MaturityScorer;
use crate::{MaturityResult, MaturogramError, RecordId, ScoreComponents};
use serde::{Deserialize, Serialize};

/// A scored submission that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRecord {
    pub age: i64,
    pub responses: ChecklistResponse,
    pub totals: [i64; LUSTRUM_COUNT],
    pub result: MaturityResult,
}

impl NewRecord {
    /// Bucket the responses and score them.
    pub fn evaluate(
        scorer: &MaturityScorer,
        age: i64,
        responses: ChecklistResponse,
    ) -> Result<Self, MaturogramError> {
        let totals = responses.lustrum_totals();
        let result = scorer.compute(age, &totals)?;
        Ok(Self {
            age,
            responses,
            totals,
            result,
        })
    }

    /// Attach the id assigned by a store.
    #[must_use]
    pub fn with_id(self, id: RecordId) -> MaturityRecord {
        MaturityRecord {
            id,
            age: self.age,
            responses: self.responses,
            totals: self.totals,
            result: self.result,
        }
    }
}

/// A stored submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaturityRecord {
    pub id: RecordId,
    pub age: i64,
    pub responses: ChecklistResponse,
    pub totals: [i64; LUSTRUM_COUNT],
    pub result: MaturityResult,
}

impl MaturityRecord {
    /// Render one column of this record as text.
    #[must_use]
    pub fn cell(&self, column: &Column) -> String {
        match column {
            Column::Id => self.id.to_string(),
            Column::Age => self.age.to_string(),
            Column::Item(_, item) => self
                .responses
                .answer(item.index)
                .map(|a| a.to_string())
                .unwrap_or_default(),
            Column::LustrumTotal(group) => self
                .totals
                .get(group.number - 1)
                .map(|t| t.to_string())
                .unwrap_or_default(),
            Column::Observed(field) => score_field(&self.result.observed, *field).to_string(),
            Column::Predicted(field) => score_field(&self.result.predicted, *field).to_string(),
            Column::Percentage => self.result.percentage.to_string(),
            Column::Zone => self.result.zone.label().to_string(),
        }
    }
}

fn score_field(components: &ScoreComponents, field: ScoreField) -> i64 {
    match field {
        ScoreField::Lustrum => components.lustrum,
        ScoreField::Decade => components.decade,
        ScoreField::Generation => components.generation,
        ScoreField::LifeStage => components.life_stage,
        ScoreField::Maturogram => components.value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::CHECKLIST_ITEM_COUNT;
    use crate::schema::{LUSTRUMS, record_columns};

    fn sample_record() -> MaturityRecord {
        let mut answers = vec![0i64; CHECKLIST_ITEM_COUNT];
        answers[30..36].copy_from_slice(&[1, 1, 1, 1, 1, 1]);
        let responses = ChecklistResponse::from_answers(&answers).expect("valid");
        NewRecord::evaluate(&MaturityScorer::new(), 30, responses)
            .expect("evaluate")
            .with_id(RecordId(7))
    }

    #[test]
    fn evaluate_scores_bucketed_totals() {
        let record = sample_record();
        assert_eq!(record.totals[5], 6);
        assert_eq!(record.result.observed.lustrum, 6);
        assert_eq!(record.result.observed.value, 65);
        assert_eq!(record.result.percentage.to_string(), "100.00");
    }

    #[test]
    fn cells_follow_columns() {
        let record = sample_record();
        let row: Vec<String> = record_columns().iter().map(|c| record.cell(c)).collect();

        assert_eq!(row[0], "7");
        assert_eq!(row[1], "30");
        assert_eq!(record.cell(&Column::LustrumTotal(&LUSTRUMS[5])), "6");
        assert_eq!(record.cell(&Column::Observed(ScoreField::Decade)), "3");
        assert_eq!(record.cell(&Column::Predicted(ScoreField::Maturogram)), "65");
        assert_eq!(row.last().map(String::as_str), Some("Blue Zone (Transcendent Maturity)"));
    }

    #[test]
    fn evaluate_propagates_scorer_errors() {
        let err = NewRecord::evaluate(&MaturityScorer::new(), 0, ChecklistResponse::empty())
            .expect_err("age 0 rejected");
        assert!(matches!(err, MaturogramError::InvalidInput(_)));
    }
}
