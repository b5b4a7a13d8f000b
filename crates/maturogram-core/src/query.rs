//! # Query Module
//!
//! Paged, searchable, sortable listing over stored records.
//!
//! Mirrors the server-side table protocol used by admin listings:
//! the caller echoes a `draw` counter and gets back the page together
//! with the total and filtered counts.

use crate::primitives::{MAX_PAGE_LENGTH, MAX_SEARCH_LENGTH};
use crate::record::MaturityRecord;
use crate::MaturogramError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

/// Column a listing can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    #[default]
    Id,
    Age,
    Observed,
    Predicted,
    Percentage,
    Zone,
}

impl FromStr for SortColumn {
    type Err = MaturogramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "id" => Ok(Self::Id),
            "age" => Ok(Self::Age),
            "observed" => Ok(Self::Observed),
            "predicted" => Ok(Self::Predicted),
            "percentage" => Ok(Self::Percentage),
            "zone" => Ok(Self::Zone),
            other => Err(MaturogramError::InvalidInput(format!(
                "unknown sort column '{other}'"
            ))),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortDirection {
    type Err = MaturogramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(MaturogramError::InvalidInput(format!(
                "unknown sort direction '{other}'"
            ))),
        }
    }
}

/// A listing request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordQuery {
    /// Opaque request counter, echoed back unchanged.
    pub draw: u64,
    /// Offset of the first record in the filtered, sorted set.
    pub start: usize,
    /// Page size. `None` returns everything up to `MAX_PAGE_LENGTH`.
    pub length: Option<usize>,
    /// Case-insensitive substring filter.
    pub search: Option<String>,
    pub order_by: SortColumn,
    pub direction: SortDirection,
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordPage {
    pub draw: u64,
    pub records_total: usize,
    pub records_filtered: usize,
    pub data: Vec<MaturityRecord>,
}

impl RecordQuery {
    /// Listing of everything in id order.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Reject searches longer than `MAX_SEARCH_LENGTH`.
    pub fn validate(&self) -> Result<(), MaturogramError> {
        if let Some(search) = &self.search
            && search.chars().count() > MAX_SEARCH_LENGTH
        {
            return Err(MaturogramError::InvalidInput(format!(
                "search text exceeds {MAX_SEARCH_LENGTH} characters"
            )));
        }
        Ok(())
    }

    /// Filter, sort and page `records`.
    pub fn execute(&self, records: Vec<MaturityRecord>) -> Result<RecordPage, MaturogramError> {
        self.validate()?;

        let records_total = records.len();
        let needle = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let mut filtered: Vec<MaturityRecord> = match &needle {
            Some(needle) => records
                .into_iter()
                .filter(|r| matches_search(r, needle))
                .collect(),
            None => records,
        };

        filtered.sort_by(|a, b| {
            let ord = compare(a, b, self.order_by).then_with(|| a.id.cmp(&b.id));
            match self.direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        });

        let records_filtered = filtered.len();
        let length = self
            .length
            .unwrap_or(MAX_PAGE_LENGTH)
            .min(MAX_PAGE_LENGTH);
        let data = filtered
            .into_iter()
            .skip(self.start)
            .take(length)
            .collect();

        Ok(RecordPage {
            draw: self.draw,
            records_total,
            records_filtered,
            data,
        })
    }
}

fn compare(a: &MaturityRecord, b: &MaturityRecord, column: SortColumn) -> Ordering {
    match column {
        SortColumn::Id => a.id.cmp(&b.id),
        SortColumn::Age => a.age.cmp(&b.age),
        SortColumn::Observed => a.result.observed.value.cmp(&b.result.observed.value),
        SortColumn::Predicted => a.result.predicted.value.cmp(&b.result.predicted.value),
        SortColumn::Percentage => a.result.percentage.cmp(&b.result.percentage),
        SortColumn::Zone => a.result.zone.cmp(&b.result.zone),
    }
}

fn matches_search(record: &MaturityRecord, needle: &str) -> bool {
    let haystack = [
        record.id.to_string(),
        record.age.to_string(),
        record.result.observed.value.to_string(),
        record.result.predicted.value.to_string(),
        record.result.percentage.to_string(),
        record.result.zone.label().to_string(),
    ];
    haystack
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}
