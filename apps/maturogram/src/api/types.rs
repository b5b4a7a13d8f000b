//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API.

use maturogram_core::primitives::{CHECKLIST_ITEM_COUNT, MAX_ITEM_SCORE};
use maturogram_core::query::{SortColumn, SortDirection};
use maturogram_core::{
    ChecklistResponse, LUSTRUMS, MaturityRecord, MaturityResult, MaturityZone, MaturogramError,
    RecordQuery, ScoreComponents,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// CHECKLIST SCHEMA
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemJson {
    pub index: usize,
    pub key: String,
    pub prompt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LustrumJson {
    pub number: usize,
    pub title: String,
    pub total_key: String,
    pub items: Vec<ItemJson>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneJson {
    pub name: String,
    pub label: String,
}

/// The full questionnaire: 24 groups of 6 prompts plus the zone labels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaResponse {
    pub max_item_score: u8,
    pub item_count: usize,
    pub lustrums: Vec<LustrumJson>,
    pub zones: Vec<ZoneJson>,
}

impl SchemaResponse {
    #[must_use]
    pub fn build() -> Self {
        let lustrums = LUSTRUMS
            .iter()
            .map(|group| LustrumJson {
                number: group.number,
                title: group.title.to_string(),
                total_key: group.total_key.to_string(),
                items: group
                    .items
                    .iter()
                    .map(|item| ItemJson {
                        index: item.index,
                        key: item.key.to_string(),
                        prompt: item.prompt.to_string(),
                    })
                    .collect(),
            })
            .collect();

        let zones = MaturityZone::ALL
            .iter()
            .map(|zone| ZoneJson {
                name: format!("{:?}", zone),
                label: zone.label().to_string(),
            })
            .collect();

        Self {
            max_item_score: MAX_ITEM_SCORE,
            item_count: CHECKLIST_ITEM_COUNT,
            lustrums,
            zones,
        }
    }
}

// =============================================================================
// SCORE REQUEST/RESPONSE
// =============================================================================

/// Score precomputed lustrum totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRequest {
    pub age: i64,
    pub totals: Vec<i64>,
}

/// Scorer output as JSON.
///
/// `percentage` is the two-decimal display text; `percentage_hundredths`
/// is the exact fixed-point value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultJson {
    pub observed: ScoreComponents,
    pub predicted: ScoreComponents,
    pub percentage: String,
    pub percentage_hundredths: i64,
    pub zone: String,
    pub zone_label: String,
}

impl From<&MaturityResult> for ResultJson {
    fn from(result: &MaturityResult) -> Self {
        Self {
            observed: result.observed,
            predicted: result.predicted,
            percentage: result.percentage.to_string(),
            percentage_hundredths: result.percentage.hundredths(),
            zone: format!("{:?}", result.zone),
            zone_label: result.zone.label().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreResponse {
    pub success: bool,
    pub result: Option<ResultJson>,
    pub error: Option<String>,
}

impl ScoreResponse {
    pub fn success(result: &MaturityResult) -> Self {
        Self {
            success: true,
            result: Some(ResultJson::from(result)),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// SUBMIT REQUEST/RESPONSE
// =============================================================================

/// A single form value: number or text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(i64),
    Text(String),
}

impl FieldValue {
    fn as_text(&self) -> String {
        match self {
            FieldValue::Number(n) => n.to_string(),
            FieldValue::Text(s) => s.clone(),
        }
    }
}

/// Checklist answers, either 144 values in form order or a map of
/// `l{group}_q{item}` fields (missing fields count as 0).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponsesInput {
    Answers(Vec<i64>),
    Fields(BTreeMap<String, FieldValue>),
}

impl ResponsesInput {
    /// Validate into a checklist response.
    pub fn into_response(self) -> Result<ChecklistResponse, MaturogramError> {
        match self {
            ResponsesInput::Answers(answers) => ChecklistResponse::from_answers(&answers),
            ResponsesInput::Fields(fields) => {
                let text: Vec<(String, String)> = fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.as_text()))
                    .collect();
                ChecklistResponse::from_fields(text.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            }
        }
    }
}

/// Submit a full checklist for scoring and storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitRequest {
    pub age: i64,
    pub responses: ResponsesInput,
}

/// A stored record as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordJson {
    pub id: u64,
    pub age: i64,
    pub answers: Vec<u8>,
    pub totals: Vec<i64>,
    pub result: ResultJson,
}

impl From<&MaturityRecord> for RecordJson {
    fn from(record: &MaturityRecord) -> Self {
        Self {
            id: record.id.0,
            age: record.age,
            answers: record.responses.answers().to_vec(),
            totals: record.totals.to_vec(),
            result: ResultJson::from(&record.result),
        }
    }
}

/// Response carrying one record (submit, show, delete, undo).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordResponse {
    pub success: bool,
    pub record: Option<RecordJson>,
    pub error: Option<String>,
}

impl RecordResponse {
    pub fn success(record: &MaturityRecord) -> Self {
        Self {
            success: true,
            record: Some(RecordJson::from(record)),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            record: None,
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// STATUS RESPONSE
// =============================================================================

/// Archive status response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub record_count: usize,
    pub undo_depth: usize,
    pub persistent: bool,
    pub age_policy: String,
}

// =============================================================================
// RECORD LISTING
// =============================================================================

/// Query string of `GET /records`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordsParams {
    pub draw: u64,
    pub start: usize,
    pub length: Option<usize>,
    pub search: Option<String>,
    pub order_by: Option<String>,
    pub direction: Option<String>,
}

impl RecordsParams {
    /// Parse into a core listing query.
    pub fn to_query(&self) -> Result<RecordQuery, MaturogramError> {
        let order_by = match &self.order_by {
            Some(column) => column.parse::<SortColumn>()?,
            None => SortColumn::default(),
        };
        let direction = match &self.direction {
            Some(direction) => direction.parse::<SortDirection>()?,
            None => SortDirection::default(),
        };
        let query = RecordQuery {
            draw: self.draw,
            start: self.start,
            length: self.length,
            search: self.search.clone(),
            order_by,
            direction,
        };
        query.validate()?;
        Ok(query)
    }
}

/// One page of records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordsResponse {
    pub success: bool,
    pub draw: u64,
    pub records_total: usize,
    pub records_filtered: usize,
    pub data: Vec<RecordJson>,
    pub error: Option<String>,
}

impl RecordsResponse {
    pub fn error(draw: u64, msg: impl Into<String>) -> Self {
        Self {
            success: false,
            draw,
            records_total: 0,
            records_filtered: 0,
            data: Vec::new(),
            error: Some(msg.into()),
        }
    }
}

// =============================================================================
// EXPORT REQUEST/RESPONSE
// =============================================================================

/// Export options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportRequest {
    /// Use display labels instead of keys in the CSV header.
    pub labels: bool,
}

/// CSV export, base64 encoded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportResponse {
    pub success: bool,
    pub data: Option<String>, // Base64 encoded
    pub checksum: Option<u64>,
    pub blake3: Option<String>,
    pub record_count: usize,
    pub error: Option<String>,
}

impl ExportResponse {
    pub fn success(data: &[u8], checksum: u64, blake3: String, record_count: usize) -> Self {
        Self {
            success: true,
            data: Some(base64::Engine::encode(
                &base64::engine::general_purpose::STANDARD,
                data,
            )),
            checksum: Some(checksum),
            blake3: Some(blake3),
            record_count,
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            checksum: None,
            blake3: None,
            record_count: 0,
            error: Some(msg.into()),
        }
    }
}
