//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.

use super::{
    AppState,
    types::{
        ExportRequest, ExportResponse, HealthResponse, RecordJson, RecordResponse, RecordsParams,
        RecordsResponse, SchemaResponse, ScoreRequest, ScoreResponse, StatusResponse,
        SubmitRequest,
    },
};
use axum::{
    Json,
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use maturogram_core::{HeaderStyle, MaturogramError, RecordId, compute_blake3_hash};

// =============================================================================
// ERROR MAPPING
// =============================================================================

/// HTTP status for a core error.
pub fn status_for(error: &MaturogramError) -> StatusCode {
    match error {
        MaturogramError::InvalidInput(_)
        | MaturogramError::DivisionByZero
        | MaturogramError::InvalidResult(_) => StatusCode::BAD_REQUEST,
        MaturogramError::RecordNotFound(_) => StatusCode::NOT_FOUND,
        MaturogramError::NothingToUndo => StatusCode::CONFLICT,
        MaturogramError::SerializationError(_)
        | MaturogramError::DeserializationError(_)
        | MaturogramError::IoError(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

// =============================================================================
// PUBLIC HANDLERS
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

/// The questionnaire.
pub async fn checklist_handler() -> impl IntoResponse {
    Json(SchemaResponse::build())
}

/// Score precomputed totals. Nothing is stored.
pub async fn score_handler(
    State(state): State<AppState>,
    Json(request): Json<ScoreRequest>,
) -> impl IntoResponse {
    let archive = state.archive.read().await;
    match archive.evaluate(request.age, &request.totals) {
        Ok(result) => (StatusCode::OK, Json(ScoreResponse::success(&result))),
        Err(e) => (status_for(&e), Json(ScoreResponse::error(e.to_string()))),
    }
}

/// Score and store a full checklist.
pub async fn submit_handler(
    State(state): State<AppState>,
    Json(request): Json<SubmitRequest>,
) -> impl IntoResponse {
    let responses = match request.responses.into_response() {
        Ok(r) => r,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(RecordResponse::error(format!("Invalid responses: {}", e))),
            );
        }
    };

    let mut archive = state.archive.write().await;
    match archive.submit(request.age, responses) {
        Ok(record) => {
            tracing::info!(
                event = "record_submitted",
                id = record.id.0,
                zone = ?record.result.zone,
                "Checklist submitted"
            );
            (StatusCode::OK, Json(RecordResponse::success(&record)))
        }
        Err(e) => (status_for(&e), Json(RecordResponse::error(e.to_string()))),
    }
}

// =============================================================================
// ADMIN HANDLERS
// =============================================================================

/// Archive status.
pub async fn status_handler(State(state): State<AppState>) -> impl IntoResponse {
    let archive = state.archive.read().await;
    let counts = archive
        .record_count()
        .and_then(|records| Ok((records, archive.undo_depth()?)));

    match counts {
        Ok((record_count, undo_depth)) => {
            let response = StatusResponse {
                record_count,
                undo_depth,
                persistent: archive.is_persistent(),
                age_policy: archive.age_policy().as_str().to_string(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            tracing::error!("Status failed: {}", e);
            (status_for(&e), e.to_string()).into_response()
        }
    }
}

/// Paged, searchable record listing.
pub async fn list_records_handler(
    State(state): State<AppState>,
    Query(params): Query<RecordsParams>,
) -> impl IntoResponse {
    let query = match params.to_query() {
        Ok(q) => q,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(RecordsResponse::error(params.draw, e.to_string())),
            );
        }
    };

    let archive = state.archive.read().await;
    match archive.query(&query) {
        Ok(page) => (
            StatusCode::OK,
            Json(RecordsResponse {
                success: true,
                draw: page.draw,
                records_total: page.records_total,
                records_filtered: page.records_filtered,
                data: page.data.iter().map(RecordJson::from).collect(),
                error: None,
            }),
        ),
        Err(e) => (
            status_for(&e),
            Json(RecordsResponse::error(params.draw, e.to_string())),
        ),
    }
}

/// Fetch one record.
pub async fn get_record_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> impl IntoResponse {
    let archive = state.archive.read().await;
    match archive.get(RecordId(id)) {
        Ok(Some(record)) => (StatusCode::OK, Json(RecordResponse::success(&record))),
        Ok(None) => {
            let e = MaturogramError::RecordNotFound(RecordId(id));
            (status_for(&e), Json(RecordResponse::error(e.to_string())))
        }
        Err(e) => (status_for(&e), Json(RecordResponse::error(e.to_string()))),
    }
}

/// Delete one record. It can be restored with `POST /records/undo`.
pub async fn delete_record_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> impl IntoResponse {
    let mut archive = state.archive.write().await;
    match archive.delete(RecordId(id)) {
        Ok(record) => {
            tracing::info!(event = "record_deleted", id, "Record deleted");
            (StatusCode::OK, Json(RecordResponse::success(&record)))
        }
        Err(e) => (status_for(&e), Json(RecordResponse::error(e.to_string()))),
    }
}

/// Restore the most recently deleted record.
pub async fn undo_delete_handler(State(state): State<AppState>) -> impl IntoResponse {
    let mut archive = state.archive.write().await;
    match archive.undo_delete() {
        Ok(record) => {
            tracing::info!(event = "record_restored", id = record.id.0, "Record restored");
            (StatusCode::OK, Json(RecordResponse::success(&record)))
        }
        Err(e) => (status_for(&e), Json(RecordResponse::error(e.to_string()))),
    }
}

/// Export all records as base64 CSV.
pub async fn export_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> impl IntoResponse {
    // An empty body means default options.
    let request = if body.is_empty() {
        ExportRequest::default()
    } else {
        match serde_json::from_slice::<ExportRequest>(&body) {
            Ok(r) => r,
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ExportResponse::error(format!("Invalid export request: {}", e))),
                );
            }
        }
    };
    let style = if request.labels {
        HeaderStyle::Labels
    } else {
        HeaderStyle::Keys
    };

    let archive = state.archive.read().await;
    match archive.export_csv(style) {
        Ok(export) => {
            let bytes = export.data.as_bytes();
            (
                StatusCode::OK,
                Json(ExportResponse::success(
                    bytes,
                    export.checksum,
                    compute_blake3_hash(bytes),
                    export.record_count,
                )),
            )
        }
        Err(e) => (
            status_for(&e),
            Json(ExportResponse::error(format!("Export failed: {}", e))),
        ),
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_statuses() {
        assert_eq!(
            status_for(&MaturogramError::InvalidInput("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&MaturogramError::DivisionByZero),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&MaturogramError::RecordNotFound(RecordId(1))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&MaturogramError::NothingToUndo),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_for(&MaturogramError::IoError("disk".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
