//! Integration tests for the Maturogram HTTP API.
//!
//! Uses axum-test to exercise the router without binding a socket.

// Auth tests hold a MutexGuard across awaits; they are serialized on
// purpose because they modify env vars.
#![allow(clippy::unwrap_used, clippy::panic, clippy::await_holding_lock)]

use axum::http::{HeaderValue, StatusCode, header};
use axum_test::TestServer;
use base64::Engine;
use maturogram::api::{
    AppState, ExportResponse, HealthResponse, RecordResponse, RecordsResponse, SchemaResponse,
    ScoreResponse, StatusResponse, create_router,
};
use maturogram_core::{AgePolicy, Archive, ChecklistResponse, MaturityScorer, checksum};
use serde_json::json;
use std::sync::Mutex;

/// Serializes every test that builds a router, since the router reads env vars.
static AUTH_TEST_MUTEX: Mutex<()> = Mutex::new(());

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Holds the mutex and clears the admin key on drop.
struct TestGuard {
    _guard: std::sync::MutexGuard<'static, ()>,
}

impl Drop for TestGuard {
    fn drop(&mut self) {
        // SAFETY: Tests run sequentially under AUTH_TEST_MUTEX, so no concurrent env access.
        unsafe { std::env::remove_var("MATUROGRAM_ADMIN_KEY") };
    }
}

fn lock() -> TestGuard {
    let guard = AUTH_TEST_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    // SAFETY: Tests run sequentially under AUTH_TEST_MUTEX, so no concurrent env access.
    unsafe {
        std::env::remove_var("MATUROGRAM_ADMIN_KEY");
        std::env::set_var("MATUROGRAM_RATE_LIMIT", "0");
    }
    TestGuard { _guard: guard }
}

fn server_for(archive: Archive) -> TestServer {
    TestServer::new(create_router(AppState::new(archive))).unwrap()
}

/// A fresh in-memory server with no admin key.
fn create_test_server() -> (TestServer, TestGuard) {
    let guard = lock();
    (server_for(Archive::new()), guard)
}

/// 144 answers with group `group` (1-based) answered 1 across the board.
fn answers_peaking_at(group: usize) -> Vec<i64> {
    let mut answers = vec![0i64; 144];
    let start = (group - 1) * 6;
    answers[start..start + 6].copy_from_slice(&[1; 6]);
    answers
}

/// Server holding records for ages 30, 5, 72 and 18 (ids 1..=4).
fn create_populated_test_server() -> (TestServer, TestGuard) {
    let guard = lock();
    let mut archive = Archive::new();
    for age in [30, 5, 72, 18] {
        archive.submit(age, ChecklistResponse::empty()).unwrap();
    }
    (server_for(archive), guard)
}

fn totals_with_peak(idx: usize, value: i64) -> Vec<i64> {
    let mut totals = vec![0i64; 24];
    totals[idx] = value;
    totals
}

// =============================================================================
// PUBLIC ENDPOINTS
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let (server, _guard) = create_test_server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let health: HealthResponse = response.json();
    assert_eq!(health.status, "ok");
    assert_eq!(health.version, env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_checklist_lists_all_items() {
    let (server, _guard) = create_test_server();

    let response = server.get("/checklist").await;

    response.assert_status_ok();
    let schema: SchemaResponse = response.json();
    assert_eq!(schema.lustrums.len(), 24);
    assert_eq!(schema.item_count, 144);
    assert!(schema.lustrums.iter().all(|g| g.items.len() == 6));
    assert_eq!(schema.lustrums[0].items[0].key, "l1_q1");
    assert_eq!(schema.zones.len(), 5);
}

#[tokio::test]
async fn test_score_on_track() {
    let (server, _guard) = create_test_server();

    let response = server
        .post("/score")
        .json(&json!({ "age": 30, "totals": totals_with_peak(5, 6) }))
        .await;

    response.assert_status_ok();
    let body: ScoreResponse = response.json();
    assert!(body.success);
    let result = body.result.unwrap();
    assert_eq!(result.observed.value, 65);
    assert_eq!(result.predicted.value, 65);
    assert_eq!(result.percentage, "100.00");
    assert_eq!(result.percentage_hundredths, 10000);
    assert_eq!(result.zone, "Blue");
    assert_eq!(result.zone_label, "Blue Zone (Transcendent Maturity)");
}

#[tokio::test]
async fn test_score_rejects_wrong_length() {
    let (server, _guard) = create_test_server();

    let response = server
        .post("/score")
        .json(&json!({ "age": 30, "totals": [1, 2, 3] }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: ScoreResponse = response.json();
    assert!(!body.success);
    assert!(body.error.unwrap().contains("24"));
}

#[tokio::test]
async fn test_score_rejects_out_of_range_age() {
    let (server, _guard) = create_test_server();

    let response = server
        .post("/score")
        .json(&json!({ "age": 0, "totals": vec![0; 24] }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_score_legacy_policy_accepts_age_zero() {
    let guard = lock();
    let server = server_for(Archive::in_memory(
        MaturityScorer::with_policy(AgePolicy::Legacy),
        20,
    ));

    let response = server
        .post("/score")
        .json(&json!({ "age": 0, "totals": vec![0; 24] }))
        .await;
    drop(guard);

    response.assert_status_ok();
    let body: ScoreResponse = response.json();
    assert_eq!(body.result.unwrap().zone, "Red");
}

#[tokio::test]
async fn test_submit_answers_array() {
    let (server, _guard) = create_test_server();

    let response = server
        .post("/submit")
        .json(&json!({ "age": 30, "responses": answers_peaking_at(6) }))
        .await;

    response.assert_status_ok();
    let body: RecordResponse = response.json();
    let record = body.record.unwrap();
    assert_eq!(record.id, 1);
    assert_eq!(record.totals[5], 6);
    assert_eq!(record.answers.len(), 144);
    assert_eq!(record.result.zone, "Blue");
}

#[tokio::test]
async fn test_submit_form_fields() {
    let (server, _guard) = create_test_server();

    let response = server
        .post("/submit")
        .json(&json!({
            "age": 30,
            "responses": { "l6_q1": "3", "l6_q2": 3, "l1_q1": "" }
        }))
        .await;

    response.assert_status_ok();
    let record = response.json::<RecordResponse>().record.unwrap();
    assert_eq!(record.totals[5], 6);
    assert_eq!(record.totals[0], 0);
}

#[tokio::test]
async fn test_submit_rejects_bad_answers_and_stores_nothing() {
    let (server, _guard) = create_test_server();

    let bad_value = server
        .post("/submit")
        .json(&json!({ "age": 30, "responses": { "l1_q1": 9 } }))
        .await;
    assert_eq!(bad_value.status_code(), StatusCode::BAD_REQUEST);

    let bad_key = server
        .post("/submit")
        .json(&json!({ "age": 30, "responses": { "l25_q1": 1 } }))
        .await;
    assert_eq!(bad_key.status_code(), StatusCode::BAD_REQUEST);

    let bad_age = server
        .post("/submit")
        .json(&json!({ "age": 200, "responses": answers_peaking_at(1) }))
        .await;
    assert_eq!(bad_age.status_code(), StatusCode::BAD_REQUEST);

    let status: StatusResponse = server.get("/status").await.json();
    assert_eq!(status.record_count, 0);
}

// =============================================================================
// ADMIN ENDPOINTS
// =============================================================================

#[tokio::test]
async fn test_status_reports_counts() {
    let (server, _guard) = create_populated_test_server();

    let response = server.get("/status").await;

    response.assert_status_ok();
    let status: StatusResponse = response.json();
    assert_eq!(status.record_count, 4);
    assert_eq!(status.undo_depth, 0);
    assert!(!status.persistent);
    assert_eq!(status.age_policy, "strict");
}

#[tokio::test]
async fn test_records_default_listing() {
    let (server, _guard) = create_populated_test_server();

    let response = server.get("/records").await;

    response.assert_status_ok();
    let page: RecordsResponse = response.json();
    assert!(page.success);
    assert_eq!(page.records_total, 4);
    let ids: Vec<u64> = page.data.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn test_records_sorted_and_paged() {
    let (server, _guard) = create_populated_test_server();

    let response = server
        .get("/records?draw=3&order_by=age&direction=desc&start=1&length=2")
        .await;

    response.assert_status_ok();
    let page: RecordsResponse = response.json();
    assert_eq!(page.draw, 3);
    assert_eq!(page.records_filtered, 4);
    let ages: Vec<i64> = page.data.iter().map(|r| r.age).collect();
    assert_eq!(ages, vec![30, 18]);
}

#[tokio::test]
async fn test_records_search() {
    let (server, _guard) = create_populated_test_server();

    let response = server.get("/records?search=72").await;

    response.assert_status_ok();
    let page: RecordsResponse = response.json();
    assert_eq!(page.records_total, 4);
    assert_eq!(page.records_filtered, 1);
    assert_eq!(page.data[0].age, 72);
}

#[tokio::test]
async fn test_records_rejects_unknown_sort_column() {
    let (server, _guard) = create_populated_test_server();

    let response = server.get("/records?order_by=height").await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let page: RecordsResponse = response.json();
    assert!(!page.success);
}

#[tokio::test]
async fn test_get_record() {
    let (server, _guard) = create_populated_test_server();

    let found = server.get("/records/3").await;
    found.assert_status_ok();
    assert_eq!(found.json::<RecordResponse>().record.unwrap().age, 72);

    let missing = server.get("/records/99").await;
    assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_and_undo() {
    let (server, _guard) = create_populated_test_server();

    let deleted = server.delete("/records/2").await;
    deleted.assert_status_ok();
    assert_eq!(server.get("/records/2").await.status_code(), StatusCode::NOT_FOUND);

    let restored = server.post("/records/undo").await;
    restored.assert_status_ok();
    assert_eq!(restored.json::<RecordResponse>().record.unwrap().id, 2);
    server.get("/records/2").await.assert_status_ok();

    let nothing = server.post("/records/undo").await;
    assert_eq!(nothing.status_code(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_delete_missing_record() {
    let (server, _guard) = create_test_server();

    let response = server.delete("/records/5").await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_export_csv_with_checksum() {
    let (server, _guard) = create_populated_test_server();

    let response = server.post("/export").await;

    response.assert_status_ok();
    let export: ExportResponse = response.json();
    assert!(export.success);
    assert_eq!(export.record_count, 4);

    let data = base64::engine::general_purpose::STANDARD
        .decode(export.data.unwrap())
        .unwrap();
    assert_eq!(export.checksum, Some(checksum(&data)));
    assert_eq!(export.blake3.unwrap().len(), 64);

    let text = String::from_utf8(data).unwrap();
    assert!(text.starts_with("id,age,l1_q1,"));
    assert_eq!(text.lines().count(), 5);
}

#[tokio::test]
async fn test_export_with_labels() {
    let (server, _guard) = create_populated_test_server();

    let response = server.post("/export").json(&json!({ "labels": true })).await;

    response.assert_status_ok();
    let export: ExportResponse = response.json();
    let data = base64::engine::general_purpose::STANDARD
        .decode(export.data.unwrap())
        .unwrap();
    assert!(String::from_utf8(data).unwrap().starts_with("S/N,Age,"));
}

// =============================================================================
// AUTHENTICATION
// =============================================================================

fn create_auth_test_server(admin_key: &str) -> (TestServer, TestGuard) {
    let guard = lock();
    // SAFETY: Tests run sequentially under AUTH_TEST_MUTEX, so no concurrent env access.
    unsafe { std::env::set_var("MATUROGRAM_ADMIN_KEY", admin_key) };
    (server_for(Archive::new()), guard)
}

#[tokio::test]
async fn test_auth_admin_routes_require_key() {
    let (server, _guard) = create_auth_test_server("correct-key");

    let missing = server.get("/records").await;
    assert_eq!(missing.status_code(), StatusCode::UNAUTHORIZED);

    let wrong = server
        .get("/status")
        .add_header(
            header::AUTHORIZATION,
            "Bearer wrong-key".parse::<HeaderValue>().unwrap(),
        )
        .await;
    assert_eq!(wrong.status_code(), StatusCode::UNAUTHORIZED);

    let delete = server.delete("/records/1").await;
    assert_eq!(delete.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_valid_bearer_token() {
    let (server, _guard) = create_auth_test_server("test-secret-key-12345");

    let response = server
        .get("/status")
        .add_header(
            header::AUTHORIZATION,
            "Bearer test-secret-key-12345".parse::<HeaderValue>().unwrap(),
        )
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<StatusResponse>().record_count, 0);
}

#[tokio::test]
async fn test_auth_public_routes_stay_open() {
    let (server, _guard) = create_auth_test_server("correct-key");

    server.get("/health").await.assert_status_ok();
    server.get("/checklist").await.assert_status_ok();
    server
        .post("/submit")
        .json(&json!({ "age": 30, "responses": answers_peaking_at(6) }))
        .await
        .assert_status_ok();
}

// =============================================================================
// REQUEST VALIDATION
// =============================================================================

#[tokio::test]
async fn test_malformed_json_is_client_error() {
    let (server, _guard) = create_test_server();

    let response = server
        .post("/score")
        .text("{not json")
        .content_type("application/json")
        .await;

    assert!(response.status_code().is_client_error());
}

#[tokio::test]
async fn test_wrong_method_is_405() {
    let (server, _guard) = create_test_server();

    let response = server.get("/score").await;

    assert_eq!(response.status_code().as_u16(), 405);
}
