//! # Maturogram HTTP API Module
//!
//! This module implements the HTTP REST API server using axum.
//!
//! ## Public Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /checklist` - The 144-item questionnaire and zone labels
//! - `POST /score` - Score 24 lustrum totals (nothing stored)
//! - `POST /submit` - Score and store a full checklist
//!
//! ## Admin Endpoints
//!
//! - `GET /status` - Record count, undo depth, backend
//! - `GET /records` - Paged, searchable, sortable listing
//! - `GET /records/{id}` - One record
//! - `DELETE /records/{id}` - Delete a record
//! - `POST /records/undo` - Restore the most recent deletion
//! - `POST /export` - CSV export (base64) with checksum
//!
//! ## Security Configuration (Environment Variables)
//!
//! - `MATUROGRAM_CORS_ORIGINS`: Comma-separated list of allowed origins, or "*" for all (default: localhost only)
//! - `MATUROGRAM_RATE_LIMIT`: Requests per second (default: 100, 0 to disable)
//! - `MATUROGRAM_ADMIN_KEY`: If set, admin endpoints require a Bearer token

mod auth;
mod handlers;
mod middleware;
mod types;

pub use auth::{ADMIN_KEY_ENV, get_admin_key_from_env, keys_match};
pub use handlers::status_for;
pub use middleware::{RATE_LIMIT_ENV, create_rate_limiter, get_rate_limit_from_env};
pub use types::{
    ExportRequest, ExportResponse, FieldValue, HealthResponse, ItemJson, LustrumJson,
    RecordJson, RecordResponse, RecordsParams, RecordsResponse, ResponsesInput, ResultJson,
    SchemaResponse, ScoreRequest, ScoreResponse, StatusResponse, SubmitRequest, ZoneJson,
};

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{get, post},
};
use maturogram_core::{Archive, MaturogramError};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub const CORS_ORIGINS_ENV: &str = "MATUROGRAM_CORS_ORIGINS";

/// Request body limit (2 MiB).
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state: one archive, many readers, one writer.
#[derive(Clone)]
pub struct AppState {
    pub archive: Arc<RwLock<Archive>>,
}

impl AppState {
    #[must_use]
    pub fn new(archive: Archive) -> Self {
        Self {
            archive: Arc::new(RwLock::new(archive)),
        }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

/// Build the CORS layer from `MATUROGRAM_CORS_ORIGINS`.
///
/// - `*`: any origin (development only)
/// - unset or no valid entries: localhost only
/// - otherwise: the listed origins
fn build_cors_layer() -> CorsLayer {
    let origins_env = std::env::var(CORS_ORIGINS_ENV).ok();

    match origins_env.as_deref() {
        Some("*") => {
            tracing::warn!(
                "CORS: Allowing ALL origins ({}=*). This is insecure for production!",
                CORS_ORIGINS_ENV
            );
            CorsLayer::permissive()
        }
        Some(origins) => {
            let allowed_origins: Vec<HeaderValue> = origins
                .split(',')
                .filter_map(|s| {
                    let trimmed = s.trim();
                    match trimmed.parse::<HeaderValue>() {
                        Ok(hv) => {
                            tracing::info!("CORS: Allowing origin: {}", trimmed);
                            Some(hv)
                        }
                        Err(e) => {
                            tracing::warn!("CORS: Invalid origin '{}': {}", trimmed, e);
                            None
                        }
                    }
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::warn!(
                    "CORS: No valid origins in {}, defaulting to localhost only",
                    CORS_ORIGINS_ENV
                );
                build_localhost_cors()
            } else {
                restricted_cors(allowed_origins)
            }
        }
        None => {
            tracing::info!(
                "CORS: No {} set, defaulting to localhost only",
                CORS_ORIGINS_ENV
            );
            build_localhost_cors()
        }
    }
}

fn restricted_cors(origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

fn build_localhost_cors() -> CorsLayer {
    let origins: Vec<HeaderValue> = [
        "http://localhost:3000",
        "http://localhost:8080",
        "http://127.0.0.1:3000",
        "http://127.0.0.1:8080",
    ]
    .iter()
    .filter_map(|o| o.parse::<HeaderValue>().ok())
    .collect();

    restricted_cors(origins)
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing
/// 2. CORS
/// 3. Body limit
/// 4. Rate limiting (if enabled)
/// 5. Admin authentication (admin routes only, if configured)
pub fn create_router(state: AppState) -> Router {
    let cors = build_cors_layer();

    let rate_limit = get_rate_limit_from_env();
    let rate_limiter = if rate_limit > 0 {
        tracing::info!("Rate limiting enabled: {} requests/second", rate_limit);
        Some(create_rate_limiter(rate_limit))
    } else {
        tracing::info!("Rate limiting disabled");
        None
    };

    let has_auth = get_admin_key_from_env().is_some();
    if has_auth {
        tracing::info!("Admin key authentication enabled");
    } else {
        tracing::warn!(
            "Admin key authentication DISABLED - record management is publicly accessible! \
             Set {} to protect it.",
            ADMIN_KEY_ENV
        );
    }

    let public = Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/checklist", get(handlers::checklist_handler))
        .route("/score", post(handlers::score_handler))
        .route("/submit", post(handlers::submit_handler));

    let mut admin = Router::new()
        .route("/status", get(handlers::status_handler))
        .route("/records", get(handlers::list_records_handler))
        .route("/records/undo", post(handlers::undo_delete_handler))
        .route(
            "/records/{id}",
            get(handlers::get_record_handler).delete(handlers::delete_record_handler),
        )
        .route("/export", post(handlers::export_handler));

    if has_auth {
        admin = admin.route_layer(axum_middleware::from_fn(
            auth::admin_key_auth_middleware,
        ));
    }

    let mut router = public.merge(admin);

    if let Some(limiter) = rate_limiter {
        router = router.layer(axum_middleware::from_fn_with_state(
            limiter,
            middleware::rate_limit_middleware,
        ));
    }

    router
        .layer(axum::extract::DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Bind and serve until Ctrl+C.
pub async fn run_server(addr: &str, archive: Archive) -> Result<(), MaturogramError> {
    let router = create_router(AppState::new(archive));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| MaturogramError::IoError(format!("Bind failed: {}", e)))?;

    tracing::info!("Maturogram HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| MaturogramError::IoError(format!("Server error: {}", e)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

// =============================================================================
// TESTS
// =============================================================================
