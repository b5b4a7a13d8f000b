//! # Authentication Module
//!
//! Admin key authentication for the record management endpoints.
//!
//! ## Configuration
//!
//! - `MATUROGRAM_ADMIN_KEY`: if set, admin routes (`/status`, `/records*`,
//!   `/export`) require it. Public routes (`/health`, `/checklist`,
//!   `/score`, `/submit`) never do.
//!
//! ## Usage
//!
//! ```text
//! Authorization: Bearer <admin-key>
//! ```

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    middleware::Next,
    response::Response,
};
use subtle::ConstantTimeEq;

pub const ADMIN_KEY_ENV: &str = "MATUROGRAM_ADMIN_KEY";

/// Get the admin key from the environment.
///
/// Returns `None` if unset or empty, which leaves admin routes open.
pub fn get_admin_key_from_env() -> Option<String> {
    std::env::var(ADMIN_KEY_ENV).ok().filter(|k| !k.is_empty())
}

/// Compare a presented key with the expected one in constant time.
///
/// Both sides are padded to the same length so the comparison always
/// covers the same number of bytes.
pub fn keys_match(provided: &str, expected: &str) -> bool {
    let provided_bytes = provided.as_bytes();
    let expected_bytes = expected.as_bytes();

    let max_len = provided_bytes.len().max(expected_bytes.len());
    let mut padded_provided = vec![0u8; max_len];
    let mut padded_expected = vec![0u8; max_len];
    padded_provided[..provided_bytes.len()].copy_from_slice(provided_bytes);
    padded_expected[..expected_bytes.len()].copy_from_slice(expected_bytes);

    let bytes_match: bool = padded_provided.ct_eq(&padded_expected).into();
    bytes_match && provided_bytes.len() == expected_bytes.len()
}

/// Admin key middleware. Applied only to the admin routes.
pub async fn admin_key_auth_middleware(
    request: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, &'static str)> {
    let Some(expected) = get_admin_key_from_env() else {
        return Ok(next.run(request).await);
    };

    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let Some(header_value) = auth_header else {
        tracing::warn!(
            event = "auth_failure",
            reason = "missing_authorization_header",
            path = %request.uri().path(),
            "Missing Authorization header"
        );
        return Err((StatusCode::UNAUTHORIZED, "Unauthorized"));
    };

    let provided = header_value.strip_prefix("Bearer ").unwrap_or(header_value);
    if keys_match(provided, &expected) {
        Ok(next.run(request).await)
    } else {
        tracing::warn!(
            event = "auth_failure",
            reason = "invalid_admin_key",
            path = %request.uri().path(),
            "Authentication failed: invalid admin key"
        );
        Err((StatusCode::UNAUTHORIZED, "Unauthorized"))
    }
}
