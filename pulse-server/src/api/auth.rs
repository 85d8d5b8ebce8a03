//! Admin shared-secret middleware
//!
//! Admin requests carry the shared secret in the `x-admin-password` header.
//! The configured secret is kept only as a SHA-256 digest and candidates are
//! compared digest to digest.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::AppState;

/// Header carrying the admin secret
pub const ADMIN_HEADER: &str = "x-admin-password";

/// Digest of the configured admin secret
#[derive(Clone)]
pub struct AdminSecret {
    digest: [u8; 32],
}

impl AdminSecret {
    pub fn new(secret: &str) -> Self {
        Self {
            digest: Sha256::digest(secret.as_bytes()).into(),
        }
    }

    pub fn verify(&self, candidate: &str) -> bool {
        let candidate: [u8; 32] = Sha256::digest(candidate.as_bytes()).into();
        // Fold over every byte rather than short-circuiting on the first mismatch
        candidate
            .iter()
            .zip(self.digest.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}

impl std::fmt::Debug for AdminSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AdminSecret(<redacted>)")
    }
}

/// Admin middleware
///
/// Applied to the admin routes only. Returns 503 when no secret is configured
/// and 401 when the header is missing or wrong.
pub async fn admin_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let Some(secret) = &state.admin_secret else {
        return Err(AuthError::NotConfigured);
    };

    let provided = request
        .headers()
        .get(ADMIN_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingSecret)?;

    if !secret.verify(provided) {
        warn!(path = %request.uri().path(), "Rejected admin request with wrong secret");
        return Err(AuthError::InvalidSecret);
    }

    Ok(next.run(request).await)
}

/// Authentication error types for HTTP responses
#[derive(Debug)]
pub enum AuthError {
    NotConfigured,
    MissingSecret,
    InvalidSecret,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::NotConfigured => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Admin access is not configured",
            ),
            AuthError::MissingSecret => (StatusCode::UNAUTHORIZED, "Missing admin password"),
            AuthError::InvalidSecret => (StatusCode::UNAUTHORIZED, "Invalid password"),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
