//! Submission endpoints
//!
//! POST is public; listing and deletion are mounted behind the admin
//! middleware.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use pulse_common::Submission;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use super::ApiError;
use crate::AppState;

/// POST /api/submissions
///
/// Body errors (not JSON, wrong content type) are answered like validation
/// failures so the client always gets `{error}`.
pub async fn create_submission(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(body) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let receipt = state.ingestor.ingest_json(body).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Submission saved successfully",
            "id": receipt.id,
        })),
    ))
}

/// GET /api/admin/submissions
///
/// Oldest first.
pub async fn list_submissions(
    State(state): State<AppState>,
) -> Result<Json<Vec<Submission>>, ApiError> {
    Ok(Json(state.store.list().await?))
}

#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    #[serde(default)]
    pub id: Option<String>,
}

/// DELETE /api/admin/submissions
///
/// Deleting an unknown id succeeds with `removed: false`.
pub async fn delete_submission(
    State(state): State<AppState>,
    payload: Result<Json<DeleteRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let id = request
        .id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing required field: id".to_string()))?;

    let removed = state.store.delete(&id).await?;
    info!(id = %id, removed, "Admin delete");

    Ok(Json(json!({
        "message": if removed { "Submission deleted" } else { "No submission with that id" },
        "id": id,
        "removed": removed,
    })))
}
