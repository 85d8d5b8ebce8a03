//! Review dashboard endpoint

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use pulse_common::review::{Review, DEFAULT_HEATMAP_CELLS};
use serde::Deserialize;

use super::ApiError;
use crate::AppState;

/// Largest accepted heatmap resolution
pub const MAX_HEATMAP_CELLS: usize = 50;

#[derive(Debug, Deserialize)]
pub struct ReviewParams {
    pub cells: Option<usize>,
}

/// GET /api/admin/review?cells=N
pub async fn get_review(
    State(state): State<AppState>,
    params: Result<Query<ReviewParams>, QueryRejection>,
) -> Result<Json<Review>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let cells = params
        .cells
        .unwrap_or(DEFAULT_HEATMAP_CELLS)
        .clamp(1, MAX_HEATMAP_CELLS);

    let submissions = state.store.list().await?;
    Ok(Json(Review::build(&submissions, cells)))
}
