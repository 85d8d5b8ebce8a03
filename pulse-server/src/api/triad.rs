//! Capture-form helpers: live triad preview and roster

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use pulse_common::submission::{IDENTITY_TRIAD_LABELS, SLIDER_LABELS, VALUE_TRIAD_LABELS};
use pulse_common::triad::{self, Point, TriangleGeometry};
use serde::{Deserialize, Serialize};

use super::ApiError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct PreviewParams {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub weights: [f64; 3],
    pub percentages: [u32; 3],
    pub inside: bool,
}

/// GET /api/triad/weights?x=&y=
pub async fn preview_weights(
    params: Result<Query<PreviewParams>, QueryRejection>,
) -> Result<Json<PreviewResponse>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let point = Point::new(params.x, params.y);
    let geometry = TriangleGeometry::standard();
    let weights = triad::weights(point, &geometry);

    Ok(Json(PreviewResponse {
        weights: weights.as_array(),
        percentages: weights.percentages(),
        inside: triad::contains(point, &geometry),
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterResponse {
    pub names: Vec<String>,
    pub value_triad_labels: [&'static str; 3],
    pub identity_triad_labels: [&'static str; 3],
    pub slider_labels: [&'static str; 2],
    pub geometry: TriangleGeometry,
}

/// GET /api/roster
pub async fn get_roster(State(state): State<AppState>) -> Json<RosterResponse> {
    Json(RosterResponse {
        names: state.ingestor.roster().names().to_vec(),
        value_triad_labels: VALUE_TRIAD_LABELS,
        identity_triad_labels: IDENTITY_TRIAD_LABELS,
        slider_labels: SLIDER_LABELS,
        geometry: TriangleGeometry::standard(),
    })
}
