//! CSV export endpoint

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use pulse_common::export;

use super::ApiError;
use crate::AppState;

/// GET /api/admin/export.csv
pub async fn export_csv(State(state): State<AppState>) -> Result<Response, ApiError> {
    let submissions = state.store.list().await?;
    let body = export::to_csv(&submissions);
    let filename = export::export_filename(chrono::Utc::now().date_naive());

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
        .into_response())
}
