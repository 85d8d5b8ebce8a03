//! HTTP API handlers for pulse-server

pub mod auth;
pub mod export;
pub mod health;
pub mod review;
pub mod submissions;
pub mod triad;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pulse_common::error::StoreError;
use pulse_common::Error;
use serde_json::json;
use tracing::error;

pub use auth::admin_middleware;
pub use export::export_csv;
pub use health::health_routes;
pub use review::get_review;
pub use submissions::{create_submission, delete_submission, list_submissions};
pub use triad::{get_roster, preview_weights};

/// Handler error mapped onto the `{error, details?}` JSON body
#[derive(Debug)]
pub enum ApiError {
    /// Client sent something unusable (400)
    BadRequest(String),
    /// Backend failure (500)
    Store(StoreError),
    /// Anything else on the server side (500)
    Internal(String),
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::Validation(e) => ApiError::BadRequest(e.to_string()),
            Error::Store(e) => ApiError::Store(e),
            Error::Config(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Store(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            ApiError::Store(e) => {
                error!(error = %e, "Store operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "Failed to access submission store",
                        "details": e.to_string(),
                    })),
                )
                    .into_response()
            }
            ApiError::Internal(message) => {
                error!(error = %message, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error" })),
                )
                    .into_response()
            }
        }
    }
}
