//! pulse-server library - HTTP surface for Residency Pulse
//!
//! Public routes capture submissions and serve the triad preview; admin
//! routes (list, delete, export, review) sit behind the shared-secret check.

use axum::Router;
use pulse_common::config::Roster;
use pulse_common::{Ingestor, SharedStore};
use tower_http::trace::TraceLayer;

pub mod api;
pub mod settings;

pub use api::auth::AdminSecret;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Store selected once at startup
    pub store: SharedStore,
    /// Validation + enrichment in front of the store
    pub ingestor: Ingestor,
    /// `None` leaves the admin routes unavailable
    pub admin_secret: Option<AdminSecret>,
}

impl AppState {
    pub fn new(store: SharedStore, roster: Roster, admin_password: Option<&str>) -> Self {
        Self {
            ingestor: Ingestor::new(store.clone(), roster),
            store,
            admin_secret: admin_password.map(AdminSecret::new),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::{get, post};

    // Admin routes (shared secret required)
    let admin = Router::new()
        .route(
            "/api/admin/submissions",
            get(api::list_submissions).delete(api::delete_submission),
        )
        .route("/api/admin/export.csv", get(api::export_csv))
        .route("/api/admin/review", get(api::get_review))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::admin_middleware,
        ));

    // Public routes
    let public = Router::new()
        .route("/api/submissions", post(api::create_submission))
        .route("/api/triad/weights", get(api::preview_weights))
        .route("/api/roster", get(api::get_roster))
        .merge(api::health_routes());

    Router::new()
        .merge(admin)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
