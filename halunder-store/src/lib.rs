//! halunder-store library - Corpus Store service
//!
//! Authoritative store for the Halunder/German sentence-pair corpus. Serves
//! the full collection to review workbenches, accepts partial updates of
//! single pairs, and renders the parallel corpus as CSV.

use axum::Router;
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod db;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post, put};

    let api = Router::new()
        .route("/api/status", get(api::get_status))
        .route("/api/users", get(api::get_users))
        .route("/api/all-sentences", get(api::get_all_sentences))
        .route(
            "/api/sentences/:id",
            put(api::update_sentence).delete(api::delete_sentence),
        )
        .route("/api/texts", post(api::create_text))
        .route("/api/export", get(api::export_csv));

    Router::new()
        .merge(api)
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
