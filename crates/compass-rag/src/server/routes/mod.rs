//! Routes for the web UI and JSON API

pub mod page;
pub mod query;

use axum::{
    routing::{get, post},
    Router,
};

use crate::server::state::AppState;

/// Build all UI and API routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(page::index))
        .route("/ask", post(page::ask))
        .route("/api/query", post(query::query))
}
