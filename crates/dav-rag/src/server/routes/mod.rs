//! API routes for the ingestion server

pub mod files;
pub mod ingest;

use axum::{routing::post, Router};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes() -> Router<AppState> {
    Router::new().route("/ingest/process-files", post(ingest::process_files))
}
