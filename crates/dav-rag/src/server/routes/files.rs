//! Remote store listing endpoints
//!
//! Thin pass-through to the remote store so clients can browse what is
//! available for ingestion without WebDAV credentials of their own.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::remote::RemoteEntry;
use crate::server::state::AppState;

/// Response for a directory listing
#[derive(Debug, Serialize, Deserialize)]
pub struct DirectoryListing {
    /// Requested directory, relative to the remote user root
    pub directory: String,
    /// Direct children of the directory
    pub entries: Vec<RemoteEntry>,
}

/// GET /files - List the remote user root
pub async fn list_root(State(state): State<AppState>) -> Result<Json<DirectoryListing>> {
    listing(state, String::new()).await
}

/// GET /files/*directory - List a remote directory
pub async fn list_directory(
    State(state): State<AppState>,
    Path(directory): Path<String>,
) -> Result<Json<DirectoryListing>> {
    listing(state, directory).await
}

async fn listing(state: AppState, directory: String) -> Result<Json<DirectoryListing>> {
    let entries = state.remote().list(&directory).await?;
    tracing::debug!(directory = %directory, entries = entries.len(), "Remote listing served");
    Ok(Json(DirectoryListing { directory, entries }))
}
