//! Batch ingestion endpoint

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::batch::{BatchResult, IngestRequest};

/// Response for a processed batch
#[derive(Debug, Serialize, Deserialize)]
pub struct IngestResponse {
    /// Human-readable summary
    pub message: String,
    /// Full batch result with per-file failures
    pub data: BatchResult,
}

/// POST /api/ingest/process-files - Ingest a list of remote files
///
/// The request body names files on the remote store; the response always
/// carries a complete `BatchResult`, per-file failures included. Only
/// request-level faults (workspace creation, ledger writes) surface as
/// HTTP errors.
pub async fn process_files(
    State(state): State<AppState>,
    Json(request): Json<IngestRequest>,
) -> Result<Json<IngestResponse>> {
    tracing::info!(files = request.filenames.len(), "Ingestion request received");

    let result = state.orchestrator().run(&request).await?;

    let message = format!(
        "Processed {} files: {} indexed, {} failed",
        result.requested.len(),
        result.indexed.len(),
        result.failed_file_count()
    );

    Ok(Json(IngestResponse { message, data: result }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_serializes_with_message_and_data() {
        let response = IngestResponse {
            message: "Processed 0 files: 0 indexed, 0 failed".to_string(),
            data: BatchResult::default(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json["message"].is_string());
        assert!(json["data"]["failures"].is_array());
        assert!(json["data"]["indexed"].is_array());
    }
}
