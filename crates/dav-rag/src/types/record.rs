//! Ingestion ledger record types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Terminal ingestion status of a filename
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IngestStatus {
    /// Ingestion in flight; not yet committed. The pipeline itself only
    /// writes terminal states after the index commit resolves; this state
    /// exists for external ledger writers that stage records up front.
    Pending,
    /// Committed to the index sink
    Processed,
    /// Ingestion terminated with a failure
    Failed,
}

/// One ledger entry, keyed uniquely by filename
///
/// Later records overwrite earlier ones for the same filename; there is no
/// versioning. Written only after the index commit resolves, never before.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionRecord {
    /// Remote filename
    pub filename: String,
    /// Terminal status of the last ingestion attempt
    pub status: IngestStatus,
    /// When the record was last written
    pub last_ingested_at: DateTime<Utc>,
}

impl IngestionRecord {
    /// Create a record stamped with the current time
    pub fn new(filename: impl Into<String>, status: IngestStatus) -> Self {
        Self {
            filename: filename.into(),
            status,
            last_ingested_at: Utc::now(),
        }
    }

    /// Whether this record marks a completed ingestion
    pub fn is_processed(&self) -> bool {
        self.status == IngestStatus::Processed
    }
}
