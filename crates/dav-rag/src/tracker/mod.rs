//! Ingestion ledger
//!
//! The ledger answers one question for the pipeline: has this filename been
//! processed before? Records are keyed uniquely by filename and later writes
//! overwrite earlier ones. The pipeline writes records only after the index
//! commit resolves.

mod json_file;

pub use json_file::JsonLedger;

use async_trait::async_trait;

use crate::error::Result;
use crate::types::record::IngestionRecord;

/// Trait for ingestion ledgers
#[async_trait]
pub trait IngestionTracker: Send + Sync {
    /// Look up the record for a filename
    async fn get(&self, filename: &str) -> Result<Option<IngestionRecord>>;

    /// Insert or overwrite the record for its filename
    async fn put(&self, record: IngestionRecord) -> Result<()>;

    /// Whether the filename has a record with `Processed` status
    async fn is_ingested(&self, filename: &str) -> Result<bool> {
        Ok(self
            .get(filename)
            .await?
            .map(|record| record.is_processed())
            .unwrap_or(false))
    }

    /// Ledger name for logging
    fn name(&self) -> &str;
}
