//! Index sink abstraction
//!
//! The pipeline hands the sink one batch of extracted documents and expects
//! a single commit covering all of them. Partial success is not modeled:
//! the commit either lands or the whole batch is reported failed at the
//! indexing stage.

mod http;

pub use http::HttpIndexSink;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::document::Document;

/// Acknowledgement of a batch commit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitReceipt {
    /// Number of documents the sink accepted
    pub accepted: usize,
}

/// Trait for index sinks
#[async_trait]
pub trait IndexSink: Send + Sync {
    /// Commit a batch of documents in one call
    ///
    /// Returns `Error::Commit` when the sink rejects the batch; the caller
    /// treats that as a failure of every document in it.
    async fn commit(&self, documents: &[Document]) -> Result<CommitReceipt>;

    /// Probe sink availability
    async fn health_check(&self) -> Result<()>;

    /// Sink name for logging
    fn name(&self) -> &str;
}
