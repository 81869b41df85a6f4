//! Batch orchestrator
//!
//! One `run` call per ingestion request. The stages are strictly ordered:
//! dedup, ledger filter, parallel downloads into a scoped temp dir,
//! sequential extraction, one index commit for the whole batch, ledger
//! updates, temp dir release. A failure of one file at any stage records a
//! `IngestFailure` and never aborts the rest of the batch; only temp dir
//! creation and ledger write faults fail the request as a whole.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::Semaphore;
use tokio::time::timeout;

use crate::config::{PipelineConfig, ReingestPolicy};
use crate::error::{Error, Result};
use crate::extract::ExtractorRegistry;
use crate::remote::RemoteStore;
use crate::sink::IndexSink;
use crate::tracker::IngestionTracker;
use crate::types::batch::{BatchResult, IngestFailure, IngestRequest, Stage};
use crate::types::document::Document;
use crate::types::record::{IngestStatus, IngestionRecord};

pub struct IngestOrchestrator {
    remote: Arc<dyn RemoteStore>,
    sink: Arc<dyn IndexSink>,
    tracker: Arc<dyn IngestionTracker>,
    extractors: ExtractorRegistry,
    config: PipelineConfig,
}

/// Outcome of one download slot, order-aligned with the filtered filenames
enum DownloadOutcome {
    Fetched(PathBuf),
    Failed(String),
}

impl IngestOrchestrator {
    pub fn new(
        remote: Arc<dyn RemoteStore>,
        sink: Arc<dyn IndexSink>,
        tracker: Arc<dyn IngestionTracker>,
        extractors: ExtractorRegistry,
        config: PipelineConfig,
    ) -> Self {
        Self {
            remote,
            sink,
            tracker,
            extractors,
            config,
        }
    }

    /// Run one ingestion batch to completion
    pub async fn run(&self, request: &IngestRequest) -> Result<BatchResult> {
        let requested = request.deduplicated();
        tracing::info!(files = requested.len(), "Ingestion batch started");

        let mut result = BatchResult {
            requested: requested.clone(),
            ..BatchResult::default()
        };

        // Ledger filter; under Skip, already-processed files never reach
        // the remote store.
        let mut pending = Vec::new();
        for name in requested {
            if self.config.reingest == ReingestPolicy::Skip
                && self.tracker.is_ingested(&name).await?
            {
                tracing::debug!(file = %name, "Skipped: already ingested");
                result
                    .failures
                    .push(IngestFailure::new(name, Stage::Tracker, "already ingested"));
            } else {
                pending.push(name);
            }
        }

        if pending.is_empty() {
            tracing::info!("Nothing to ingest after ledger filter");
            return Ok(result);
        }

        // Scoped workspace for this batch; creation failure fails the
        // request because nothing can be staged.
        let mut builder = tempfile::Builder::new();
        builder.prefix("ingest-");
        let workdir = match &self.config.workdir_root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        }
        .map_err(|e| Error::internal(format!("Failed to create batch workspace: {}", e)))?;

        let outcome = self.run_in_workdir(&mut result, pending, workdir.path()).await;

        // Explicit release; Drop is the backstop if this fails.
        if let Err(e) = workdir.close() {
            tracing::warn!("Batch workspace cleanup failed: {}", e);
        }

        outcome?;

        debug_assert!(result.is_complete(), "every requested file must land in a bucket");
        tracing::info!(
            indexed = result.indexed.len(),
            failed = result.failed_file_count(),
            "Ingestion batch finished"
        );
        Ok(result)
    }

    /// Download, extract and commit; the caller owns temp dir cleanup
    async fn run_in_workdir(
        &self,
        result: &mut BatchResult,
        pending: Vec<String>,
        workdir: &std::path::Path,
    ) -> Result<()> {
        let downloads = self.download_all(&pending, workdir).await;

        // Sequential extraction of whatever landed on disk
        let mut documents = Vec::new();
        for (name, outcome) in pending.into_iter().zip(downloads) {
            let path = match outcome {
                DownloadOutcome::Fetched(path) => path,
                DownloadOutcome::Failed(reason) => {
                    result
                        .failures
                        .push(IngestFailure::new(name, Stage::Download, reason));
                    continue;
                }
            };
            result.downloaded.push(name.clone());

            let data = match tokio::fs::read(&path).await {
                Ok(data) => data,
                Err(e) => {
                    result.failures.push(IngestFailure::new(
                        name,
                        Stage::Extract,
                        format!("Failed to read staged file: {}", e),
                    ));
                    continue;
                }
            };

            let document = self.extractors.extract(&name, &data);
            if document.extracted_ok {
                result.extracted.push(name);
                documents.push(document);
            } else {
                tracing::warn!(file = %name, reason = %document.text, "Extraction failed");
                result
                    .failures
                    .push(IngestFailure::new(name, Stage::Extract, document.text));
            }
        }

        self.commit_batch(result, documents).await
    }

    /// Fetch all pending files concurrently into the workspace
    ///
    /// Returned outcomes are order-aligned with `pending`. Each slot checks
    /// existence first so missing files report `not_found` instead of a
    /// transport error.
    async fn download_all(
        &self,
        pending: &[String],
        workdir: &std::path::Path,
    ) -> Vec<DownloadOutcome> {
        let semaphore = Arc::new(Semaphore::new(self.config.download_concurrency.max(1)));
        let per_file_timeout = Duration::from_secs(self.config.download_timeout_secs);

        let futures: Vec<_> = pending
            .iter()
            .enumerate()
            .map(|(slot, name)| {
                let remote = self.remote.clone();
                let semaphore = semaphore.clone();
                let name = name.clone();
                let target = workdir.join(staging_name(slot, &name));

                async move {
                    let _permit = match semaphore.acquire().await {
                        Ok(permit) => permit,
                        Err(_) => return DownloadOutcome::Failed("download pool closed".to_string()),
                    };

                    match timeout(per_file_timeout, fetch_to(remote, &name, &target)).await {
                        Ok(Ok(())) => DownloadOutcome::Fetched(target),
                        Ok(Err(reason)) => DownloadOutcome::Failed(reason),
                        Err(_) => {
                            tracing::warn!(file = %name, secs = per_file_timeout.as_secs(), "Download timed out");
                            DownloadOutcome::Failed("timeout".to_string())
                        }
                    }
                }
            })
            .collect();

        join_all(futures).await
    }

    /// Single commit for the whole batch, then ledger updates
    ///
    /// A commit error marks every contributing file failed at the indexing
    /// stage; ledger write faults propagate as request-level errors.
    async fn commit_batch(&self, result: &mut BatchResult, documents: Vec<Document>) -> Result<()> {
        if documents.is_empty() {
            tracing::info!("No documents extracted; skipping index commit");
            return Ok(());
        }

        match self.sink.commit(&documents).await {
            Ok(receipt) => {
                tracing::info!(accepted = receipt.accepted, sink = self.sink.name(), "Index commit succeeded");
                for document in &documents {
                    result.indexed.push(document.source_filename.clone());
                    self.tracker
                        .put(IngestionRecord::new(
                            document.source_filename.clone(),
                            IngestStatus::Processed,
                        ))
                        .await?;
                }
            }
            Err(e) => {
                let reason = e.to_string();
                tracing::error!(count = documents.len(), "Index commit failed: {}", reason);
                for document in &documents {
                    result.failures.push(IngestFailure::new(
                        document.source_filename.clone(),
                        Stage::Index,
                        reason.clone(),
                    ));
                    self.tracker
                        .put(IngestionRecord::new(
                            document.source_filename.clone(),
                            IngestStatus::Failed,
                        ))
                        .await?;
                }
            }
        }
        Ok(())
    }
}

/// Staging filename for one download slot
///
/// The slot prefix keeps staging paths unique: flattening path separators
/// alone would collide for names like `a/b.txt` and `a_b.txt`, and two
/// downloads racing on one path would swap file contents silently.
fn staging_name(slot: usize, name: &str) -> String {
    let base = name.rsplit('/').next().unwrap_or(name);
    format!("{}-{}", slot, base.replace(['\\', ':'], "_"))
}

/// Existence check, fetch, and write to the staging path
async fn fetch_to(
    remote: Arc<dyn RemoteStore>,
    name: &str,
    target: &std::path::Path,
) -> std::result::Result<(), String> {
    let handle = remote.exists(name).await.map_err(|e| e.to_string())?;
    if !handle.exists {
        return Err("not_found".to_string());
    }

    let bytes = remote.fetch(name).await.map_err(|e| e.to_string())?;
    tokio::fs::write(target, &bytes)
        .await
        .map_err(|e| format!("Failed to stage file: {}", e))?;

    tracing::debug!(file = %name, bytes = bytes.len(), "Downloaded");
    Ok(())
}
