//! Application state for the ingestion server

use parking_lot::RwLock;
use std::sync::Arc;

use crate::config::IngestConfig;
use crate::error::Result;
use crate::extract::ExtractorRegistry;
use crate::pipeline::IngestOrchestrator;
use crate::remote::{RemoteStore, WebdavStore};
use crate::sink::HttpIndexSink;
use crate::tracker::JsonLedger;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: IngestConfig,
    /// Remote file store, shared with the listing endpoint
    remote: Arc<dyn RemoteStore>,
    /// Batch ingestion pipeline
    orchestrator: IngestOrchestrator,
    /// Ready state
    ready: RwLock<bool>,
}

impl AppState {
    /// Create new application state, wiring the pipeline to its providers
    pub fn new(config: IngestConfig) -> Result<Self> {
        tracing::info!("Initializing ingestion state...");

        let remote: Arc<dyn RemoteStore> = Arc::new(WebdavStore::new(config.webdav.clone())?);
        tracing::info!("WebDAV store initialized");

        let sink = Arc::new(HttpIndexSink::new(config.sink.clone())?);
        tracing::info!(index = %config.sink.index_name, "Index sink initialized");

        let tracker = Arc::new(JsonLedger::open(&config.tracker.ledger_path)?);
        tracing::info!(path = %config.tracker.ledger_path.display(), "Ingestion ledger opened");

        let orchestrator = IngestOrchestrator::new(
            remote.clone(),
            sink,
            tracker,
            ExtractorRegistry::with_defaults(),
            config.pipeline.clone(),
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                remote,
                orchestrator,
                ready: RwLock::new(true),
            }),
        })
    }

    /// Get configuration
    pub fn config(&self) -> &IngestConfig {
        &self.inner.config
    }

    /// Get the remote file store
    pub fn remote(&self) -> &Arc<dyn RemoteStore> {
        &self.inner.remote
    }

    /// Get the ingestion pipeline
    pub fn orchestrator(&self) -> &IngestOrchestrator {
        &self.inner.orchestrator
    }

    /// Check if the server is ready
    pub fn is_ready(&self) -> bool {
        *self.inner.ready.read()
    }

    /// Set ready state
    pub fn set_ready(&self, ready: bool) {
        *self.inner.ready.write() = ready;
    }
}
