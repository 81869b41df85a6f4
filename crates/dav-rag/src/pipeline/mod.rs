//! Batch ingestion pipeline
//!
//! Drives one request through download, extraction, a single index commit,
//! and ledger updates, isolating per-file failures so a batch always
//! produces a complete `BatchResult`.

mod orchestrator;

pub use orchestrator::IngestOrchestrator;
