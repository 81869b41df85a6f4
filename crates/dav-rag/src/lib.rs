//! dav-rag: document ingestion backend for a RAG system
//!
//! Fetches files from a WebDAV file store, extracts text and metadata per
//! file type, filters against an ingestion ledger, commits the extracted
//! documents as one batch to an external vector-index sink, and records
//! per-file ingestion status. A thin axum layer exposes the pipeline over
//! HTTP.

pub mod config;
pub mod error;
pub mod extract;
pub mod pipeline;
pub mod remote;
pub mod server;
pub mod sink;
pub mod tracker;
pub mod types;

pub use config::IngestConfig;
pub use error::{Error, Result};
pub use pipeline::IngestOrchestrator;
pub use types::{
    batch::{BatchResult, IngestFailure, IngestRequest, Stage},
    document::{Document, FileType},
    record::{IngestStatus, IngestionRecord},
};
