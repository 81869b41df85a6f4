//! Core data types for the ingestion pipeline

pub mod batch;
pub mod document;
pub mod record;

pub use batch::{BatchResult, IngestFailure, IngestRequest, Stage};
pub use document::{Document, FileType};
pub use record::{IngestStatus, IngestionRecord};
