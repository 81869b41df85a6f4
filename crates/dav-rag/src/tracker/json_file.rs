//! JSON-file-backed ingestion ledger
//!
//! Records live in a `DashMap` and are flushed to a JSON file after every
//! write. The flush goes through a sibling temp file plus rename so a crash
//! mid-write never truncates the ledger. Suited to single-instance
//! deployments; a shared database belongs behind the same trait.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;

use super::IngestionTracker;
use crate::error::{Error, Result};
use crate::types::record::IngestionRecord;

pub struct JsonLedger {
    path: PathBuf,
    records: DashMap<String, IngestionRecord>,
    // Serializes flushes; concurrent puts must not interleave temp writes.
    flush_lock: Mutex<()>,
}

impl JsonLedger {
    /// Open a ledger file, creating parent directories as needed
    ///
    /// A missing file is an empty ledger; a present but unreadable file is
    /// an error rather than a silent reset.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Tracker(format!("Failed to create ledger dir: {}", e)))?;
        }

        let records = DashMap::new();
        if path.exists() {
            let raw = std::fs::read_to_string(&path)
                .map_err(|e| Error::Tracker(format!("Failed to read ledger: {}", e)))?;
            let loaded: Vec<IngestionRecord> = serde_json::from_str(&raw)
                .map_err(|e| Error::Tracker(format!("Ledger file is corrupt: {}", e)))?;
            for record in loaded {
                records.insert(record.filename.clone(), record);
            }
        }

        tracing::debug!(path = %path.display(), entries = records.len(), "Ledger opened");
        Ok(Self {
            path,
            records,
            flush_lock: Mutex::new(()),
        })
    }

    /// Number of records currently held
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn flush(&self) -> Result<()> {
        let _guard = self.flush_lock.lock();

        let mut snapshot: Vec<IngestionRecord> = self
            .records
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        snapshot.sort_by(|a, b| a.filename.cmp(&b.filename));

        let json = serde_json::to_string_pretty(&snapshot)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)
            .map_err(|e| Error::Tracker(format!("Failed to write ledger: {}", e)))?;
        std::fs::rename(&tmp, &self.path)
            .map_err(|e| Error::Tracker(format!("Failed to replace ledger: {}", e)))?;
        Ok(())
    }
}

#[async_trait]
impl IngestionTracker for JsonLedger {
    async fn get(&self, filename: &str) -> Result<Option<IngestionRecord>> {
        Ok(self.records.get(filename).map(|entry| entry.value().clone()))
    }

    async fn put(&self, record: IngestionRecord) -> Result<()> {
        self.records.insert(record.filename.clone(), record);
        self.flush()
    }

    fn name(&self) -> &str {
        "json-ledger"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::record::IngestStatus;

    #[tokio::test]
    async fn put_then_get_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = JsonLedger::open(dir.path().join("ledger.json")).unwrap();

        ledger
            .put(IngestionRecord::new("report.pdf", IngestStatus::Processed))
            .await
            .unwrap();

        let record = ledger.get("report.pdf").await.unwrap().unwrap();
        assert!(record.is_processed());
        assert!(ledger.is_ingested("report.pdf").await.unwrap());
        assert!(!ledger.is_ingested("missing.pdf").await.unwrap());
    }

    #[tokio::test]
    async fn later_writes_overwrite_earlier_ones() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = JsonLedger::open(dir.path().join("ledger.json")).unwrap();

        ledger
            .put(IngestionRecord::new("a.txt", IngestStatus::Failed))
            .await
            .unwrap();
        ledger
            .put(IngestionRecord::new("a.txt", IngestStatus::Processed))
            .await
            .unwrap();

        assert_eq!(ledger.len(), 1);
        assert!(ledger.is_ingested("a.txt").await.unwrap());
    }

    #[tokio::test]
    async fn records_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");

        {
            let ledger = JsonLedger::open(&path).unwrap();
            ledger
                .put(IngestionRecord::new("kept.docx", IngestStatus::Processed))
                .await
                .unwrap();
            ledger
                .put(IngestionRecord::new("broken.pdf", IngestStatus::Failed))
                .await
                .unwrap();
        }

        let reopened = JsonLedger::open(&path).unwrap();
        assert_eq!(reopened.len(), 2);
        assert!(reopened.is_ingested("kept.docx").await.unwrap());
        assert!(!reopened.is_ingested("broken.pdf").await.unwrap());
    }

    #[test]
    fn corrupt_ledger_file_is_an_error_not_a_reset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        std::fs::write(&path, "{not json").unwrap();

        assert!(JsonLedger::open(&path).is_err());
    }
}
