//! Batch request and result types

use serde::{Deserialize, Serialize};

/// One ingestion request: an ordered list of remote filenames
///
/// Duplicates are permitted on the wire and deduplicated (stable, first
/// occurrence preserved) before processing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestRequest {
    /// Filenames to ingest, relative to the remote user root
    pub filenames: Vec<String>,
}

impl IngestRequest {
    /// Create a request from anything yielding filename strings
    pub fn new<I, S>(filenames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            filenames: filenames.into_iter().map(Into::into).collect(),
        }
    }

    /// Deduplicated filenames, first occurrence order preserved
    pub fn deduplicated(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        self.filenames
            .iter()
            .filter(|name| seen.insert(name.as_str()))
            .cloned()
            .collect()
    }
}

/// Pipeline stage at which a file terminated unsuccessfully
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Existence check or download from the remote store
    Download,
    /// Text and metadata extraction
    Extract,
    /// Batch commit to the index sink
    #[serde(rename = "indexing")]
    Index,
    /// Filtered out by the ingestion ledger
    Tracker,
}

/// A single per-file failure entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestFailure {
    /// Remote filename
    pub filename: String,
    /// Stage at which the file terminated
    pub stage: Stage,
    /// Human-readable reason
    pub reason: String,
}

impl IngestFailure {
    pub fn new(filename: impl Into<String>, stage: Stage, reason: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            stage,
            reason: reason.into(),
        }
    }
}

/// Summary of one ingestion batch
///
/// The only object whose lifecycle spans a whole request. Invariant:
/// `indexed ⊆ extracted ⊆ downloaded ⊆ requested`, and every requested
/// filename appears in exactly one of `indexed` / `failures`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchResult {
    /// Requested filenames after deduplication
    pub requested: Vec<String>,
    /// Filenames successfully downloaded
    pub downloaded: Vec<String>,
    /// Filenames successfully extracted
    pub extracted: Vec<String>,
    /// Filenames committed to the index sink
    pub indexed: Vec<String>,
    /// Per-file failures with stage and reason
    pub failures: Vec<IngestFailure>,
}

impl BatchResult {
    /// Number of distinct filenames present in `failures`
    pub fn failed_file_count(&self) -> usize {
        let mut names: Vec<&str> = self.failures.iter().map(|f| f.filename.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        names.len()
    }

    /// Check the terminal-bucket invariant: every requested filename landed
    /// in exactly one of `indexed` / `failures`
    pub fn is_complete(&self) -> bool {
        self.requested.len() == self.indexed.len() + self.failed_file_count()
            && self
                .requested
                .iter()
                .all(|name| self.indexed.contains(name) != self.failures.iter().any(|f| &f.filename == name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedup_preserves_first_occurrence_order() {
        let request = IngestRequest::new(["b.pdf", "a.txt", "b.pdf", "c.md", "a.txt"]);
        assert_eq!(request.deduplicated(), vec!["b.pdf", "a.txt", "c.md"]);
    }

    #[test]
    fn stage_serializes_to_wire_names() {
        assert_eq!(serde_json::to_string(&Stage::Download).unwrap(), "\"download\"");
        assert_eq!(serde_json::to_string(&Stage::Extract).unwrap(), "\"extract\"");
        assert_eq!(serde_json::to_string(&Stage::Index).unwrap(), "\"indexing\"");
        assert_eq!(serde_json::to_string(&Stage::Tracker).unwrap(), "\"tracker\"");
    }

    #[test]
    fn completeness_check_counts_each_file_once() {
        let result = BatchResult {
            requested: vec!["a.txt".into(), "b.txt".into()],
            downloaded: vec!["a.txt".into()],
            extracted: vec!["a.txt".into()],
            indexed: vec!["a.txt".into()],
            failures: vec![IngestFailure::new("b.txt", Stage::Download, "not_found")],
        };
        assert!(result.is_complete());

        let mut dropped = result.clone();
        dropped.failures.clear();
        assert!(!dropped.is_complete());
    }
}
