//! Remote file store abstraction
//!
//! The pipeline only needs three capabilities from the file store: an
//! existence check, a byte fetch, and a directory listing for the HTTP
//! pass-through endpoint. A missing file is a `RemoteFileHandle` with
//! `exists = false`, not an error; transport and auth faults surface as
//! `Error::Transport`.

mod webdav;

pub use webdav::WebdavStore;

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Result of an existence check against the remote store
///
/// Never cached across requests; remote state may change between batches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteFileHandle {
    /// Filename as requested
    pub remote_name: String,
    /// Whether the file is present on the remote store
    pub exists: bool,
    /// Content length reported by the server, when available
    pub size: Option<u64>,
}

/// One entry of a remote directory listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteEntry {
    /// Server-side href of the entry
    pub href: String,
    /// Decoded display name (last path segment)
    pub name: String,
    /// Whether the entry is a directory
    pub is_directory: bool,
    /// Content type reported by the server, when available
    pub content_type: Option<String>,
}

/// Trait for remote file stores
///
/// All operations are idempotent and safe to retry. Callers check existence
/// before fetching to keep missing files from generating noisy errors.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Check whether a file exists, returning its handle
    async fn exists(&self, name: &str) -> Result<RemoteFileHandle>;

    /// Download a file's bytes
    ///
    /// Returns `Error::RemoteNotFound` when the file is absent and
    /// `Error::Transport` for network or auth faults.
    async fn fetch(&self, name: &str) -> Result<Bytes>;

    /// List the direct children of a directory
    async fn list(&self, directory: &str) -> Result<Vec<RemoteEntry>>;

    /// Store name for logging
    fn name(&self) -> &str;
}
