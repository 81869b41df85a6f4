//! Configuration for the ingestion backend

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Main ingestion backend configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// WebDAV file store configuration
    #[serde(default)]
    pub webdav: WebdavConfig,
    /// Index sink configuration
    #[serde(default)]
    pub sink: SinkConfig,
    /// Ingestion ledger configuration
    #[serde(default)]
    pub tracker: TrackerConfig,
    /// Pipeline configuration
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl IngestConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))
    }

    /// Apply environment-variable overrides on top of this configuration
    ///
    /// Variable names follow the deployment convention: `WEBDAV_URL`,
    /// `WEBDAV_LOGIN`, `WEBDAV_PASSWORD`, `SINK_URL`, `SINK_API_KEY`,
    /// `SINK_INDEX`, `APP_HOST`, `APP_PORT`.
    pub fn apply_env(mut self) -> Self {
        if let Ok(url) = std::env::var("WEBDAV_URL") {
            self.webdav.base_url = url;
        }
        if let Ok(login) = std::env::var("WEBDAV_LOGIN") {
            self.webdav.login = login;
        }
        if let Ok(password) = std::env::var("WEBDAV_PASSWORD") {
            self.webdav.password = password;
        }
        if let Ok(url) = std::env::var("SINK_URL") {
            self.sink.endpoint = url;
        }
        if let Ok(key) = std::env::var("SINK_API_KEY") {
            self.sink.api_key = Some(key);
        }
        if let Ok(index) = std::env::var("SINK_INDEX") {
            self.sink.index_name = index;
        }
        if let Ok(host) = std::env::var("APP_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("APP_PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        self
    }

    /// Validate that the pieces required to talk to external services are set
    pub fn validate(&self) -> Result<()> {
        if self.webdav.base_url.is_empty() {
            return Err(Error::Config("webdav.base_url is not set".to_string()));
        }
        if self.webdav.login.is_empty() {
            return Err(Error::Config("webdav.login is not set".to_string()));
        }
        if self.sink.endpoint.is_empty() {
            return Err(Error::Config("sink.endpoint is not set".to_string()));
        }
        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            enable_cors: true,
        }
    }
}

/// WebDAV file store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebdavConfig {
    /// Base URL of the WebDAV server (e.g. "https://cloud.example.com/remote.php/dav")
    pub base_url: String,
    /// Login for basic auth; also part of the user files path
    pub login: String,
    /// Password for basic auth
    pub password: String,
    /// Request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for WebdavConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            login: String::new(),
            password: String::new(),
            request_timeout_secs: 30,
        }
    }
}

/// Index sink configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SinkConfig {
    /// Endpoint of the indexing service
    pub endpoint: String,
    /// Optional bearer token
    pub api_key: Option<String>,
    /// Target index name
    pub index_name: String,
    /// Request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: None,
            index_name: "documents".to_string(),
            request_timeout_secs: 120,
        }
    }
}

/// Ingestion ledger configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Path of the JSON ledger file
    pub ledger_path: PathBuf,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        let ledger_path = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("dav-rag")
            .join("ledger.json");
        Self { ledger_path }
    }
}

/// Re-ingestion policy for filenames already present in the ledger
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReingestPolicy {
    /// Re-ingest and overwrite the prior record (last write wins)
    #[default]
    Overwrite,
    /// Skip files whose ledger record is already `Processed`
    Skip,
}

/// Pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Maximum concurrent downloads from the remote store
    pub download_concurrency: usize,
    /// Per-file download timeout in seconds
    pub download_timeout_secs: u64,
    /// What to do with filenames already recorded as ingested
    #[serde(default)]
    pub reingest: ReingestPolicy,
    /// Root directory for per-batch scoped temp dirs (system default when unset)
    pub workdir_root: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            download_concurrency: 8,
            download_timeout_secs: 60,
            reingest: ReingestPolicy::Overwrite,
            workdir_root: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = IngestConfig::default();
        assert_eq!(config.pipeline.download_concurrency, 8);
        assert_eq!(config.pipeline.reingest, ReingestPolicy::Overwrite);
        assert_eq!(config.server.port, 8000);
        assert!(config.validate().is_err());
    }

    #[test]
    fn toml_roundtrip_with_partial_sections() {
        let toml_src = r#"
            [webdav]
            base_url = "https://cloud.example.com/remote.php/dav"
            login = "alice"
            password = "secret"
            request_timeout_secs = 10

            [sink]
            endpoint = "http://localhost:9200/commit"
            index_name = "kb"

            [pipeline]
            download_concurrency = 2
            download_timeout_secs = 5
            reingest = "skip"
        "#;

        let config: IngestConfig = toml::from_str(toml_src).expect("config should parse");
        assert_eq!(config.webdav.login, "alice");
        assert_eq!(config.pipeline.download_concurrency, 2);
        assert_eq!(config.pipeline.reingest, ReingestPolicy::Skip);
        assert_eq!(config.sink.index_name, "kb");
        // Untouched section falls back to defaults
        assert_eq!(config.server.port, 8000);
        assert!(config.validate().is_ok());
    }
}
