//! HTTP index sink client
//!
//! Posts the whole batch as one JSON payload to the configured indexing
//! endpoint. Authentication is a bearer token when an API key is set.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use super::{CommitReceipt, IndexSink};
use crate::config::SinkConfig;
use crate::error::{Error, Result};
use crate::types::document::Document;

pub struct HttpIndexSink {
    client: Client,
    config: SinkConfig,
}

#[derive(Serialize)]
struct CommitPayload<'a> {
    index: &'a str,
    documents: &'a [Document],
}

impl HttpIndexSink {
    pub fn new(config: SinkConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build sink client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }
}

#[async_trait]
impl IndexSink for HttpIndexSink {
    async fn commit(&self, documents: &[Document]) -> Result<CommitReceipt> {
        if documents.is_empty() {
            return Ok(CommitReceipt { accepted: 0 });
        }

        let payload = CommitPayload {
            index: &self.config.index_name,
            documents,
        };

        let response = self
            .authorized(self.client.post(&self.config.endpoint))
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::Commit(format!("Index commit request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Commit(format!(
                "Index sink rejected batch ({}): {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        tracing::info!(
            count = documents.len(),
            index = %self.config.index_name,
            "Batch committed to index sink"
        );
        Ok(CommitReceipt {
            accepted: documents.len(),
        })
    }

    async fn health_check(&self) -> Result<()> {
        let response = self
            .authorized(self.client.get(&self.config.endpoint))
            .send()
            .await
            .map_err(|e| Error::transport(format!("Sink health check failed: {}", e)))?;

        if response.status().is_server_error() {
            return Err(Error::transport(format!(
                "Sink unhealthy: {}",
                response.status()
            )));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "http"
    }
}
