//! Ingestion server binary
//!
//! Run with: cargo run -p dav-rag --bin dav-rag-server
//!
//! Configuration is read from the file named by `DAV_RAG_CONFIG` (TOML,
//! optional) with environment-variable overrides applied on top.

use dav_rag::{config::IngestConfig, server::IngestServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dav_rag=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = match std::env::var("DAV_RAG_CONFIG") {
        Ok(path) => IngestConfig::from_file(&path)?,
        Err(_) => IngestConfig::default(),
    }
    .apply_env();
    config.validate()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - WebDAV base: {}", config.webdav.base_url);
    tracing::info!("  - Index sink: {}", config.sink.endpoint);
    tracing::info!("  - Index name: {}", config.sink.index_name);
    tracing::info!("  - Ledger: {}", config.tracker.ledger_path.display());
    tracing::info!(
        "  - Downloads: {} concurrent, {}s timeout",
        config.pipeline.download_concurrency,
        config.pipeline.download_timeout_secs
    );

    let server = IngestServer::new(config)?;
    tracing::info!("Listening on {}", server.address());
    server.start().await?;

    Ok(())
}
