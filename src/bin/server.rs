//! journalkeeper server
//!
//! Accepts free-text entries over HTTP, summarizes them into the category's
//! fields and merges them into that category's document.
//!
//! # Configuration
//!
//! Environment variables:
//! - `JOURNAL_CONFIG`: Path to config file (default: ~/.config/journalkeeper/config.yaml)
//! - `JOURNAL_PORT`: Port to listen on (default: 8080)
//! - `JOURNAL_DATA_DIR`: Directory to store documents (default: current directory)
//! - `JOURNAL_FORMAT`: `org` or `markdown` (default: markdown)
//! - `GEMINI_API_TOKEN`: Gemini API key; without it entries are not processed
//! - `GIT_USERNAME`, `GIT_REPO_NAME`, `GITHUB_TOKEN`: enable git sync
//!
//! # Config File Format
//!
//! ```yaml
//! format: org
//! categories:
//!   journal:
//!     title: Journal
//!     file: journal
//!     fields: [emotional_checkin, happy_things]
//! field_titles:
//!   emotional_checkin: General Emotional Checkin
//! ```

use journalkeeper::{server, Config, Journal};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "journalkeeper=info,journalkeeper_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run().await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load(None)?;

    if let Some(path) = &config.config_file {
        tracing::info!("Config file: {}", path.display());
    }
    tracing::info!("Journal format: {}", config.format);

    let journal = Journal::from_config(&config).await?;
    tracing::info!("Storage directory: {}", journal.store().root().display());

    let app = server::router(Arc::new(journal));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
