// Loading the career-stats table from disk or over HTTP.
//
// Trade data is optional: when the table cannot be fetched or parsed the
// caller gets an empty trade list and an error in the log, never a failure.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{error, info};

use crate::ingest;
use crate::trades::{self, TradeEvent};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("request to {url} failed: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },

    #[error("malformed table from {origin}: {source}")]
    Malformed {
        origin: String,
        source: ingest::IngestError,
    },
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// Somewhere a career-stats table can be read from.
#[async_trait]
pub trait TableSource: Send + Sync {
    /// Fetch the raw table text.
    async fn fetch(&self) -> Result<String, LoadError>;

    /// Human-readable location, for logs.
    fn describe(&self) -> String;
}

/// Table stored in a local file.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl TableSource for FileSource {
    async fn fetch(&self) -> Result<String, LoadError> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| LoadError::Io {
                path: self.path.display().to_string(),
                source: e,
            })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Table served over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpSource {
    http: reqwest::Client,
    url: String,
}

impl HttpSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl TableSource for HttpSource {
    async fn fetch(&self) -> Result<String, LoadError> {
        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| LoadError::Http {
                url: self.url.clone(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| LoadError::Http {
            url: self.url.clone(),
            source: e,
        })
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Pick a source for a configured location: URLs go over HTTP, anything
/// else is a file path.
pub fn source_from_location(location: &str) -> Box<dyn TableSource> {
    let location = location.trim();
    if location.starts_with("http://") || location.starts_with("https://") {
        Box::new(HttpSource::new(location))
    } else {
        Box::new(FileSource::new(location))
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Fetch, parse and derive trades, surfacing every failure.
pub async fn try_load_trade_data(source: &dyn TableSource) -> Result<Vec<TradeEvent>, LoadError> {
    let raw = source.fetch().await?;
    let records = ingest::parse(&raw).map_err(|e| LoadError::Malformed {
        origin: source.describe(),
        source: e,
    })?;
    Ok(trades::derive_trades(&records))
}

/// Fetch, parse and derive trades. Failures are logged and produce an empty
/// list. Safe to call repeatedly.
pub async fn load_trade_data(source: &dyn TableSource) -> Vec<TradeEvent> {
    match try_load_trade_data(source).await {
        Ok(trades) => {
            info!(
                "Loaded {} trade events from {}",
                trades.len(),
                source.describe()
            );
            trades
        }
        Err(e) => {
            error!("Error loading trade data: {}", e);
            Vec::new()
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
