//! HTTP fetcher for adlist and whitelist sources.

use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{Result, SyncError};
use crate::fanout::{join_ordered, DEFAULT_CONCURRENCY};

/// Everything before this marker in the StevenBlack hosts file is
/// boilerplate (localhost entries and friends)
pub const STEVENBLACK_MARKER: &str = "# Start StevenBlack";

const TIMEOUT_SECS: u64 = 60;

/// Keep only the content after the first boilerplate marker, if present
#[must_use]
pub fn strip_boilerplate(text: &str) -> &str {
    text.split_once(STEVENBLACK_MARKER)
        .map_or(text, |(_, rest)| rest)
}

/// Downloads source documents
pub struct SourceFetcher {
    client: Client,
    concurrency: usize,
}

impl SourceFetcher {
    /// Create a fetcher with default settings
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .user_agent(format!("cf-adblock/{}", env!("CARGO_PKG_VERSION")))
            .gzip(true)
            .build()
            .map_err(|e| SyncError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self::with_client(client))
    }

    /// Use an existing HTTP client
    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Limit concurrent downloads
    #[must_use]
    pub fn concurrency(mut self, limit: usize) -> Self {
        self.concurrency = limit;
        self
    }

    /// Download one source as text
    pub async fn fetch(&self, url: &str) -> Result<String> {
        debug!(url, "Downloading source");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SyncError::fetch(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::fetch(url, format!("HTTP {status}")));
        }

        let text = response.text().await.map_err(|e| SyncError::fetch(url, e))?;
        let text = strip_boilerplate(&text).to_string();

        info!(url, size = text.len(), "Downloaded file");
        Ok(text)
    }

    /// Download every URL and concatenate the texts in the order given.
    ///
    /// Downloads run concurrently; any failure fails the whole call.
    pub async fn fetch_all(&self, urls: &[String]) -> Result<String> {
        let texts = join_ordered(urls.iter().map(|url| self.fetch(url)), self.concurrency)
            .await
            .into_iter()
            .collect::<Result<Vec<_>>>()?;

        Ok(texts.join("\n"))
    }
}
