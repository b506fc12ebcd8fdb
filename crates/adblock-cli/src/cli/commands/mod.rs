//! Command implementations.

pub mod dump;
pub mod purge;
pub mod sync;

use adblock_sync::{Pipeline, SourceFetcher};
use anyhow::{Context as _, Result};
use gateway_client::{Credentials, GatewayClient};

use crate::config::Config;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Loaded configuration
    pub config: Config,

    /// Cloudflare API token
    pub api_token: Option<String>,

    /// Cloudflare account identifier
    pub account_id: Option<String>,
}

impl Context {
    /// Credentials from the command line or environment.
    pub fn credentials(&self) -> Result<Credentials> {
        Credentials::new(
            self.api_token.clone().unwrap_or_default(),
            self.account_id.clone().unwrap_or_default(),
        )
        .context("Missing Cloudflare credentials (set CF_API_TOKEN and CF_IDENTIFIER)")
    }

    /// Create a gateway client for the configured account.
    pub fn client(&self) -> Result<GatewayClient> {
        let client = GatewayClient::new(self.credentials()?)?;
        Ok(client)
    }

    /// Build the pipeline, reading every URL file up front.
    pub fn pipeline(&self) -> Result<Pipeline> {
        let sources = self.config.sources()?;
        Ok(Pipeline::new(&self.config.adlist_name, sources).with_options(self.config.sync_options()))
    }

    /// Create a source fetcher.
    pub fn fetcher(&self) -> Result<SourceFetcher> {
        Ok(SourceFetcher::new()?.concurrency(self.config.concurrency.max(1)))
    }
}
