//! End-to-end run: sources in, gateway state out.

use gateway_core::GatewayStore;
use std::io::Write;
use std::path::Path;
use tracing::{error, info, warn};

use crate::domain::{normalize, reconcile, Domain};
use crate::error::Result;
use crate::fetch::SourceFetcher;
use crate::phase::Phase;
use crate::remote::NamePrefix;
use crate::sync::{PurgeReport, SyncOptions, SyncOutcome, Synchronizer};

/// Where the domains come from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sources {
    /// Adlist URLs, in concatenation order
    pub adlist_urls: Vec<String>,

    /// Whitelist URLs, in concatenation order
    pub whitelist_urls: Vec<String>,

    /// Whitelist text maintained locally, appended to the fetched whitelist
    pub static_whitelist: String,
}

/// One adlist's sync pipeline
#[derive(Debug, Clone)]
pub struct Pipeline {
    prefix: NamePrefix,
    sources: Sources,
    options: SyncOptions,
}

impl Pipeline {
    /// Create a pipeline for `adlist_name`
    #[must_use]
    pub fn new(adlist_name: &str, sources: Sources) -> Self {
        Self {
            prefix: NamePrefix::for_adlist(adlist_name),
            sources,
            options: SyncOptions::default(),
        }
    }

    /// Override the sync options
    #[must_use]
    pub fn with_options(mut self, options: SyncOptions) -> Self {
        self.options = options;
        self
    }

    /// The prefix owned by this pipeline
    #[must_use]
    pub const fn prefix(&self) -> &NamePrefix {
        &self.prefix
    }

    /// Fetch and normalize every source into the sorted desired sequence
    pub async fn collect_domains(&self, fetcher: &SourceFetcher) -> Result<Vec<Domain>> {
        Phase::Fetching.enter();
        let adlist_text = fetcher.fetch_all(&self.sources.adlist_urls).await?;
        let mut whitelist_text = fetcher.fetch_all(&self.sources.whitelist_urls).await?;
        if !self.sources.static_whitelist.is_empty() {
            whitelist_text.push('\n');
            whitelist_text.push_str(&self.sources.static_whitelist);
        }

        Phase::Normalizing.enter();
        let adlist = normalize(&adlist_text);
        let whitelist = normalize(&whitelist_text);

        Phase::Diffing.enter();
        Ok(reconcile(&adlist, &whitelist))
    }

    /// Reconcile remote state against an already collected domain sequence
    pub async fn sync_domains<S: GatewayStore + ?Sized>(
        &self,
        store: &S,
        desired: &[Domain],
    ) -> Result<SyncOutcome> {
        Synchronizer::new(store, self.prefix.clone())
            .with_options(self.options)
            .sync(desired)
            .await
    }

    /// Full run: fetch, normalize, diff, reconcile
    ///
    /// A failure at any stage is logged as the `failed` phase.
    pub async fn run<S: GatewayStore + ?Sized>(
        &self,
        fetcher: &SourceFetcher,
        store: &S,
    ) -> Result<SyncOutcome> {
        Phase::Idle.enter();
        let result = match self.collect_domains(fetcher).await {
            Ok(desired) => self.sync_domains(store, &desired).await,
            Err(err) => Err(err),
        };

        if let Err(err) = &result {
            Phase::Failed.enter();
            error!(prefix = %self.prefix, error = %err, "Run failed");
        }
        result
    }

    /// Delete everything under the prefix
    pub async fn purge<S: GatewayStore + ?Sized>(&self, store: &S) -> Result<PurgeReport> {
        Synchronizer::new(store, self.prefix.clone())
            .with_options(self.options)
            .purge()
            .await
    }
}

/// Write domains one per line
pub fn write_domains(path: &Path, domains: &[Domain]) -> Result<()> {
    let file = std::fs::File::create(path)?;
    let mut writer = std::io::BufWriter::new(file);
    for domain in domains {
        writeln!(writer, "{domain}")?;
    }
    writer.flush()?;

    if domains.is_empty() {
        warn!(path = %path.display(), "Wrote an empty domain list");
    } else {
        info!(path = %path.display(), domains = domains.len(), "Wrote domain list");
    }
    Ok(())
}
