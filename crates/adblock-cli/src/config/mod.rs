//! Configuration management.

use adblock_sync::{Sources, SyncOptions};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Adlist name; every list and rule is tagged `[AdBlock-<name>]`.
    pub adlist_name: String,

    /// File with one adlist URL per line.
    pub lists_file: PathBuf,

    /// File with one whitelist URL per line.
    pub whitelists_file: PathBuf,

    /// Local whitelist in list format, merged into the fetched whitelist.
    pub static_whitelist_file: Option<PathBuf>,

    /// Where `dump` writes the final domain list.
    pub output_file: PathBuf,

    /// Whole-run attempts before giving up.
    pub attempts: u32,

    /// Pause between attempts.
    pub retry_delay_secs: u64,

    /// Refuse to sync more domains than this.
    pub max_domains: usize,

    /// Concurrent list deletions and creations.
    pub concurrency: usize,
}

impl Default for Config {
    fn default() -> Self {
        let options = SyncOptions::default();
        Self {
            adlist_name: "DNS Block List".to_string(),
            lists_file: PathBuf::from("lists.txt"),
            whitelists_file: PathBuf::from("whitelists.txt"),
            static_whitelist_file: None,
            output_file: PathBuf::from("domains.txt"),
            attempts: 3,
            retry_delay_secs: 60,
            max_domains: options.max_domains,
            concurrency: options.concurrency,
        }
    }
}

impl Config {
    /// Get the default config file path.
    pub fn path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("com", "cf-adblock", "cf-adblock")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist; the default path falls back to defaults
    /// when missing.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        let path = Self::path()?;
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        Self::from_file(&path)
    }

    /// Parse a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.adlist_name.trim().is_empty() {
            anyhow::bail!("adlist_name must not be empty");
        }
        if self.max_domains == 0 {
            anyhow::bail!("max_domains must be positive");
        }
        Ok(())
    }

    /// Sync options derived from this config.
    pub fn sync_options(&self) -> SyncOptions {
        SyncOptions {
            concurrency: self.concurrency.max(1),
            max_domains: self.max_domains,
            ..SyncOptions::default()
        }
    }

    /// Read every source the pipeline needs.
    ///
    /// The adlist file is required. A missing whitelist file means no
    /// whitelist.
    pub fn sources(&self) -> Result<Sources> {
        let adlist_urls = read_url_file(&self.lists_file)?;

        let whitelist_urls = if self.whitelists_file.exists() {
            read_url_file(&self.whitelists_file)?
        } else {
            warn!(path = %self.whitelists_file.display(), "Whitelist file not found, continuing without it");
            Vec::new()
        };

        let static_whitelist = match &self.static_whitelist_file {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read static whitelist: {}", path.display()))?,
            None => String::new(),
        };

        Ok(Sources {
            adlist_urls,
            whitelist_urls,
            static_whitelist,
        })
    }
}

/// Read one URL per line, skipping blank lines and `#` comments.
pub fn read_url_file(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read URL file: {}", path.display()))?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(ToString::to_string)
        .collect())
}
