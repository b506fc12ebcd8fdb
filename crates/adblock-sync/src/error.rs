//! Error types for the sync pipeline.

use gateway_core::GatewayError;
use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, SyncError>;

/// Errors that abort a sync run
#[derive(Error, Debug)]
pub enum SyncError {
    /// A source URL was unreachable or answered with a non-success status
    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// A gateway API call failed
    #[error("gateway API call failed: {0}")]
    Gateway(#[from] GatewayError),

    /// More than one block rule exists under the prefix
    #[error("found {found} gateway policies under {prefix}, expected at most one")]
    Consistency { prefix: String, found: usize },

    /// The desired set does not fit in the account's list quota
    #[error("{count} domains exceed the limit of {max}")]
    TooManyDomains { count: usize, max: usize },

    /// Invalid pipeline configuration
    #[error("config error: {0}")]
    Config(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl SyncError {
    pub(crate) fn fetch(url: &str, reason: impl std::fmt::Display) -> Self {
        Self::Fetch {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}
