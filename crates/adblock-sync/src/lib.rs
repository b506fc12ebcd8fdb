//! Blocklist aggregation and Zero Trust Gateway reconciliation.
//!
//! The pipeline fetches adlist and whitelist sources, normalizes them into
//! domain sets, subtracts the whitelist and replaces the gateway lists and
//! block rule owned by one name prefix:
//!
//! ```text
//! fetch -> normalize (adlist, whitelist) -> reconcile -> remote state
//!       -> idempotency gate -> delete rule -> delete lists
//!       -> create lists (chunks of 1000) -> create or update rule
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use adblock_sync::{Pipeline, Sources, SourceFetcher};
//!
//! let pipeline = Pipeline::new("DNS Block List", sources);
//! let outcome = pipeline.run(&SourceFetcher::new()?, &client).await?;
//! ```

mod domain;
mod error;
mod fanout;
mod fetch;
mod phase;
mod pipeline;
mod remote;
mod sync;

pub use domain::{normalize, reconcile, Domain, DomainSet, LineMatch, SKIP_DOMAINS};
pub use error::{Result, SyncError};
pub use fanout::{join_ordered, DEFAULT_CONCURRENCY};
pub use fetch::{strip_boilerplate, SourceFetcher, STEVENBLACK_MARKER};
pub use phase::Phase;
pub use pipeline::{write_domains, Pipeline, Sources};
pub use remote::{delete_rule_with_prefix, NamePrefix, RemoteState};
pub use sync::{
    partition, PurgeReport, RuleChange, SyncOptions, SyncOutcome, SyncReport, Synchronizer,
    DEFAULT_CHUNK_SIZE,
};
