//! Chunked sync planner and executor.

use gateway_core::{GatewayError, GatewayList, GatewayStore, RuleRequest};
use tracing::{info, warn};

use crate::domain::Domain;
use crate::error::{Result, SyncError};
use crate::fanout::{join_ordered, DEFAULT_CONCURRENCY};
use crate::phase::Phase;
use crate::remote::{
    delete_rule_with_prefix, ensure_at_most_one, lists_with_prefix, rules_with_prefix,
    NamePrefix, RemoteState,
};

/// Entries per gateway list
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Knobs for one synchronizer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOptions {
    /// Maximum domains per list
    pub chunk_size: usize,

    /// Maximum concurrent delete/create calls
    pub concurrency: usize,

    /// Refuse to sync more domains than this
    pub max_domains: usize,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            concurrency: DEFAULT_CONCURRENCY,
            max_domains: 300 * DEFAULT_CHUNK_SIZE,
        }
    }
}

/// Split a sorted domain sequence into consecutive chunks of at most `size`
#[must_use]
pub fn partition(domains: &[Domain], size: usize) -> Vec<&[Domain]> {
    domains.chunks(size.max(1)).collect()
}

/// What happened to the block rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleChange {
    /// A new rule was created
    Created { id: String },
    /// The existing rule was pointed at the new lists
    Updated { id: String },
    /// No lists were created, so no rule was written
    Unchanged,
}

/// Summary of an applied sync
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub deleted_policies: usize,
    pub deleted_lists: usize,
    pub created_lists: Vec<GatewayList>,
    /// Names whose creation reported "already exists"
    pub skipped_lists: Vec<String>,
    pub rule: RuleChange,
}

/// Result of a sync run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Remote counts already matched; nothing was changed
    Skipped { domains: usize },
    /// The remote generation was replaced
    Applied(SyncReport),
}

/// Summary of a purge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PurgeReport {
    pub deleted_policies: usize,
    pub deleted_lists: usize,
}

/// Reconciles one prefix's lists and rule against a desired domain sequence
pub struct Synchronizer<'a, S: ?Sized> {
    store: &'a S,
    prefix: NamePrefix,
    options: SyncOptions,
}

impl<'a, S: GatewayStore + ?Sized> Synchronizer<'a, S> {
    /// Create a synchronizer with default options
    pub fn new(store: &'a S, prefix: NamePrefix) -> Self {
        Self {
            store,
            prefix,
            options: SyncOptions::default(),
        }
    }

    /// Override the options
    #[must_use]
    pub fn with_options(mut self, options: SyncOptions) -> Self {
        self.options = options;
        self
    }

    /// The prefix this synchronizer owns
    pub const fn prefix(&self) -> &NamePrefix {
        &self.prefix
    }

    /// Bring remote state in line with `desired` (sorted, deduplicated).
    ///
    /// Every check that can fail without side effects runs before the first
    /// mutating call.
    pub async fn sync(&self, desired: &[Domain]) -> Result<SyncOutcome> {
        if desired.len() > self.options.max_domains {
            return Err(SyncError::TooManyDomains {
                count: desired.len(),
                max: self.options.max_domains,
            });
        }

        let remote = RemoteState::read(self.store, &self.prefix).await?;
        remote.ensure_single_rule(&self.prefix)?;

        if remote.is_in_sync(desired.len()) {
            Phase::Skip.enter();
            warn!(domains = desired.len(), "Lists are the same size, skipping");
            return Ok(SyncOutcome::Skipped {
                domains: desired.len(),
            });
        }

        let report = self.apply(desired, &remote.lists).await?;
        Ok(SyncOutcome::Applied(report))
    }

    async fn apply(&self, desired: &[Domain], stale: &[GatewayList]) -> Result<SyncReport> {
        Phase::DeletingPolicy.enter();
        let deleted_policies = self.delete_policy().await?;

        Phase::DeletingLists.enter();
        let deleted_lists = self.delete_lists(stale).await?;

        Phase::CreatingLists.enter();
        let (created_lists, skipped_lists) = self.create_lists(desired).await?;

        Phase::UpsertingPolicy.enter();
        let rule = self.upsert_policy(&created_lists).await?;

        Phase::Done.enter();
        info!(
            lists = created_lists.len(),
            domains = desired.len(),
            "Done"
        );

        Ok(SyncReport {
            deleted_policies,
            deleted_lists,
            created_lists,
            skipped_lists,
            rule,
        })
    }

    /// Delete the block rule and every list under the prefix
    pub async fn purge(&self) -> Result<PurgeReport> {
        let deleted_policies = self.delete_policy().await?;
        let lists = lists_with_prefix(self.store, self.prefix.as_str()).await?;
        let deleted_lists = self.delete_lists(&lists).await?;

        info!(deleted_policies, deleted_lists, "Deletion completed");
        Ok(PurgeReport {
            deleted_policies,
            deleted_lists,
        })
    }

    async fn delete_policy(&self) -> Result<usize> {
        let deleted = delete_rule_with_prefix(self.store, &self.prefix.policy_name()).await?;
        info!(deleted, "Deleted gateway policies");
        Ok(deleted)
    }

    async fn delete_lists(&self, lists: &[GatewayList]) -> Result<usize> {
        let deletions = lists.iter().map(|list| async move {
            info!(name = %list.name, id = %list.id, "Deleting list");
            self.store.delete_list(&list.id).await
        });

        join_ordered(deletions, self.options.concurrency)
            .await
            .into_iter()
            .collect::<std::result::Result<Vec<()>, GatewayError>>()?;

        Ok(lists.len())
    }

    async fn create_lists(&self, desired: &[Domain]) -> Result<(Vec<GatewayList>, Vec<String>)> {
        let chunks = partition(desired, self.options.chunk_size);

        let creations = chunks.into_iter().enumerate().map(|(index, chunk)| {
            let name = self.prefix.list_name(index);
            let items: Vec<String> = chunk.iter().map(|d| d.as_str().to_string()).collect();
            async move {
                info!(name = %name, domains = items.len(), "Creating list");
                let result = self.store.create_list(&name, &items).await;
                (name, result)
            }
        });

        let mut created = Vec::new();
        let mut skipped = Vec::new();
        for (name, result) in join_ordered(creations, self.options.concurrency).await {
            match result {
                Ok(list) => created.push(list),
                Err(err) if err.is_already_exists() => {
                    warn!(name = %name, "List already exists, skipping");
                    skipped.push(name);
                }
                Err(err) => return Err(err.into()),
            }
        }

        Ok((created, skipped))
    }

    async fn upsert_policy(&self, lists: &[GatewayList]) -> Result<RuleChange> {
        let policies = rules_with_prefix(self.store, self.prefix.as_str()).await?;
        info!(policies = policies.len(), "Number of policies in Cloudflare");
        ensure_at_most_one(&self.prefix, &policies)?;

        if lists.is_empty() {
            warn!("No lists created, leaving the block policy unset");
            return Ok(RuleChange::Unchanged);
        }

        let list_ids: Vec<&str> = lists.iter().map(|l| l.id.as_str()).collect();
        let request = RuleRequest::block_lists(self.prefix.policy_name(), &list_ids);

        match policies.first() {
            None => {
                info!("Creating firewall policy");
                let rule = self.store.create_rule(&request).await?;
                Ok(RuleChange::Created { id: rule.id })
            }
            Some(existing) => {
                info!(id = %existing.id, "Updating firewall policy");
                let rule = self.store.update_rule(&existing.id, &request).await?;
                Ok(RuleChange::Updated { id: rule.id })
            }
        }
    }
}
