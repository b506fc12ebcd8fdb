//! Reading remote state owned by a name prefix.

use gateway_core::{GatewayList, GatewayRule, GatewayStore};
use tracing::info;

use crate::error::{Result, SyncError};

/// Tag shared by every list and rule this tool owns: `[AdBlock-<name>]`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamePrefix(String);

impl NamePrefix {
    /// Prefix for an adlist name
    #[must_use]
    pub fn for_adlist(adlist_name: &str) -> Self {
        Self(format!("[AdBlock-{adlist_name}]"))
    }

    /// The prefix itself
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of the block rule: `<prefix> Block Ads`
    #[must_use]
    pub fn policy_name(&self) -> String {
        format!("{} Block Ads", self.0)
    }

    /// Name of the list holding chunk `index` (0-based): `<prefix> <index + 1>`
    #[must_use]
    pub fn list_name(&self, index: usize) -> String {
        format!("{} {}", self.0, index + 1)
    }
}

impl AsRef<str> for NamePrefix {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NamePrefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lists and rules under one prefix, as read at the start of a run
#[derive(Debug, Clone, Default)]
pub struct RemoteState {
    pub lists: Vec<GatewayList>,
    pub rules: Vec<GatewayRule>,
}

impl RemoteState {
    /// Read every list and rule whose name starts with `prefix`
    pub async fn read<S: GatewayStore + ?Sized>(store: &S, prefix: &NamePrefix) -> Result<Self> {
        let lists = lists_with_prefix(store, prefix.as_str()).await?;
        let rules = rules_with_prefix(store, prefix.as_str()).await?;

        info!(
            lists = lists.len(),
            policies = rules.len(),
            "Number of lists in Cloudflare"
        );

        Ok(Self { lists, rules })
    }

    /// Sum of remote list sizes
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.lists.iter().map(|list| list.count).sum()
    }

    /// Idempotency gate: the remote lists hold exactly `desired` entries.
    ///
    /// This compares counts only, so swapping domains for the same number of
    /// other domains goes unnoticed until the next size change.
    #[must_use]
    pub fn is_in_sync(&self, desired: usize) -> bool {
        u64::try_from(desired).is_ok_and(|desired| desired == self.entry_count())
    }

    /// Fail if more than one rule carries the prefix
    pub fn ensure_single_rule(&self, prefix: &NamePrefix) -> Result<()> {
        ensure_at_most_one(prefix, &self.rules)
    }
}

pub(crate) fn ensure_at_most_one(prefix: &NamePrefix, rules: &[GatewayRule]) -> Result<()> {
    if rules.len() > 1 {
        return Err(SyncError::Consistency {
            prefix: prefix.to_string(),
            found: rules.len(),
        });
    }
    Ok(())
}

pub(crate) async fn lists_with_prefix<S: GatewayStore + ?Sized>(
    store: &S,
    prefix: &str,
) -> Result<Vec<GatewayList>> {
    let lists = store.list_lists().await?;
    Ok(lists.into_iter().filter(|l| l.has_prefix(prefix)).collect())
}

pub(crate) async fn rules_with_prefix<S: GatewayStore + ?Sized>(
    store: &S,
    prefix: &str,
) -> Result<Vec<GatewayRule>> {
    let rules = store.list_rules().await?;
    Ok(rules.into_iter().filter(|r| r.has_prefix(prefix)).collect())
}

/// Delete the first rule whose name starts with `prefix`.
///
/// Returns how many rules were deleted (0 or 1); finding none is not an error.
pub async fn delete_rule_with_prefix<S: GatewayStore + ?Sized>(
    store: &S,
    prefix: &str,
) -> Result<usize> {
    let rules = rules_with_prefix(store, prefix).await?;
    let Some(rule) = rules.first() else {
        return Ok(0);
    };

    store.delete_rule(&rule.id).await?;
    Ok(1)
}
