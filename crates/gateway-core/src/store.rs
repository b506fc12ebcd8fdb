//! The remote CRUD seam.

use async_trait::async_trait;

use crate::{GatewayList, GatewayRule, Result, RuleRequest};

/// CRUD access to one account's gateway lists and rules.
///
/// Implemented by the HTTP client; the sync pipeline only ever talks to the
/// remote service through this trait.
#[async_trait]
pub trait GatewayStore: Send + Sync {
    /// List every gateway list in the account
    async fn list_lists(&self) -> Result<Vec<GatewayList>>;

    /// Create a domain list with the given entries
    async fn create_list(&self, name: &str, domains: &[String]) -> Result<GatewayList>;

    /// Delete a list by id
    async fn delete_list(&self, list_id: &str) -> Result<()>;

    /// List every gateway rule in the account
    async fn list_rules(&self) -> Result<Vec<GatewayRule>>;

    /// Create a rule
    async fn create_rule(&self, rule: &RuleRequest) -> Result<GatewayRule>;

    /// Replace an existing rule
    async fn update_rule(&self, rule_id: &str, rule: &RuleRequest) -> Result<GatewayRule>;

    /// Delete a rule by id
    async fn delete_rule(&self, rule_id: &str) -> Result<()>;
}
