//! Gateway rule (firewall policy) endpoints.

use crate::GatewayClient;
use gateway_core::{GatewayError, GatewayRule, Result, RuleRequest};

/// Gateway rule endpoints
pub struct RulesApi<'a> {
    client: &'a GatewayClient,
}

impl<'a> RulesApi<'a> {
    pub(crate) const fn new(client: &'a GatewayClient) -> Self {
        Self { client }
    }

    /// List every gateway rule in the account
    pub async fn list(&self) -> Result<Vec<GatewayRule>> {
        let rules: Option<Vec<GatewayRule>> = self
            .client
            .get(&self.client.account_path("/gateway/rules"))
            .await?;
        Ok(rules.unwrap_or_default())
    }

    /// Create a rule
    pub async fn create(&self, rule: &RuleRequest) -> Result<GatewayRule> {
        self.client
            .post(&self.client.account_path("/gateway/rules"), rule)
            .await?
            .ok_or_else(|| GatewayError::Http(format!("empty result creating rule {}", rule.name)))
    }

    /// Replace an existing rule
    pub async fn update(&self, rule_id: &str, rule: &RuleRequest) -> Result<GatewayRule> {
        self.client
            .put(
                &self.client.account_path(&format!("/gateway/rules/{rule_id}")),
                rule,
            )
            .await?
            .ok_or_else(|| GatewayError::Http(format!("empty result updating rule {rule_id}")))
    }

    /// Delete a rule
    pub async fn delete(&self, rule_id: &str) -> Result<()> {
        self.client
            .delete(&self.client.account_path(&format!("/gateway/rules/{rule_id}")))
            .await
    }
}
