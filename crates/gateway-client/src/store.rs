use async_trait::async_trait;
use gateway_core::{GatewayList, GatewayRule, GatewayStore, Result, RuleRequest};

use crate::GatewayClient;

#[async_trait]
impl GatewayStore for GatewayClient {
    async fn list_lists(&self) -> Result<Vec<GatewayList>> {
        self.lists().list().await
    }

    async fn create_list(&self, name: &str, domains: &[String]) -> Result<GatewayList> {
        self.lists().create(name, domains).await
    }

    async fn delete_list(&self, list_id: &str) -> Result<()> {
        self.lists().delete(list_id).await
    }

    async fn list_rules(&self) -> Result<Vec<GatewayRule>> {
        self.rules().list().await
    }

    async fn create_rule(&self, rule: &RuleRequest) -> Result<GatewayRule> {
        self.rules().create(rule).await
    }

    async fn update_rule(&self, rule_id: &str, rule: &RuleRequest) -> Result<GatewayRule> {
        self.rules().update(rule_id, rule).await
    }

    async fn delete_rule(&self, rule_id: &str) -> Result<()> {
        self.rules().delete(rule_id).await
    }
}
