//! Gateway list endpoints.

use crate::GatewayClient;
use gateway_core::{CreateListRequest, GatewayError, GatewayList, Result};

/// Gateway list endpoints
pub struct ListsApi<'a> {
    client: &'a GatewayClient,
}

impl<'a> ListsApi<'a> {
    pub(crate) const fn new(client: &'a GatewayClient) -> Self {
        Self { client }
    }

    /// List every gateway list in the account
    pub async fn list(&self) -> Result<Vec<GatewayList>> {
        let lists: Option<Vec<GatewayList>> = self
            .client
            .get(&self.client.account_path("/gateway/lists"))
            .await?;
        Ok(lists.unwrap_or_default())
    }

    /// Get a single list by id
    pub async fn get(&self, list_id: &str) -> Result<GatewayList> {
        self.client
            .get(&self.client.account_path(&format!("/gateway/lists/{list_id}")))
            .await?
            .ok_or_else(|| GatewayError::NotFound {
                resource: format!("gateway list {list_id}"),
            })
    }

    /// Create a domain list holding `domains`
    pub async fn create(&self, name: &str, domains: &[String]) -> Result<GatewayList> {
        let request = CreateListRequest::domains(name, domains);

        self.client
            .post(&self.client.account_path("/gateway/lists"), &request)
            .await
            .map_err(|err| match err {
                GatewayError::AlreadyExists { .. } => GatewayError::AlreadyExists {
                    name: name.to_string(),
                },
                other => other,
            })?
            .ok_or_else(|| GatewayError::Http(format!("empty result creating list {name}")))
    }

    /// Delete a list
    pub async fn delete(&self, list_id: &str) -> Result<()> {
        self.client
            .delete(&self.client.account_path(&format!("/gateway/lists/{list_id}")))
            .await
    }
}
