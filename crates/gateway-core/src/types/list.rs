use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A Zero Trust Gateway list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GatewayList {
    /// Unique list ID
    pub id: String,

    /// List name
    pub name: String,

    /// Number of entries in the list
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub count: u64,

    /// List type (`DOMAIN`, `IP`, `URL`, ...)
    #[serde(rename = "type", default)]
    pub list_type: Option<String>,

    /// Free-form description
    #[serde(default)]
    pub description: Option<String>,

    /// When the list was created
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    /// When the list was last modified
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl GatewayList {
    /// Returns true if the list name starts with the given prefix
    #[must_use]
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.name.starts_with(prefix)
    }
}

/// Entry type for a new list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ListType {
    /// Domain names
    Domain,
    /// IP addresses or ranges
    Ip,
    /// URLs
    Url,
}

/// A single list entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListItem {
    /// Entry value
    pub value: String,
}

/// Request to create a list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateListRequest {
    /// List name
    pub name: String,

    /// Description shown in the dashboard
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Entry type
    #[serde(rename = "type")]
    pub list_type: ListType,

    /// Initial entries
    pub items: Vec<ListItem>,
}

impl CreateListRequest {
    /// Build a domain list request from plain domain strings
    #[must_use]
    pub fn domains(name: impl Into<String>, domains: &[String]) -> Self {
        Self {
            name: name.into(),
            description: Some(String::from("Created by cf-adblock.")),
            list_type: ListType::Domain,
            items: domains
                .iter()
                .map(|d| ListItem { value: d.clone() })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_without_count() {
        let body = r#"{"id":"abc","name":"[AdBlock-x] 1","type":"DOMAIN"}"#;
        let list: GatewayList = serde_json::from_str(body).unwrap();
        assert_eq!(list.count, 0);
        assert_eq!(list.list_type.as_deref(), Some("DOMAIN"));
        assert!(list.has_prefix("[AdBlock-x]"));
        assert!(!list.has_prefix("[AdBlock-y]"));
    }

    #[test]
    fn test_list_with_null_count() {
        let body = r#"{"id":"abc","name":"Corp","count":null}"#;
        let list: GatewayList = serde_json::from_str(body).unwrap();
        assert_eq!(list.count, 0);
    }

    #[test]
    fn test_create_request_shape() {
        let req = CreateListRequest::domains("n", &["a.com".to_string(), "b.com".to_string()]);
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["type"], "DOMAIN");
        assert_eq!(json["items"][1]["value"], "b.com");
        assert_eq!(json["name"], "n");
    }
}
