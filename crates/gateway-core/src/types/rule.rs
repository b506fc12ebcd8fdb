use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A Zero Trust Gateway rule (firewall policy)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GatewayRule {
    /// Unique rule ID
    pub id: String,

    /// Rule name
    pub name: String,

    /// Free-form description
    #[serde(default)]
    pub description: Option<String>,

    /// Action applied on match (`block`, `allow`, ...)
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub action: String,

    /// Whether the rule is active
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub enabled: bool,

    /// Traffic types the rule applies to
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub filters: Vec<String>,

    /// Wirefilter traffic expression
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub traffic: String,

    /// Evaluation order
    #[serde(default)]
    pub precedence: Option<u64>,

    /// When the rule was created
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    /// When the rule was last modified
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl GatewayRule {
    /// Returns true if the rule name starts with the given prefix
    #[must_use]
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.name.starts_with(prefix)
    }
}

/// Rule action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleAction {
    /// Block matching traffic
    Block,
    /// Allow matching traffic
    Allow,
}

/// Traffic filter type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleFilter {
    /// DNS queries
    Dns,
    /// HTTP traffic
    Http,
    /// Layer 4 traffic
    L4,
}

/// Extra rule settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RuleSettings {
    /// Show the Cloudflare block page instead of NXDOMAIN
    pub block_page_enabled: bool,
}

/// Request body for creating or replacing a rule
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RuleRequest {
    /// Rule name
    pub name: String,

    /// Description shown in the dashboard
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Action applied on match
    pub action: RuleAction,

    /// Whether the rule is active
    pub enabled: bool,

    /// Traffic types the rule applies to
    pub filters: Vec<RuleFilter>,

    /// Wirefilter traffic expression
    pub traffic: String,

    /// Extra settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_settings: Option<RuleSettings>,
}

impl RuleRequest {
    /// A DNS block rule matching any domain in any of the given lists
    #[must_use]
    pub fn block_lists<S: AsRef<str>>(name: impl Into<String>, list_ids: &[S]) -> Self {
        Self {
            name: name.into(),
            description: Some(String::from("Created by cf-adblock.")),
            action: RuleAction::Block,
            enabled: true,
            filters: vec![RuleFilter::Dns],
            traffic: lists_traffic(list_ids),
            rule_settings: Some(RuleSettings {
                block_page_enabled: false,
            }),
        }
    }
}

/// Disjunction of `any(dns.domains[*] in $<id>)` over the list ids
#[must_use]
pub fn lists_traffic<S: AsRef<str>>(list_ids: &[S]) -> String {
    list_ids
        .iter()
        .map(|id| format!("any(dns.domains[*] in ${})", id.as_ref()))
        .collect::<Vec<_>>()
        .join(" or ")
}
