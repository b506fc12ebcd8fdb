//! In-memory gateway used by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use gateway_core::{GatewayError, GatewayList, GatewayRule, GatewayStore, Result, RuleRequest};
use std::collections::HashSet;
use std::sync::Mutex;

/// A mutating call seen by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CreateList { name: String, size: usize },
    DeleteList { id: String },
    CreateRule { name: String, traffic: String },
    UpdateRule { id: String, traffic: String },
    DeleteRule { id: String },
}

#[derive(Default)]
struct State {
    lists: Vec<(GatewayList, Vec<String>)>,
    rules: Vec<GatewayRule>,
    calls: Vec<Call>,
    next_id: u32,
}

/// Gateway store backed by vectors
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
    duplicate_names: HashSet<String>,
    fail_create_names: HashSet<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report "already exists" when creating a list with this name
    pub fn with_duplicate(mut self, name: &str) -> Self {
        self.duplicate_names.insert(name.to_string());
        self
    }

    /// Fail with a server error when creating a list with this name
    pub fn with_failing_create(mut self, name: &str) -> Self {
        self.fail_create_names.insert(name.to_string());
        self
    }

    /// Seed a list holding `count` placeholder entries
    pub fn seed_list(&self, name: &str, count: u64) -> String {
        let mut state = self.state.lock().unwrap();
        let id = next_id(&mut state, "list");
        state.lists.push((
            GatewayList {
                id: id.clone(),
                name: name.to_string(),
                count,
                list_type: Some("DOMAIN".into()),
                description: None,
                created_at: None,
                updated_at: None,
            },
            Vec::new(),
        ));
        id
    }

    /// Seed a rule
    pub fn seed_rule(&self, name: &str) -> String {
        let mut state = self.state.lock().unwrap();
        let id = next_id(&mut state, "rule");
        state.rules.push(rule(&id, name, "block", ""));
        id
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn lists(&self) -> Vec<GatewayList> {
        let state = self.state.lock().unwrap();
        state.lists.iter().map(|(l, _)| l.clone()).collect()
    }

    pub fn list_items(&self, name: &str) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state
            .lists
            .iter()
            .find(|(l, _)| l.name == name)
            .map(|(_, items)| items.clone())
            .unwrap_or_default()
    }

    pub fn rules(&self) -> Vec<GatewayRule> {
        self.state.lock().unwrap().rules.clone()
    }
}

fn next_id(state: &mut State, kind: &str) -> String {
    state.next_id += 1;
    format!("{kind}-{}", state.next_id)
}

fn rule(id: &str, name: &str, action: &str, traffic: &str) -> GatewayRule {
    GatewayRule {
        id: id.to_string(),
        name: name.to_string(),
        description: None,
        action: action.to_string(),
        enabled: true,
        filters: vec!["dns".into()],
        traffic: traffic.to_string(),
        precedence: None,
        created_at: None,
        updated_at: None,
    }
}

#[async_trait]
impl GatewayStore for MemoryStore {
    async fn list_lists(&self) -> Result<Vec<GatewayList>> {
        Ok(self.lists())
    }

    async fn create_list(&self, name: &str, domains: &[String]) -> Result<GatewayList> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::CreateList {
            name: name.to_string(),
            size: domains.len(),
        });

        if self.duplicate_names.contains(name) {
            return Err(GatewayError::AlreadyExists {
                name: name.to_string(),
            });
        }
        if self.fail_create_names.contains(name) {
            return Err(GatewayError::Api {
                status: 500,
                code: None,
                message: "internal error".into(),
            });
        }

        let id = next_id(&mut state, "list");
        let list = GatewayList {
            id,
            name: name.to_string(),
            count: domains.len() as u64,
            list_type: Some("DOMAIN".into()),
            description: None,
            created_at: None,
            updated_at: None,
        };
        state.lists.push((list.clone(), domains.to_vec()));
        Ok(list)
    }

    async fn delete_list(&self, list_id: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::DeleteList {
            id: list_id.to_string(),
        });

        let before = state.lists.len();
        state.lists.retain(|(l, _)| l.id != list_id);
        if state.lists.len() == before {
            return Err(GatewayError::NotFound {
                resource: list_id.to_string(),
            });
        }
        Ok(())
    }

    async fn list_rules(&self) -> Result<Vec<GatewayRule>> {
        Ok(self.rules())
    }

    async fn create_rule(&self, request: &RuleRequest) -> Result<GatewayRule> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::CreateRule {
            name: request.name.clone(),
            traffic: request.traffic.clone(),
        });

        let id = next_id(&mut state, "rule");
        let created = rule(&id, &request.name, "block", &request.traffic);
        state.rules.push(created.clone());
        Ok(created)
    }

    async fn update_rule(&self, rule_id: &str, request: &RuleRequest) -> Result<GatewayRule> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::UpdateRule {
            id: rule_id.to_string(),
            traffic: request.traffic.clone(),
        });

        let existing = state
            .rules
            .iter_mut()
            .find(|r| r.id == rule_id)
            .ok_or_else(|| GatewayError::NotFound {
                resource: rule_id.to_string(),
            })?;
        existing.name = request.name.clone();
        existing.traffic = request.traffic.clone();
        Ok(existing.clone())
    }

    async fn delete_rule(&self, rule_id: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::DeleteRule {
            id: rule_id.to_string(),
        });
        state.rules.retain(|r| r.id != rule_id);
        Ok(())
    }
}
