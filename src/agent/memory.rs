//! Memory agent: records the user's standing preferences in the preference store

use super::Agent;
use crate::error::AgentError;
use crate::store::PreferenceStore;
use crate::task::TaskState;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

pub struct MemoryAgent {
    store: Arc<dyn PreferenceStore>,
    preferences: BTreeMap<String, String>,
}

impl MemoryAgent {
    pub const NAME: &'static str = "MemoryAgent";

    pub fn new(store: Arc<dyn PreferenceStore>, preferences: BTreeMap<String, String>) -> Self {
        Self { store, preferences }
    }
}

#[async_trait]
impl Agent for MemoryAgent {
    fn name(&self) -> &str {
        Self::NAME
    }

    /// Plain overwrites, so a retried attempt leaves the store unchanged
    async fn execute(&self, _state: &TaskState) -> Result<Value, AgentError> {
        for (key, value) in &self.preferences {
            self.store.set(key, value)?;
        }

        let stored_keys: Vec<&String> = self.preferences.keys().collect();
        Ok(json!({ "stored_keys": stored_keys }))
    }
}
