//! Agent Registry
//!
//! A fixed, ordered list of agent names established at startup. Each name is
//! either backed by an implementation or a placeholder that the executor skips.
//! The order is the only transition graph: strictly linear, no branching.

use super::Agent;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Registry construction errors
#[derive(Debug, Error, PartialEq)]
pub enum RegistryError {
    #[error("Agent '{0}' is declared more than once")]
    DuplicateAgent(String),
    #[error("Agent sequence is empty")]
    EmptySequence,
}

struct RegistryEntry {
    name: String,
    agent: Option<Arc<dyn Agent>>,
}

/// Ordered mapping from agent name to implementation
pub struct AgentRegistry {
    entries: Vec<RegistryEntry>,
}

impl fmt::Debug for AgentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|entry| {
                (
                    entry.name.as_str(),
                    if entry.agent.is_some() {
                        "registered"
                    } else {
                        "placeholder"
                    },
                )
            }))
            .finish()
    }
}

impl AgentRegistry {
    /// Registry whose sequence is the agents' own order
    pub fn from_agents(agents: Vec<Arc<dyn Agent>>) -> Result<Self, RegistryError> {
        let sequence: Vec<String> = agents.iter().map(|a| a.name().to_string()).collect();
        Self::from_sequence(&sequence, agents)
    }

    /// Registry for a declared sequence, resolving names against `available`
    ///
    /// Declared names with no implementation stay in the sequence as
    /// placeholders. Available agents that are not declared are dropped.
    pub fn from_sequence(
        sequence: &[String],
        available: Vec<Arc<dyn Agent>>,
    ) -> Result<Self, RegistryError> {
        if sequence.is_empty() {
            return Err(RegistryError::EmptySequence);
        }

        let mut implementations: HashMap<String, Arc<dyn Agent>> = HashMap::new();
        for agent in available {
            let name = agent.name().to_string();
            if implementations.insert(name.clone(), agent).is_some() {
                return Err(RegistryError::DuplicateAgent(name));
            }
        }

        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(sequence.len());
        for name in sequence {
            if !seen.insert(name.clone()) {
                return Err(RegistryError::DuplicateAgent(name.clone()));
            }

            let agent = implementations.remove(name);
            if agent.is_none() {
                warn!(agent = %name, "Declared agent has no implementation; it will be skipped");
            }
            entries.push(RegistryEntry {
                name: name.clone(),
                agent,
            });
        }

        for unused in implementations.keys() {
            debug!(agent = %unused, "Agent implementation not in sequence");
        }

        Ok(Self { entries })
    }

    /// Implementation registered under `name`, if any
    pub fn lookup(&self, name: &str) -> Option<&Arc<dyn Agent>> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .and_then(|entry| entry.agent.as_ref())
    }

    /// Declared names in execution order
    pub fn sequence(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    /// Index of `name` in the sequence
    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.name == name)
    }

    /// Name declared at `index`
    pub fn name_at(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|entry| entry.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
