//! Sequencer: moves `current_agent` along the registry's linear order

use crate::agent::AgentRegistry;
use crate::task::TaskState;
use tracing::{debug, warn};

/// Outcome of one `advance` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Moved to the named agent
    Next(String),
    /// The last declared agent finished; the state is now terminal
    Finished,
    /// The current name is not declared; the state was forced terminal
    UnknownAgent(String),
    /// The state was already terminal and is unchanged
    AlreadyTerminal,
}

/// Set `current_agent` to the following declared name or the terminal sentinel
pub fn advance(registry: &AgentRegistry, state: &mut TaskState) -> Transition {
    let Some(current) = state.current_agent.take() else {
        return Transition::AlreadyTerminal;
    };

    let transition = match registry.position(&current) {
        Some(index) => match registry.name_at(index + 1) {
            Some(next) => Transition::Next(next.to_string()),
            None => Transition::Finished,
        },
        None => {
            warn!(
                agent = %current,
                "Current agent is not in the declared sequence; ending run"
            );
            Transition::UnknownAgent(current.clone())
        }
    };

    if let Transition::Next(next) = &transition {
        state.current_agent = Some(next.clone());
    }

    debug!(from = %current, to = ?state.current_agent, "Advanced sequence");
    transition
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::Agent;
    use crate::testing::mocks::StaticAgent;
    use serde_json::json;
    use std::sync::Arc;

    fn registry(names: &[&str]) -> AgentRegistry {
        let agents: Vec<Arc<dyn Agent>> = names
            .iter()
            .map(|name| Arc::new(StaticAgent::new(name, json!({}))) as Arc<dyn Agent>)
            .collect();
        AgentRegistry::from_agents(agents).unwrap()
    }

    #[test]
    fn test_advances_in_order() {
        let registry = registry(&["A", "B", "C"]);
        let mut state = TaskState::starting_at("A");

        assert_eq!(advance(&registry, &mut state), Transition::Next("B".to_string()));
        assert_eq!(state.current_agent.as_deref(), Some("B"));
        assert_eq!(advance(&registry, &mut state), Transition::Next("C".to_string()));
        assert_eq!(advance(&registry, &mut state), Transition::Finished);
        assert!(state.is_terminal());
    }

    #[test]
    fn test_terminal_is_idempotent() {
        let registry = registry(&["A"]);
        let mut state = TaskState::default();
        let before = state.clone();

        assert_eq!(advance(&registry, &mut state), Transition::AlreadyTerminal);
        assert_eq!(advance(&registry, &mut state), Transition::AlreadyTerminal);
        assert_eq!(state, before);
    }

    // Undeclared names end the run instead of failing it
    #[test]
    fn test_unknown_name_becomes_terminal() {
        let registry = registry(&["A", "B"]);
        let mut state = TaskState::starting_at("Nowhere");

        assert_eq!(
            advance(&registry, &mut state),
            Transition::UnknownAgent("Nowhere".to_string())
        );
        assert!(state.is_terminal());
    }

    #[test]
    fn test_memory_untouched() {
        let registry = registry(&["A", "B"]);
        let mut state = TaskState::starting_at("A");

        advance(&registry, &mut state);
        assert!(state.memory.is_empty());
    }
}
