//! Agents and the registry that fixes their order
//!
//! An agent is one named pipeline step: it reads the current [`TaskState`] and
//! returns a map-shaped fragment of the plan. The executor validates the shape,
//! so implementations return a plain [`serde_json::Value`].

use crate::config::ConciergeConfig;
use crate::error::AgentError;
use crate::store::PreferenceStore;
use crate::task::{AgentOutput, TaskState, TripContext};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

pub mod fixtures;
pub mod flight;
pub mod food;
pub mod hotel;
pub mod itinerary;
pub mod memory;
pub mod planner;
pub mod registry;

pub use flight::FlightAgent;
pub use food::FoodAgent;
pub use hotel::HotelAgent;
pub use itinerary::ItineraryAgent;
pub use memory::MemoryAgent;
pub use planner::PlannerAgent;
pub use registry::{AgentRegistry, RegistryError};

/// Contract every pipeline step satisfies
///
/// `execute` may be called several times for the same state when earlier
/// attempts fail, so any side effect it performs must be idempotent.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Name under which results are stored in memory
    fn name(&self) -> &str;

    /// Produce this agent's contribution from the current state
    async fn execute(&self, state: &TaskState) -> Result<Value, AgentError>;

    /// Fold a successful output into the shared trip context
    ///
    /// Called once per successful step, just before the output is stored in
    /// memory. Never called for failed or exhausted agents.
    fn update_context(&self, _output: &AgentOutput, _context: &mut TripContext) {}
}

/// Build the six travel agents from configuration
pub fn builtin_agents(
    config: &ConciergeConfig,
    store: Arc<dyn PreferenceStore>,
) -> Vec<Arc<dyn Agent>> {
    vec![
        Arc::new(PlannerAgent::new()),
        Arc::new(FlightAgent::new(
            config.flights.origin.clone(),
            config.flights.destination.clone(),
        )),
        Arc::new(HotelAgent::new()),
        Arc::new(FoodAgent::new(config.fixtures.dir.clone())),
        Arc::new(ItineraryAgent::new()),
        Arc::new(MemoryAgent::new(store, config.preferences.defaults.clone())),
    ]
}

/// Registry for the configured sequence backed by the built-in agents
pub fn travel_registry(
    config: &ConciergeConfig,
    store: Arc<dyn PreferenceStore>,
) -> Result<AgentRegistry, RegistryError> {
    AgentRegistry::from_sequence(
        &config.orchestrator.sequence,
        builtin_agents(config, store),
    )
}
