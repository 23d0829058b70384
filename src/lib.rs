//! Travel Concierge - sequential multi-agent trip planning
//!
//! A fixed, ordered set of agents (planner, flights, hotels, food, itinerary,
//! preference memory) each contribute one fragment of a trip plan to a shared
//! Task State. The orchestrator runs them one at a time, retries failures a
//! bounded number of times, records exhausted failures as error objects
//! instead of aborting, and persists the final state as a JSON document.
//!
//! # Overview
//!
//! - [`pipeline::StepExecutor`] runs the current agent with retries
//! - [`pipeline::advance`] moves to the next agent or the terminal sentinel
//! - [`pipeline::RunDriver`] loops both and handles load/save
//! - [`agent`] holds the [`agent::Agent`] trait, the registry and the built-ins
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use serde_json::json;
//! use travel_concierge::agent::AgentRegistry;
//! use travel_concierge::pipeline::{RetryPolicy, RunDriver};
//! use travel_concierge::task::TaskState;
//! use travel_concierge::testing::StaticAgent;
//!
//! # tokio_test::block_on(async {
//! let registry = AgentRegistry::from_agents(vec![
//!     Arc::new(StaticAgent::new("A", json!({"ok": true}))),
//! ])
//! .unwrap();
//! let driver = RunDriver::new(Arc::new(registry), RetryPolicy::default());
//!
//! let mut state = TaskState::starting_at("A");
//! let report = driver.drive(&mut state).await;
//!
//! assert!(state.is_terminal());
//! assert_eq!(report.succeeded, vec!["A"]);
//! # });
//! ```

pub mod agent;
pub mod config;
pub mod error;
pub mod observability;
pub mod persistence;
pub mod pipeline;
pub mod report;
pub mod store;
pub mod task;
pub mod testing;

pub use agent::{Agent, AgentRegistry};
pub use config::ConciergeConfig;
pub use error::{AgentError, ConciergeError, ConciergeResult};
pub use pipeline::{RetryPolicy, RunDriver, RunReport};
pub use task::{Memory, TaskState, TripContext};
