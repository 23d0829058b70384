//! Orchestration engine
//!
//! ```text
//! RunDriver ──► StepExecutor ──► Agent (via AgentRegistry)
//!     ▲              │
//!     └── loop ◄── Sequencer
//! ```
//!
//! The driver repeats execute-then-advance until `current_agent` is the
//! terminal sentinel, then writes the final state once.

pub mod run_driver;
pub mod sequencer;
pub mod step_executor;

pub use run_driver::{RunDriver, RunReport};
pub use sequencer::{advance, Transition};
pub use step_executor::{RetryPolicy, StepExecutor, StepOutcome, StepReport};
