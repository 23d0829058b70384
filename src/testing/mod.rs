//! Testing utilities and mock implementations
//!
//! Mock agents for exercising the orchestrator without fixtures or a
//! preference file on disk.

pub mod mocks;

pub use mocks::*;
