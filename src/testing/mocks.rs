//! Mock agents for testing
//!
//! Scripted agents that succeed, fail a fixed number of times, or always fail,
//! counting every invocation so retry behaviour can be asserted exactly.

use crate::agent::Agent;
use crate::error::AgentError;
use crate::task::TaskState;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicU32, Ordering};

/// Agent that always returns the same value
#[derive(Debug, Clone)]
pub struct StaticAgent {
    name: String,
    output: Value,
}

impl StaticAgent {
    pub fn new(name: &str, output: Value) -> Self {
        Self {
            name: name.to_string(),
            output,
        }
    }
}

#[async_trait]
impl Agent for StaticAgent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, _state: &TaskState) -> Result<Value, AgentError> {
        Ok(self.output.clone())
    }
}

/// Agent failing its first `failures` calls, then returning `output`
#[derive(Debug)]
pub struct ScriptedAgent {
    name: String,
    failures: u32,
    message: String,
    output: Value,
    calls: AtomicU32,
}

impl ScriptedAgent {
    pub fn new(name: &str, failures: u32, message: &str, output: Value) -> Self {
        Self {
            name: name.to_string(),
            failures,
            message: message.to_string(),
            output,
            calls: AtomicU32::new(0),
        }
    }

    pub fn succeeding(name: &str, output: Value) -> Self {
        Self::new(name, 0, "", output)
    }

    pub fn failing_then_succeeding(name: &str, failures: u32, output: Value) -> Self {
        Self::new(name, failures, &format!("{name} transient failure"), output)
    }

    pub fn always_failing(name: &str, message: &str) -> Self {
        Self::new(name, u32::MAX, message, Value::Null)
    }

    /// Number of `execute` calls so far
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Agent for ScriptedAgent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, _state: &TaskState) -> Result<Value, AgentError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures {
            Err(AgentError::execution_failed(self.message.clone()))
        } else {
            Ok(self.output.clone())
        }
    }
}

/// Agent that records which memory entries it could see when called
#[derive(Debug)]
pub struct ObservingAgent {
    name: String,
    seen: std::sync::Mutex<Vec<Vec<String>>>,
}

impl ObservingAgent {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            seen: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Memory keys visible on each call, in call order
    pub fn observed(&self) -> Vec<Vec<String>> {
        self.seen.lock().map(|seen| seen.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Agent for ObservingAgent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, state: &TaskState) -> Result<Value, AgentError> {
        let keys: Vec<String> = state.memory.agents().map(str::to_string).collect();
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(keys.clone());
        }
        Ok(serde_json::json!({ "saw": keys }))
    }
}
