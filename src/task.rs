//! Task State: the single record threaded through a run
//!
//! The driver owns the state for the whole run and lends it out: `&mut` to the
//! step executor and sequencer, `&` to agents. Context fields are flattened so
//! the persisted document keeps `location`, `dates`, ... at the top level.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Map-shaped agent output, the only shape accepted into memory
pub type AgentOutput = Map<String, Value>;

/// Per-agent results in execution order
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Memory(Map<String, Value>);

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the successful output of an agent
    pub fn record(&mut self, agent: &str, output: AgentOutput) {
        self.0.insert(agent.to_string(), Value::Object(output));
    }

    pub fn get(&self, agent: &str) -> Option<&Value> {
        self.0.get(agent)
    }

    /// Object entry for an agent, `None` when absent or not a map
    pub fn object(&self, agent: &str) -> Option<&AgentOutput> {
        self.0.get(agent).and_then(Value::as_object)
    }

    pub fn contains(&self, agent: &str) -> bool {
        self.0.contains_key(agent)
    }

    /// Error message when the agent's entry is an error object
    pub fn error_of(&self, agent: &str) -> Option<&str> {
        self.object(agent)
            .and_then(|entry| entry.get("error"))
            .and_then(Value::as_str)
    }

    /// Agent names in insertion order
    pub fn agents(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

/// Trip dates as ISO `YYYY-MM-DD` strings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TripDates {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Travelers {
    #[serde(default = "default_adults")]
    pub adults: u32,
    #[serde(default)]
    pub children: u32,
}

impl Default for Travelers {
    fn default() -> Self {
        Self {
            adults: default_adults(),
            children: 0,
        }
    }
}

fn default_adults() -> u32 {
    1
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Budget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_total_usd: Option<u32>,
}

/// Trip context written once by the planner and read directly by later agents
///
/// Absent fields stay absent in the persisted document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TripContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dates: Option<TripDates>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub travelers: Option<Travelers>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<Budget>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtasks: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dietary_preferences: Option<Vec<String>>,
}

/// Position, accumulated memory and trip context of one run
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TaskState {
    /// Agent to execute next; `None` is the terminal sentinel
    pub current_agent: Option<String>,
    #[serde(default)]
    pub memory: Memory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_goal: Option<String>,
    #[serde(flatten)]
    pub context: TripContext,
    /// Top-level keys no component interprets, carried through unchanged
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TaskState {
    /// Fresh state positioned at `first_agent`
    pub fn starting_at<S: Into<String>>(first_agent: S) -> Self {
        Self {
            current_agent: Some(first_agent.into()),
            ..Default::default()
        }
    }

    pub fn with_user_goal<S: Into<String>>(mut self, goal: S) -> Self {
        self.user_goal = Some(goal.into());
        self
    }

    pub fn is_terminal(&self) -> bool {
        self.current_agent.is_none()
    }
}
