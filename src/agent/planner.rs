//! Planner agent: turns the free-text user goal into structured trip context

use super::Agent;
use crate::error::AgentError;
use crate::task::{AgentOutput, Budget, TaskState, Travelers, TripContext, TripDates};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value};

static ADULTS_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s*adults?").expect("adults pattern is valid"));

// Singular "1 child" counts as well as "2 children"
static CHILDREN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s*child(?:ren)?").expect("children pattern is valid"));

const SUBTASKS: [&str; 4] = [
    "Find budget round-trip flights to Jeddah (JED)",
    "Book hotel near Masjid al-Haram in Makkah",
    "Suggest affordable halal food options nearby",
    "Build daily prayer-friendly and rest-optimized itinerary",
];

/// Keyword-driven goal parser
#[derive(Debug, Default)]
pub struct PlannerAgent;

impl PlannerAgent {
    pub const NAME: &'static str = "PlannerAgent";

    pub fn new() -> Self {
        Self
    }

    /// Break a goal sentence into location, dates, travelers, budget and subtasks
    pub fn plan(goal: &str) -> Value {
        let goal = goal.to_lowercase();

        let location = if goal.contains("umrah") {
            "Makkah, Saudi Arabia"
        } else {
            ""
        };

        let dates = if goal.contains("december") {
            json!({"start": "2025-12-10", "end": "2025-12-15"})
        } else {
            json!({})
        };

        let adults = capture_count(&ADULTS_PATTERN, &goal).unwrap_or(1);
        let children = capture_count(&CHILDREN_PATTERN, &goal).unwrap_or(0);

        let budget = if goal.contains("budget") || goal.contains("cheap") {
            json!({"level": "low", "estimated_total_usd": 2500})
        } else {
            json!({})
        };

        json!({
            "subtasks": SUBTASKS,
            "location": location,
            "dates": dates,
            "travelers": {"adults": adults, "children": children},
            "budget": budget,
        })
    }
}

fn capture_count(pattern: &Regex, text: &str) -> Option<u32> {
    pattern
        .captures(text)
        .and_then(|captures| captures.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

fn field<T: serde::de::DeserializeOwned>(output: &AgentOutput, key: &str) -> Option<T> {
    output
        .get(key)
        .cloned()
        .and_then(|value| serde_json::from_value(value).ok())
}

#[async_trait]
impl Agent for PlannerAgent {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn execute(&self, state: &TaskState) -> Result<Value, AgentError> {
        Ok(Self::plan(state.user_goal.as_deref().unwrap_or("")))
    }

    fn update_context(&self, output: &AgentOutput, context: &mut TripContext) {
        context.subtasks = field::<Vec<String>>(output, "subtasks");
        context.location = field::<String>(output, "location");
        context.dates = field::<TripDates>(output, "dates");
        context.travelers = field::<Travelers>(output, "travelers");
        context.budget = field::<Budget>(output, "budget");
    }
}
