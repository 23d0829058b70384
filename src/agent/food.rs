//! Food agent: restaurants from the food fixture matching dietary preferences

use super::fixtures::load_fixture_output;
use super::Agent;
use crate::error::AgentError;
use crate::task::TaskState;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::path::PathBuf;

pub const FOOD_FIXTURE: &str = "food_spec.json";
const DEFAULT_DIETARY_PREFERENCE: &str = "halal";
const MAX_RESTAURANTS: usize = 3;

#[derive(Debug, Clone)]
pub struct FoodAgent {
    fixture_dir: PathBuf,
}

impl FoodAgent {
    pub const NAME: &'static str = "FoodAgent";

    pub fn new(fixture_dir: PathBuf) -> Self {
        Self { fixture_dir }
    }
}

/// Keep restaurants whose `type` mentions any preference, case-insensitively
pub fn filter_restaurants(restaurants: &[Value], preferences: &[String]) -> Vec<Value> {
    let preferences: Vec<String> = preferences.iter().map(|p| p.to_lowercase()).collect();

    restaurants
        .iter()
        .filter(|restaurant| {
            let kind = restaurant
                .get("type")
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_lowercase();
            preferences.iter().any(|pref| kind.contains(pref.as_str()))
        })
        .take(MAX_RESTAURANTS)
        .cloned()
        .collect()
}

#[async_trait]
impl Agent for FoodAgent {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn execute(&self, state: &TaskState) -> Result<Value, AgentError> {
        let fixture = load_fixture_output(&self.fixture_dir, FOOD_FIXTURE)?;
        let restaurants = fixture
            .get("restaurants")
            .and_then(Value::as_array)
            .ok_or_else(|| AgentError::fixture("food fixture has no `restaurants` list"))?;

        let preferences = match &state.context.dietary_preferences {
            Some(preferences) if !preferences.is_empty() => preferences.clone(),
            _ => vec![DEFAULT_DIETARY_PREFERENCE.to_string()],
        };

        Ok(json!({ "restaurants": filter_restaurants(restaurants, &preferences) }))
    }
}
