//! Hotel agent: cheapest mock stays near the Haram

use super::{Agent, PlannerAgent};
use crate::error::AgentError;
use crate::task::{AgentOutput, TaskState};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};

const DEFAULT_LOCATION: &str = "Makkah";
const DEFAULT_CHECKIN: &str = "2025-12-10";
const DEFAULT_CHECKOUT: &str = "2025-12-15";
const DEFAULT_BUDGET: &str = "low";
const MAX_HOTELS: usize = 3;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HotelOffer {
    pub name: String,
    pub price_per_night: u32,
    pub distance_to_kaaba: String,
    pub rating: f64,
}

/// Up to three offers sorted by nightly price
pub fn mock_hotels() -> Vec<HotelOffer> {
    let mut hotels: Vec<HotelOffer> = [
        ("Hilton Makkah", 120, "200m", 4.6),
        ("Swissotel Makkah", 100, "250m", 4.5),
        ("Al Safwah Hotel", 90, "180m", 4.4),
    ]
    .into_iter()
    .map(|(name, price_per_night, distance, rating)| HotelOffer {
        name: name.to_string(),
        price_per_night,
        distance_to_kaaba: distance.to_string(),
        rating,
    })
    .collect();

    hotels.sort_by_key(|hotel| hotel.price_per_night);
    hotels.truncate(MAX_HOTELS);
    hotels
}

#[derive(Debug, Default)]
pub struct HotelAgent;

impl HotelAgent {
    pub const NAME: &'static str = "HotelAgent";

    pub fn new() -> Self {
        Self
    }
}

fn planner_field<'a>(planner: Option<&'a AgentOutput>, key: &str) -> Option<&'a Value> {
    planner.and_then(|p| p.get(key))
}

fn non_empty_str<'a>(value: Option<&'a Value>) -> Option<&'a str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

#[async_trait]
impl Agent for HotelAgent {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn execute(&self, state: &TaskState) -> Result<Value, AgentError> {
        let planner = state.memory.object(PlannerAgent::NAME);

        let location = non_empty_str(planner_field(planner, "location")).unwrap_or(DEFAULT_LOCATION);
        let dates = planner_field(planner, "dates");
        let checkin = non_empty_str(dates.and_then(|d| d.get("start"))).unwrap_or(DEFAULT_CHECKIN);
        let checkout = non_empty_str(dates.and_then(|d| d.get("end"))).unwrap_or(DEFAULT_CHECKOUT);
        let budget = non_empty_str(planner_field(planner, "budget").and_then(|b| b.get("level")))
            .unwrap_or(DEFAULT_BUDGET);

        Ok(json!({
            "search": {
                "location": location,
                "checkin": checkin,
                "checkout": checkout,
                "budget_level": budget,
            },
            "hotels": mock_hotels(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hotels_sorted_by_price() {
        let hotels = mock_hotels();
        let names: Vec<&str> = hotels.iter().map(|h| h.name.as_str()).collect();

        assert_eq!(names, vec!["Al Safwah Hotel", "Swissotel Makkah", "Hilton Makkah"]);
    }

    #[tokio::test]
    async fn test_defaults_without_planner() {
        let state = TaskState::starting_at(HotelAgent::NAME);
        let output = HotelAgent::new().execute(&state).await.unwrap();

        assert_eq!(
            output["search"],
            json!({
                "location": "Makkah",
                "checkin": "2025-12-10",
                "checkout": "2025-12-15",
                "budget_level": "low"
            })
        );
        assert_eq!(output["hotels"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_reads_planner_context() {
        let mut state = TaskState::starting_at(HotelAgent::NAME);
        let planner = PlannerAgent::plan("umrah in december");
        state
            .memory
            .record(PlannerAgent::NAME, planner.as_object().unwrap().clone());

        let output = HotelAgent::new().execute(&state).await.unwrap();

        assert_eq!(output["search"]["location"], json!("Makkah, Saudi Arabia"));
        assert_eq!(output["search"]["budget_level"], json!("low"));
    }
}
