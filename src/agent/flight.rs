//! Flight agent: mock round-trip offers for the planned dates

use super::{Agent, PlannerAgent};
use crate::error::AgentError;
use crate::task::TaskState;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};

/// One flight offer
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FlightOffer {
    pub airline: String,
    pub price: u32,
    pub depart: Option<String>,
    #[serde(rename = "return")]
    pub return_date: Option<String>,
    pub duration: String,
}

/// Offers sorted by ascending price
pub fn mock_flights(depart: Option<&str>, return_date: Option<&str>) -> Vec<FlightOffer> {
    let mut flights: Vec<FlightOffer> = [
        ("Saudia", 420, "12h 30m"),
        ("Emirates", 450, "13h"),
        ("Qatar Airways", 480, "11h 50m"),
    ]
    .into_iter()
    .map(|(airline, price, duration)| FlightOffer {
        airline: airline.to_string(),
        price,
        depart: depart.map(str::to_string),
        return_date: return_date.map(str::to_string),
        duration: duration.to_string(),
    })
    .collect();

    flights.sort_by_key(|flight| flight.price);
    flights
}

#[derive(Debug, Clone)]
pub struct FlightAgent {
    origin: String,
    destination: String,
}

impl FlightAgent {
    pub const NAME: &'static str = "FlightAgent";

    pub fn new(origin: String, destination: String) -> Self {
        Self {
            origin,
            destination,
        }
    }
}

#[async_trait]
impl Agent for FlightAgent {
    fn name(&self) -> &str {
        Self::NAME
    }

    /// Dates come from the planner's memory entry; an errored or absent
    /// planner yields offers without dates.
    async fn execute(&self, state: &TaskState) -> Result<Value, AgentError> {
        let dates = state
            .memory
            .object(PlannerAgent::NAME)
            .and_then(|planner| planner.get("dates"));
        let depart = dates.and_then(|d| d.get("start")).and_then(Value::as_str);
        let return_date = dates.and_then(|d| d.get("end")).and_then(Value::as_str);

        Ok(json!({
            "origin": self.origin,
            "destination": self.destination,
            "flights": mock_flights(depart, return_date),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent() -> FlightAgent {
        FlightAgent::new("JFK".to_string(), "JED".to_string())
    }

    #[test]
    fn test_flights_sorted_by_price() {
        let flights = mock_flights(Some("2025-12-10"), Some("2025-12-15"));
        let prices: Vec<u32> = flights.iter().map(|f| f.price).collect();

        assert_eq!(prices, vec![420, 450, 480]);
        assert_eq!(flights[0].airline, "Saudia");
    }

    #[tokio::test]
    async fn test_uses_planner_dates() {
        let mut state = TaskState::starting_at(FlightAgent::NAME);
        let planner = PlannerAgent::plan("umrah in december");
        state
            .memory
            .record(PlannerAgent::NAME, planner.as_object().unwrap().clone());

        let output = agent().execute(&state).await.unwrap();

        assert_eq!(output["origin"], json!("JFK"));
        assert_eq!(output["destination"], json!("JED"));
        assert_eq!(output["flights"][0]["depart"], json!("2025-12-10"));
        assert_eq!(output["flights"][0]["return"], json!("2025-12-15"));
    }

    #[tokio::test]
    async fn test_tolerates_failed_planner() {
        let mut state = TaskState::starting_at(FlightAgent::NAME);
        let failure = AgentError::execution_failed("parse error").to_error_object();
        state.memory.record(PlannerAgent::NAME, failure);

        let output = agent().execute(&state).await.unwrap();

        assert_eq!(output["flights"].as_array().unwrap().len(), 3);
        assert_eq!(output["flights"][0]["depart"], Value::Null);
    }
}
