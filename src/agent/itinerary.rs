//! Itinerary agent: a prayer-friendly daily schedule for the trip dates

use super::{Agent, FoodAgent, HotelAgent, PlannerAgent};
use crate::error::AgentError;
use crate::task::{AgentOutput, TaskState};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::{Map, Value};

const DATE_FORMAT: &str = "%Y-%m-%d";
const FALLBACK_RESTAURANT: &str = "local halal spot";
const FALLBACK_HOTEL: &str = "your hotel";
/// Longest trip the schedule is generated for
const MAX_DAYS: i64 = 60;

#[derive(Debug, Default)]
pub struct ItineraryAgent;

impl ItineraryAgent {
    pub const NAME: &'static str = "ItineraryAgent";

    pub fn new() -> Self {
        Self
    }

    /// One `day_N` entry per day from `start` to `end` inclusive
    pub fn build(
        start: NaiveDate,
        end: NaiveDate,
        restaurant: &str,
        hotel: &str,
    ) -> Result<Map<String, Value>, AgentError> {
        let num_days = (end - start).num_days() + 1;
        if num_days < 1 {
            return Err(AgentError::missing_input(format!(
                "trip ends ({end}) before it starts ({start})"
            )));
        }
        if num_days > MAX_DAYS {
            return Err(AgentError::missing_input(format!(
                "trip of {num_days} days exceeds {MAX_DAYS} day limit"
            )));
        }

        let mut itinerary = Map::new();
        for day in 1..=num_days {
            let events = vec![
                "5:30 AM: Fajr prayer at Masjid al-Haram".to_string(),
                format!("7:00 AM: Breakfast at {restaurant}"),
                "9:00 AM: Perform Umrah or visit holy sites".to_string(),
                "12:00 PM: Explore local markets".to_string(),
                format!("3:00 PM: Rest at {hotel}"),
                "6:00 PM: Maghrib prayer & dinner nearby".to_string(),
            ];
            itinerary.insert(
                format!("day_{day}"),
                Value::Array(events.into_iter().map(Value::String).collect()),
            );
        }

        Ok(itinerary)
    }
}

fn planner_date(planner: Option<&AgentOutput>, key: &str) -> Result<NaiveDate, AgentError> {
    let raw = planner
        .and_then(|p| p.get("dates"))
        .and_then(|dates| dates.get(key))
        .and_then(Value::as_str)
        .ok_or_else(|| AgentError::missing_input(format!("planner has no `dates.{key}`")))?;

    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|e| AgentError::missing_input(format!("invalid `dates.{key}` '{raw}': {e}")))
}

/// `name` of the first element of `memory[agent][list]`
fn first_name<'a>(state: &'a TaskState, agent: &str, list: &str) -> Option<&'a str> {
    state
        .memory
        .object(agent)
        .and_then(|entry| entry.get(list))
        .and_then(Value::as_array)
        .and_then(|items| items.first())
        .and_then(|item| item.get("name"))
        .and_then(Value::as_str)
}

#[async_trait]
impl Agent for ItineraryAgent {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn execute(&self, state: &TaskState) -> Result<Value, AgentError> {
        let planner = state.memory.object(PlannerAgent::NAME);
        let start = planner_date(planner, "start")?;
        let end = planner_date(planner, "end")?;

        let restaurant =
            first_name(state, FoodAgent::NAME, "restaurants").unwrap_or(FALLBACK_RESTAURANT);
        let hotel = first_name(state, HotelAgent::NAME, "hotels").unwrap_or(FALLBACK_HOTEL);

        Ok(Value::Object(Self::build(start, end, restaurant, hotel)?))
    }
}
