//! Plain-text rendering of a result document
//!
//! Read-only: takes the persisted document as a JSON value and lays out the
//! itinerary, food, hotel and flight sections, followed by any agent whose
//! memory entry is an error object. Missing sections are simply omitted.

use serde_json::{Map, Value};
use std::fmt;

/// Render a result document for the terminal
pub fn render_summary(document: &Value) -> String {
    Summary::new(document).to_string()
}

/// Display adapter over a result document
pub struct Summary<'a> {
    document: &'a Value,
    memory: Option<&'a Map<String, Value>>,
}

impl<'a> Summary<'a> {
    pub fn new(document: &'a Value) -> Self {
        Self {
            document,
            memory: document.get("memory").and_then(Value::as_object),
        }
    }

    /// Object entry for `agent`, unless it is missing or an error object
    fn section(&self, agent: &str) -> Option<&'a Map<String, Value>> {
        self.memory?
            .get(agent)
            .and_then(Value::as_object)
            .filter(|entry| !entry.contains_key("error"))
    }

    fn list(&self, agent: &str, key: &str) -> Option<&'a Vec<Value>> {
        self.section(agent)?.get(key)?.as_array()
    }

    fn overview(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\nTrip Overview")?;
        if let Some(location) = self.document.get("location").and_then(Value::as_str) {
            if !location.is_empty() {
                writeln!(f, "  Destination: {location}")?;
            }
        }
        if let Some(dates) = self.document.get("dates") {
            let start = text(dates, "start");
            let end = text(dates, "end");
            if !start.is_empty() || !end.is_empty() {
                writeln!(f, "  Dates: {start} to {end}")?;
            }
        }
        if let Some(level) = self
            .document
            .get("budget")
            .and_then(|budget| budget.get("level"))
            .and_then(Value::as_str)
        {
            writeln!(f, "  Budget: {level}")?;
        }

        let agents: Vec<&str> = self
            .memory
            .into_iter()
            .flat_map(|memory| memory.keys().map(String::as_str))
            .collect();
        if agents.is_empty() {
            writeln!(f, "  No agent results recorded")
        } else {
            writeln!(f, "  Agents: {}", agents.join(", "))
        }
    }

    fn itinerary(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(days) = self.section("ItineraryAgent") else {
            return Ok(());
        };
        writeln!(f, "\nDaily Itinerary")?;
        for (day, events) in days {
            writeln!(f, "  {}", capitalize(&day.replace('_', " ")))?;
            for event in events.as_array().into_iter().flatten().filter_map(Value::as_str) {
                writeln!(f, "    - {event}")?;
            }
        }
        Ok(())
    }

    fn food(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(restaurants) = self.list("FoodAgent", "restaurants") else {
            return Ok(());
        };
        writeln!(f, "\nFood Options")?;
        for r in restaurants {
            writeln!(
                f,
                "  {} ({}) - {} stars - {}",
                text(r, "name"),
                text(r, "type"),
                text(r, "rating"),
                text(r, "distance")
            )?;
        }
        Ok(())
    }

    fn hotels(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(hotels) = self.list("HotelAgent", "hotels") else {
            return Ok(());
        };
        writeln!(f, "\nHotel Options")?;
        for h in hotels {
            writeln!(
                f,
                "  {} - ${} per night - {} - {} stars",
                text(h, "name"),
                text(h, "price_per_night"),
                text(h, "distance_to_kaaba"),
                text(h, "rating")
            )?;
        }
        Ok(())
    }

    fn flights(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(flights) = self.list("FlightAgent", "flights") else {
            return Ok(());
        };
        writeln!(f, "\nFlights")?;
        for flight in flights {
            writeln!(
                f,
                "  {} - ${} - Depart: {} - Return: {}",
                text(flight, "airline"),
                text(flight, "price"),
                text(flight, "depart"),
                text(flight, "return")
            )?;
        }
        Ok(())
    }

    fn errors(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let failed: Vec<(&String, &str)> = self
            .memory
            .into_iter()
            .flatten()
            .filter_map(|(agent, entry)| {
                let entry = entry.as_object().filter(|entry| entry.len() == 1)?;
                Some((agent, entry.get("error")?.as_str()?))
            })
            .collect();
        if failed.is_empty() {
            return Ok(());
        }
        writeln!(f, "\nAgent Errors")?;
        for (agent, message) in failed {
            writeln!(f, "  {agent}: {message}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Smart Travel Concierge")?;
        writeln!(f, "======================")?;
        self.overview(f)?;
        self.itinerary(f)?;
        self.food(f)?;
        self.hotels(f)?;
        self.flights(f)?;
        self.errors(f)
    }
}

/// Field as display text; strings unquoted, absent fields blank
fn text(value: &Value, key: &str) -> String {
    match value.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
