//! Configuration system for the travel concierge
//!
//! Every section is optional; an empty file yields the same pipeline the
//! concierge ships with.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Names of the built-in agents in their default execution order
pub const DEFAULT_SEQUENCE: [&str; 6] = [
    "PlannerAgent",
    "FlightAgent",
    "HotelAgent",
    "FoodAgent",
    "ItineraryAgent",
    "MemoryAgent",
];

/// Main concierge configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConciergeConfig {
    #[serde(default)]
    pub orchestrator: OrchestratorSection,
    #[serde(default)]
    pub fixtures: FixturesSection,
    #[serde(default)]
    pub preferences: PreferencesSection,
    #[serde(default)]
    pub flights: FlightsSection,
}

/// Orchestration settings: document paths, retries and agent order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrchestratorSection {
    /// Initial task document
    #[serde(default = "default_task_path")]
    pub task_path: PathBuf,
    /// Final result document
    #[serde(default = "default_result_path")]
    pub result_path: PathBuf,
    /// Retries after the first attempt (default: 2)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Pause between attempts in milliseconds (default: 0)
    #[serde(default)]
    pub retry_backoff_ms: u64,
    /// Declared agent order
    #[serde(default = "default_sequence")]
    pub sequence: Vec<String>,
}

impl Default for OrchestratorSection {
    fn default() -> Self {
        Self {
            task_path: default_task_path(),
            result_path: default_result_path(),
            max_retries: default_max_retries(),
            retry_backoff_ms: 0,
            sequence: default_sequence(),
        }
    }
}

impl OrchestratorSection {
    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}

/// Location of static agent fixture documents
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FixturesSection {
    #[serde(default = "default_fixture_dir")]
    pub dir: PathBuf,
}

impl Default for FixturesSection {
    fn default() -> Self {
        Self {
            dir: default_fixture_dir(),
        }
    }
}

/// Preference store location and the values the memory agent records
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PreferencesSection {
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
    #[serde(default = "default_preferences")]
    pub defaults: BTreeMap<String, String>,
}

impl Default for PreferencesSection {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            defaults: default_preferences(),
        }
    }
}

/// Airport codes used by the flight agent
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlightsSection {
    #[serde(default = "default_origin")]
    pub origin: String,
    #[serde(default = "default_destination")]
    pub destination: String,
}

impl Default for FlightsSection {
    fn default() -> Self {
        Self {
            origin: default_origin(),
            destination: default_destination(),
        }
    }
}

fn default_task_path() -> PathBuf {
    PathBuf::from("mcp_task.json")
}

fn default_result_path() -> PathBuf {
    PathBuf::from("mcp_result.json")
}

fn default_max_retries() -> u32 {
    2
}

fn default_sequence() -> Vec<String> {
    DEFAULT_SEQUENCE.iter().map(|name| name.to_string()).collect()
}

fn default_fixture_dir() -> PathBuf {
    PathBuf::from("smart_travel_concierge/specs")
}

fn default_store_path() -> PathBuf {
    PathBuf::from("smart_travel_concierge/memory_store.json")
}

fn default_preferences() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("preferred_airline".to_string(), "Saudia".to_string()),
        ("preferred_food".to_string(), "halal".to_string()),
        ("budget_level".to_string(), "low".to_string()),
    ])
}

fn default_origin() -> String {
    "JFK".to_string()
}

fn default_destination() -> String {
    "JED".to_string()
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Invalid agent name: {0}")]
    InvalidAgentName(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ConciergeConfig {
    /// Load and validate configuration from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: ConciergeConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the declared sequence for empty, malformed or repeated names
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sequence = &self.orchestrator.sequence;
        if sequence.is_empty() {
            return Err(ConfigError::InvalidConfig(
                "orchestrator.sequence must name at least one agent".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for name in sequence {
            validate_agent_name(name)?;
            if !seen.insert(name.as_str()) {
                return Err(ConfigError::InvalidConfig(format!(
                    "agent '{name}' appears more than once in orchestrator.sequence"
                )));
            }
        }

        Ok(())
    }
}

/// Agent names must match [a-zA-Z0-9._-]+
fn validate_agent_name(name: &str) -> Result<(), ConfigError> {
    let valid_chars = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-');

    if name.is_empty() || !valid_chars {
        return Err(ConfigError::InvalidAgentName(format!(
            "Agent name '{name}' must match pattern [a-zA-Z0-9._-]+"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: ConciergeConfig = toml::from_str("").unwrap();

        assert_eq!(config, ConciergeConfig::default());
        assert_eq!(config.orchestrator.max_retries, 2);
        assert_eq!(config.orchestrator.sequence.len(), 6);
        assert_eq!(config.orchestrator.sequence[0], "PlannerAgent");
        assert_eq!(config.flights.origin, "JFK");
        assert_eq!(config.preferences.defaults["preferred_airline"], "Saudia");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_sections() {
        let toml_content = r#"
[orchestrator]
max_retries = 5
retry_backoff_ms = 50
sequence = ["PlannerAgent", "HotelAgent"]

[flights]
destination = "MED"
"#;

        let config: ConciergeConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.orchestrator.max_retries, 5);
        assert_eq!(config.orchestrator.retry_backoff(), Duration::from_millis(50));
        assert_eq!(config.orchestrator.sequence, vec!["PlannerAgent", "HotelAgent"]);
        assert_eq!(config.orchestrator.task_path, PathBuf::from("mcp_task.json"));
        assert_eq!(config.flights.origin, "JFK");
        assert_eq!(config.flights.destination, "MED");
    }

    #[test]
    fn test_preference_defaults_override() {
        let toml_content = r#"
[preferences]
store_path = "/tmp/prefs.json"

[preferences.defaults]
preferred_food = "vegetarian"
"#;

        let config: ConciergeConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.preferences.store_path, PathBuf::from("/tmp/prefs.json"));
        assert_eq!(config.preferences.defaults.len(), 1);
        assert_eq!(config.preferences.defaults["preferred_food"], "vegetarian");
    }

    #[test]
    fn test_invalid_agent_name() {
        assert!(validate_agent_name("Bad Agent").is_err());
        assert!(validate_agent_name("").is_err());
        assert!(validate_agent_name("Good.Agent_2-x").is_ok());
    }

    #[test]
    fn test_duplicate_sequence_rejected() {
        let mut config = ConciergeConfig::default();
        config.orchestrator.sequence = vec!["A".to_string(), "B".to_string(), "A".to_string()];

        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_empty_sequence_rejected() {
        let mut config = ConciergeConfig::default();
        config.orchestrator.sequence.clear();

        assert!(config.validate().is_err());
    }
}
