//! Configuration loading and validation tests
//!
//! Tests focus on observable behaviour: which values a file resolves to and
//! which files are rejected.

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::NamedTempFile;
use travel_concierge::config::{ConciergeConfig, ConfigError, DEFAULT_SEQUENCE};

fn load(content: &str) -> Result<ConciergeConfig, ConfigError> {
    let mut temp_file = NamedTempFile::new().unwrap();
    write!(temp_file, "{content}").unwrap();
    ConciergeConfig::load_from_file(temp_file.path())
}

#[test]
fn test_config_loads_successfully_from_full_toml() {
    let config = load(
        r#"
[orchestrator]
task_path = "tasks/umrah.json"
result_path = "out/result.json"
max_retries = 4
retry_backoff_ms = 250
sequence = ["PlannerAgent", "FlightAgent"]

[fixtures]
dir = "fixtures"

[preferences]
store_path = "prefs.json"
[preferences.defaults]
preferred_airline = "Emirates"

[flights]
origin = "LHR"
destination = "MED"
"#,
    )
    .unwrap();

    assert_eq!(config.orchestrator.task_path, PathBuf::from("tasks/umrah.json"));
    assert_eq!(config.orchestrator.result_path, PathBuf::from("out/result.json"));
    assert_eq!(config.orchestrator.max_retries, 4);
    assert_eq!(config.orchestrator.retry_backoff(), Duration::from_millis(250));
    assert_eq!(config.orchestrator.sequence, vec!["PlannerAgent", "FlightAgent"]);
    assert_eq!(config.fixtures.dir, PathBuf::from("fixtures"));
    assert_eq!(config.preferences.store_path, PathBuf::from("prefs.json"));
    assert_eq!(config.preferences.defaults.len(), 1);
    assert_eq!(config.preferences.defaults["preferred_airline"], "Emirates");
    assert_eq!(config.flights.origin, "LHR");
    assert_eq!(config.flights.destination, "MED");
}

#[test]
fn test_empty_file_resolves_to_defaults() {
    let config = load("").unwrap();

    assert_eq!(config, ConciergeConfig::default());
    assert_eq!(config.orchestrator.max_retries, 2);
    assert_eq!(config.orchestrator.retry_backoff(), Duration::ZERO);
    assert_eq!(config.orchestrator.sequence, DEFAULT_SEQUENCE.to_vec());
    assert_eq!(config.preferences.defaults["preferred_food"], "halal");
}

#[test]
fn test_partial_section_keeps_other_defaults() {
    let config = load("[orchestrator]\nmax_retries = 0\n").unwrap();

    assert_eq!(config.orchestrator.max_retries, 0);
    assert_eq!(config.orchestrator.task_path, PathBuf::from("mcp_task.json"));
    assert_eq!(config.flights.origin, "JFK");
}

#[test]
fn test_shipped_config_matches_defaults() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("config/concierge.toml");
    let config = ConciergeConfig::load_from_file(&path).unwrap();

    assert_eq!(config, ConciergeConfig::default());
}

#[test]
fn test_invalid_toml_is_rejected() {
    assert!(matches!(
        load("[orchestrator\nmax_retries = 2"),
        Err(ConfigError::TomlParse(_))
    ));
}

#[test]
fn test_wrong_type_is_rejected() {
    assert!(matches!(
        load("[orchestrator]\nmax_retries = \"two\"\n"),
        Err(ConfigError::TomlParse(_))
    ));
}

#[test]
fn test_empty_sequence_is_rejected() {
    assert!(matches!(
        load("[orchestrator]\nsequence = []\n"),
        Err(ConfigError::InvalidConfig(_))
    ));
}

#[test]
fn test_duplicate_agent_is_rejected() {
    let err = load("[orchestrator]\nsequence = [\"PlannerAgent\", \"PlannerAgent\"]\n")
        .unwrap_err();

    assert!(matches!(err, ConfigError::InvalidConfig(_)));
    assert!(err.to_string().contains("PlannerAgent"));
}

#[test]
fn test_invalid_agent_name_is_rejected() {
    for name in ["Planner Agent", "agent/1", ""] {
        let content = format!("[orchestrator]\nsequence = [{name:?}]\n");
        assert!(
            matches!(load(&content), Err(ConfigError::InvalidAgentName(_))),
            "expected '{name}' to be rejected"
        );
    }
}

#[test]
fn test_missing_file_is_a_read_error() {
    let result = ConciergeConfig::load_from_file(std::path::Path::new("/nonexistent/concierge.toml"));
    assert!(matches!(result, Err(ConfigError::FileRead(_))));
}

#[test]
fn test_config_round_trips_through_toml() {
    let config = ConciergeConfig::default();
    let rendered = toml::to_string_pretty(&config).unwrap();

    assert_eq!(load(&rendered).unwrap(), config);
}
