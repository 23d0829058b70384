//! Tests for logging configuration and format parsing
//!
//! Covers the pure parsing functions and that initializing twice is harmless.

use tracing::Level;
use travel_concierge::observability::logging::{init_logging, parse_level, LogFormat};

#[test]
fn test_log_format_parse_json() {
    assert!(matches!(LogFormat::parse("json"), LogFormat::Json));
    assert!(matches!(LogFormat::parse("JSON"), LogFormat::Json));
    assert!(matches!(LogFormat::parse("Json"), LogFormat::Json));
}

#[test]
fn test_log_format_parse_pretty() {
    assert!(matches!(LogFormat::parse("pretty"), LogFormat::Pretty));
    assert!(matches!(LogFormat::parse("PRETTY"), LogFormat::Pretty));
}

#[test]
fn test_log_format_parse_invalid_defaults_to_compact() {
    // Unset or unknown LOG_FORMAT gives the terminal-friendly format
    assert!(matches!(LogFormat::parse(""), LogFormat::Compact));
    assert!(matches!(LogFormat::parse("xml"), LogFormat::Compact));
    assert!(matches!(LogFormat::parse("123"), LogFormat::Compact));
}

#[test]
fn test_log_format_parse_whitespace() {
    assert!(matches!(LogFormat::parse("  json  "), LogFormat::Json));
    assert!(matches!(LogFormat::parse("json\n"), LogFormat::Json));
    assert!(matches!(LogFormat::parse("\tpretty"), LogFormat::Pretty));
}

#[test]
fn test_parse_level_names() {
    assert_eq!(parse_level("error"), Level::ERROR);
    assert_eq!(parse_level("WARN"), Level::WARN);
    assert_eq!(parse_level("Debug"), Level::DEBUG);
    assert_eq!(parse_level("trace"), Level::TRACE);
    assert_eq!(parse_level("verbose"), Level::INFO);
}

#[test]
fn test_init_logging_twice_does_not_panic() {
    init_logging(Level::WARN, LogFormat::Compact, false);
    init_logging(Level::DEBUG, LogFormat::Json, true);
}
