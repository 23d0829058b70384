//! Error types for the travel concierge orchestrator
//!
//! Agent invocation failures never leave the step boundary: the executor turns
//! them into `{"error": ...}` memory entries using [`AgentError::to_error_object`].
//! Memory keeps the message verbatim; [`sanitize_error_message`] only shapes
//! what goes to the log stream.
//! Only load and final-persistence failures surface through [`ConciergeError`].

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;

/// Maximum length of an error message stored in the result document
const MAX_ERROR_MESSAGE_LEN: usize = 500;

static SECRET_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(password|token|key|secret)[=:]\s*\S+").expect("secret pattern is valid")
});

static SENSITIVE_PATH_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"/[a-zA-Z0-9._/-]+/(secrets?|\.ssh|\.aws|\.config)/[a-zA-Z0-9._/-]+")
        .expect("sensitive path pattern is valid")
});

/// Failure raised by a single agent attempt
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("{message}")]
    ExecutionFailed { message: String },

    #[error("Agent output must be a map, got {found}")]
    InvalidOutput { found: &'static str },

    #[error("Missing input: {message}")]
    MissingInput { message: String },

    #[error("Fixture error: {message}")]
    Fixture { message: String },

    #[error("Preference store error: {0}")]
    Store(#[from] crate::store::StoreError),
}

impl AgentError {
    /// Create a generic execution failure
    pub fn execution_failed<S: Into<String>>(message: S) -> Self {
        Self::ExecutionFailed {
            message: message.into(),
        }
    }

    /// Create a missing input error
    pub fn missing_input<S: Into<String>>(message: S) -> Self {
        Self::MissingInput {
            message: message.into(),
        }
    }

    /// Create a fixture loading error
    pub fn fixture<S: Into<String>>(message: S) -> Self {
        Self::Fixture {
            message: message.into(),
        }
    }

    /// Reject a value that is not map-shaped
    pub fn invalid_output(value: &Value) -> Self {
        Self::InvalidOutput {
            found: value_kind(value),
        }
    }

    /// Convert into the `{"error": message}` object stored in memory
    pub fn to_error_object(&self) -> Map<String, Value> {
        let mut object = Map::new();
        object.insert("error".to_string(), Value::String(self.to_string()));
        object
    }

    /// Message safe to emit in logs
    pub fn log_message(&self) -> String {
        sanitize_error_message(&self.to_string())
    }
}

/// Name the JSON kind of a value for diagnostics
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Top-level error for a concierge run
#[derive(Debug, Error)]
pub enum ConciergeError {
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] crate::persistence::PersistenceError),

    #[error("Registry error: {0}")]
    Registry(#[from] crate::agent::RegistryError),

    #[error("Preference store error: {0}")]
    Store(#[from] crate::store::StoreError),

    #[error("JSON output error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML output error: {0}")]
    Toml(#[from] toml::ser::Error),
}

/// Result type for concierge operations
pub type ConciergeResult<T> = Result<T, ConciergeError>;

/// Redact secrets and sensitive paths, then cap the length
pub fn sanitize_error_message(message: &str) -> String {
    let mut sanitized = SECRET_PATTERN
        .replace_all(message, "${1}=***")
        .to_string();

    sanitized = SENSITIVE_PATH_PATTERN
        .replace_all(&sanitized, "/***REDACTED***/")
        .to_string();

    if sanitized.len() > MAX_ERROR_MESSAGE_LEN {
        let truncate_suffix = "...[truncated]";
        let mut cut = MAX_ERROR_MESSAGE_LEN - truncate_suffix.len();
        while !sanitized.is_char_boundary(cut) {
            cut -= 1;
        }
        sanitized = format!("{}{}", &sanitized[..cut], truncate_suffix);
    }

    sanitized
}
