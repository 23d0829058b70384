//! Persistence adapter for task documents
//!
//! The initial document is read once before any agent runs; the final state is
//! written once after the driver reaches the terminal sentinel. Nothing is
//! persisted in between.

use crate::task::TaskState;
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info};

/// Errors loading or saving task documents
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to read task document {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Task document {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Task document {path} is malformed: {reason}")]
    Malformed { path: PathBuf, reason: String },
    #[error("Failed to serialize task state: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Failed to write result document {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Load the initial Task State
///
/// The document must be a JSON object holding `current_agent` (string or null)
/// and `memory` (object).
pub fn load_initial(path: &Path) -> Result<TaskState, PersistenceError> {
    let content = std::fs::read_to_string(path).map_err(|source| {
        error!(path = %path.display(), error = %source, "Failed to load task state");
        PersistenceError::Read {
            path: path.to_path_buf(),
            source,
        }
    })?;

    let state = parse_initial(&content).map_err(|e| {
        let e = e.at(path);
        error!(path = %path.display(), error = %e, "Failed to load task state");
        e
    })?;

    info!(
        path = %path.display(),
        current_agent = state.current_agent.as_deref().unwrap_or("<none>"),
        "Loaded initial task state"
    );
    Ok(state)
}

/// Overwrite `path` with the full Task State
pub fn save_final(path: &Path, state: &TaskState) -> Result<(), PersistenceError> {
    let content = serde_json::to_string_pretty(state)?;

    let write = || -> std::io::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)
    };

    write().map_err(|source| {
        error!(path = %path.display(), error = %source, "Failed to write final task state");
        PersistenceError::Write {
            path: path.to_path_buf(),
            source,
        }
    })?;

    info!(
        path = %path.display(),
        agents = state.memory.len(),
        "Final task state written"
    );
    Ok(())
}

/// Read any JSON document, without checking its shape
pub fn read_document(path: &Path) -> Result<Value, PersistenceError> {
    let content = std::fs::read_to_string(path).map_err(|source| PersistenceError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| PersistenceError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Structural problems found before the path is known
#[derive(Debug)]
enum DocumentError {
    Json(serde_json::Error),
    Shape(String),
}

impl DocumentError {
    fn at(self, path: &Path) -> PersistenceError {
        match self {
            DocumentError::Json(source) => PersistenceError::Parse {
                path: path.to_path_buf(),
                source,
            },
            DocumentError::Shape(reason) => PersistenceError::Malformed {
                path: path.to_path_buf(),
                reason,
            },
        }
    }
}

fn parse_initial(content: &str) -> Result<TaskState, DocumentError> {
    let document: Value = serde_json::from_str(content).map_err(DocumentError::Json)?;

    let object = document.as_object().ok_or_else(|| {
        DocumentError::Shape(format!(
            "expected a JSON object, got {}",
            crate::error::value_kind(&document)
        ))
    })?;

    match object.get("current_agent") {
        None => return Err(DocumentError::Shape("missing `current_agent`".to_string())),
        Some(Value::String(_)) | Some(Value::Null) => {}
        Some(other) => {
            return Err(DocumentError::Shape(format!(
                "`current_agent` must be a string or null, got {}",
                crate::error::value_kind(other)
            )))
        }
    }

    match object.get("memory") {
        None => return Err(DocumentError::Shape("missing `memory`".to_string())),
        Some(Value::Object(_)) => {}
        Some(other) => {
            return Err(DocumentError::Shape(format!(
                "`memory` must be an object, got {}",
                crate::error::value_kind(other)
            )))
        }
    }

    serde_json::from_value(document).map_err(|e| DocumentError::Shape(e.to_string()))
}
