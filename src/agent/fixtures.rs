//! Static agent fixture documents
//!
//! Fixtures are JSON files of the form `{"output": {...}}`; agents only ever
//! see the `output` object.

use crate::error::AgentError;
use crate::task::AgentOutput;
use serde_json::Value;
use std::path::Path;

/// Read `dir/file_name` and return its `output` object
pub fn load_fixture_output(dir: &Path, file_name: &str) -> Result<AgentOutput, AgentError> {
    let path = dir.join(file_name);
    let content = std::fs::read_to_string(&path)
        .map_err(|e| AgentError::fixture(format!("cannot read {}: {e}", path.display())))?;

    let document: Value = serde_json::from_str(&content)
        .map_err(|e| AgentError::fixture(format!("invalid JSON in {}: {e}", path.display())))?;

    match document.get("output") {
        Some(Value::Object(output)) => Ok(output.clone()),
        Some(_) => Err(AgentError::fixture(format!(
            "`output` in {} is not an object",
            path.display()
        ))),
        None => Err(AgentError::fixture(format!(
            "{} has no `output` field",
            path.display()
        ))),
    }
}
