use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Result;

/// Whether a write replaced an existing file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteOutcome {
    Created,
    Updated,
}

impl WriteOutcome {
    pub fn label(self) -> &'static str {
        match self {
            WriteOutcome::Created => "Created",
            WriteOutcome::Updated => "Updated",
        }
    }
}

/// Persist `bytes` at `path`, overwriting silently. IO failures propagate.
pub fn write_output(path: &Path, bytes: &[u8]) -> Result<WriteOutcome> {
    let outcome = if path.exists() {
        WriteOutcome::Updated
    } else {
        WriteOutcome::Created
    };
    std::fs::write(path, bytes)?;
    tracing::info!("{}: {}", outcome.label(), path.display());
    Ok(outcome)
}
