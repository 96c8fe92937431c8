use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SlidexError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directory not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Browser launch failed: {0}")]
    Launch(String),

    #[error("Browser engine error: {0}")]
    Engine(String),

    #[error("Timed out after {elapsed:?} while {stage}")]
    Timeout { stage: String, elapsed: Duration },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SlidexError {
    pub fn engine(message: impl Into<String>) -> Self {
        SlidexError::Engine(message.into())
    }

    pub fn timeout(stage: impl Into<String>, elapsed: Duration) -> Self {
        SlidexError::Timeout {
            stage: stage.into(),
            elapsed,
        }
    }

    pub fn to_payload(&self) -> ErrorPayload {
        match self {
            SlidexError::Io(e) => ErrorPayload::new(
                ErrorCategory::Io,
                e.to_string(),
                "Check that the output directories are writable and the disk is not full.",
            ),
            SlidexError::NotFound(path) => ErrorPayload::new(
                ErrorCategory::Config,
                format!("Directory not found: {}", path.display()),
                "Pass an existing slides directory (default ./slides); relative paths resolve against the working directory.",
            ),
            SlidexError::FileNotFound(path) => ErrorPayload::new(
                ErrorCategory::Io,
                format!("File not found: {}", path.display()),
                "The file disappeared after discovery; rerun the export.",
            ),
            SlidexError::Launch(msg) => ErrorPayload::new(
                ErrorCategory::Browser,
                msg.to_string(),
                "Install Google Chrome or Chromium, or point SLIDEX_CHROME / chrome_executable at the binary.",
            ),
            SlidexError::Engine(msg) => ErrorPayload::new(
                ErrorCategory::Browser,
                msg.to_string(),
                "Re-run with --verbose to see which rendering step failed.",
            ),
            SlidexError::Timeout { .. } => ErrorPayload::new(
                ErrorCategory::Browser,
                self.to_string(),
                "Increase the [timeouts] values in the config file or check that the slide does not wait on slow remote assets.",
            ),
            SlidexError::Config(msg) => {
                let lower = msg.to_ascii_lowercase();
                if lower.contains("image quality") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Use an image quality between 0 and 100 (only applied to jpeg).",
                    )
                } else if lower.contains("failed to read config") || lower.contains("toml") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Check the --config path and TOML syntax; keys mirror the CLI options (width, height, image_format, ...).",
                    )
                } else {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Check flags/paths (e.g., --width/--height must be positive).",
                    )
                }
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, SlidexError>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Config,
    Io,
    Browser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub category: ErrorCategory,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

impl ErrorPayload {
    pub fn new(category: ErrorCategory, message: String, remediation: impl Into<String>) -> Self {
        Self {
            category,
            message,
            remediation: Some(remediation.into()),
        }
    }
}
