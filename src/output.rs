use crate::batch::{BatchResult, SkippedConversion};
use crate::error::ErrorPayload;
use crate::render::ConversionKind;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Schema version for output payloads.
pub const SLIDEX_OUTPUT_VERSION: &str = "0.1.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum SlidexOutput {
    Export(ExportOutput),
    Error(ErrorOutput),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportOutput {
    pub version: String,
    pub root: PathBuf,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub discovered: usize,
    pub images: usize,
    pub pdfs: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outputs: Vec<OutputFile>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedConversion>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputFile {
    pub kind: ConversionKind,
    pub path: PathBuf,
    pub bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorOutput {
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub error: ErrorPayload,
}

impl ExportOutput {
    pub fn from_batch(root: &Path, batch: &BatchResult) -> Self {
        Self {
            version: SLIDEX_OUTPUT_VERSION.to_string(),
            root: root.to_path_buf(),
            success: batch.success,
            message: batch.message.clone(),
            discovered: batch.html_files.len(),
            images: batch.image_count(),
            pdfs: batch.pdf_count(),
            outputs: batch
                .results
                .iter()
                .map(|tagged| OutputFile {
                    kind: tagged.kind,
                    path: tagged.result.local_path.clone(),
                    bytes: tagged.result.buffer.len(),
                })
                .collect(),
            skipped: batch.skipped.clone(),
        }
    }

    /// Conversions attempted but not produced.
    pub fn shortfall(&self) -> usize {
        (self.discovered * 2).saturating_sub(self.images + self.pdfs)
    }
}
