//! Per-document conversion to PDF and raster images.
//!
//! Each conversion owns exactly one page, which is closed before the
//! conversion returns on every path. A failing step (missing source,
//! timeout, script or capture error) skips the conversion: it is logged
//! and reported as `None`. Only a failed output write is returned as an
//! error, since it means the destination itself is unusable.
//!
//! - [`document`] - compensated PDF rendition
//! - [`image`] - raw-markup screenshot
//! - [`readiness`] - settle strategies and page clean-up scripts

pub mod document;
pub mod image;
pub mod readiness;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::browser::EnginePage;
use crate::writer::write_output;
use crate::Result;

pub use document::{render_document, render_document_detailed};
pub use image::{render_image, render_image_detailed};
pub use readiness::SettleStrategy;

/// Which rendition a conversion produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversionKind {
    Image,
    Pdf,
}

impl ConversionKind {
    pub fn label(self) -> &'static str {
        match self {
            ConversionKind::Image => "image",
            ConversionKind::Pdf => "pdf",
        }
    }
}

/// A finished conversion; every field is populated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionResult {
    pub file_name: String,
    pub buffer: Vec<u8>,
    pub local_path: PathBuf,
}

/// Outcome of a conversion, keeping the reason when it was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conversion {
    Done(ConversionResult),
    Skipped { reason: String },
}

impl Conversion {
    pub fn into_result(self) -> Option<ConversionResult> {
        match self {
            Conversion::Done(result) => Some(result),
            Conversion::Skipped { .. } => None,
        }
    }
}

/// Close a conversion's page; a failure here does not affect the result.
pub(crate) async fn close_page(page: Box<dyn EnginePage>, source: &Path) {
    if let Err(err) = page.close().await {
        debug!("Closing page for {} failed: {err}", source.display());
    }
}

/// Write produced bytes, or log and record the skip.
pub(crate) fn finish(source: &Path, dest: &Path, produced: Result<Vec<u8>>) -> Result<Conversion> {
    match produced {
        Ok(buffer) => {
            write_output(dest, &buffer)?;
            Ok(Conversion::Done(ConversionResult {
                file_name: file_name(dest),
                buffer,
                local_path: dest.to_path_buf(),
            }))
        }
        Err(err) => {
            warn!("Error converting {}: {err}", source.display());
            Ok(Conversion::Skipped {
                reason: err.to_string(),
            })
        }
    }
}

pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
