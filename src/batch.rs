//! Batch export: discover slides, launch one browser, convert each slide.
//!
//! Documents are processed strictly one after another. Each document is
//! rendered as an image and then as a PDF; a skipped conversion is recorded
//! and the loop moves on. Discovery and launch failures abort the batch, as
//! does a failed output write. Once launched, the browser is closed exactly
//! once, whichever way the loop ends.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::browser::{
    default_launch_options, launch_engine, ChromiumLauncher, Engine, EngineLauncher,
};
use crate::render::{
    render_document_detailed, render_image_detailed, Conversion, ConversionKind, ConversionResult,
};
use crate::walker::find_html_files;
use crate::{RenderConfig, RenderOverrides, Result};

pub type ProgressCallback = Arc<dyn Fn(&str) + Send + Sync>;

/// Message reported when the root holds no documents.
pub const NO_FILES_MESSAGE: &str = "No files to export";

/// Image renditions are always written as `name.png`, whatever the encoding.
pub const IMAGE_EXTENSION: &str = "png";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedResult {
    pub kind: ConversionKind,
    pub result: ConversionResult,
}

/// A conversion that produced no output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedConversion {
    pub source: PathBuf,
    pub kind: ConversionKind,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct BatchResult {
    pub success: bool,
    pub message: Option<String>,
    /// Produced outputs in conversion order.
    pub results: Vec<TaggedResult>,
    pub skipped: Vec<SkippedConversion>,
    /// Every source document that was discovered.
    pub html_files: Vec<PathBuf>,
}

impl BatchResult {
    pub fn count(&self, kind: ConversionKind) -> usize {
        self.results.iter().filter(|r| r.kind == kind).count()
    }

    pub fn image_count(&self) -> usize {
        self.count(ConversionKind::Image)
    }

    pub fn pdf_count(&self) -> usize {
        self.count(ConversionKind::Pdf)
    }
}

/// Options for a batch run beyond the render config.
#[derive(Clone, Default)]
pub struct ExportOptions {
    pub progress: Option<ProgressCallback>,
}

fn log_progress(progress: &Option<ProgressCallback>, message: &str) {
    debug!("{message}");
    if let Some(cb) = progress {
        cb(message);
    }
}

/// Export every slide under `root` using headless Chromium.
///
/// `overrides` are merged over [`RenderConfig::default`].
pub async fn export_slides(root: &Path, overrides: &RenderOverrides) -> Result<BatchResult> {
    let config = RenderConfig::from_overrides(overrides);
    export_slides_with(&ChromiumLauncher, root, &config, ExportOptions::default()).await
}

/// [`export_slides`] with an explicit launcher and a complete config.
pub async fn export_slides_with(
    launcher: &dyn EngineLauncher,
    root: &Path,
    config: &RenderConfig,
    options: ExportOptions,
) -> Result<BatchResult> {
    let progress = options.progress;
    config.validate()?;
    if config.geometry_mismatch() {
        warn!(
            "Output size {}x{} differs from viewport {}; content may be cropped or padded",
            config.width, config.height, config.viewport
        );
    }

    log_progress(&progress, "Starting slide export...");
    let html_files = find_html_files(root)?;
    if html_files.is_empty() {
        log_progress(&progress, "No HTML files found in slides directory.");
        return Ok(BatchResult {
            success: false,
            message: Some(NO_FILES_MESSAGE.to_string()),
            html_files,
            ..Default::default()
        });
    }

    log_progress(&progress, &format!("Found {} HTML files:", html_files.len()));
    for file in &html_files {
        log_progress(&progress, &format!("  - {}", crate::render::file_name(file)));
    }

    let mut engine = launch_engine(launcher, &default_launch_options(config)).await?;
    let converted = convert_all(engine.as_mut(), &html_files, config, &progress).await;
    let closed = engine.close().await;

    let (results, skipped) = converted?;
    if let Err(err) = closed {
        warn!("Closing the browser failed: {err}");
    }

    let batch = BatchResult {
        success: true,
        message: None,
        results,
        skipped,
        html_files,
    };
    log_progress(&progress, "Export complete!");
    log_progress(&progress, &format!("Generated {} PDF files", batch.pdf_count()));
    log_progress(
        &progress,
        &format!(
            "Generated {} {} files",
            batch.image_count(),
            config.image_format.to_string().to_ascii_uppercase()
        ),
    );
    Ok(batch)
}

async fn convert_all(
    engine: &mut dyn Engine,
    html_files: &[PathBuf],
    config: &RenderConfig,
    progress: &Option<ProgressCallback>,
) -> Result<(Vec<TaggedResult>, Vec<SkippedConversion>)> {
    let mut results = Vec::with_capacity(html_files.len() * 2);
    let mut skipped = Vec::new();

    for (index, source) in html_files.iter().enumerate() {
        log_progress(
            progress,
            &format!(
                "[{}/{}] {}",
                index + 1,
                html_files.len(),
                crate::render::file_name(source)
            ),
        );

        let image_dest = output_path(source, IMAGE_EXTENSION);
        let image = render_image_detailed(engine, source, &image_dest, config).await?;
        record(ConversionKind::Image, source, image, &mut results, &mut skipped);

        let pdf_dest = output_path(source, "pdf");
        let pdf = render_document_detailed(engine, source, &pdf_dest, config).await?;
        record(ConversionKind::Pdf, source, pdf, &mut results, &mut skipped);
    }

    Ok((results, skipped))
}

fn record(
    kind: ConversionKind,
    source: &Path,
    conversion: Conversion,
    results: &mut Vec<TaggedResult>,
    skipped: &mut Vec<SkippedConversion>,
) {
    match conversion {
        Conversion::Done(result) => results.push(TaggedResult { kind, result }),
        Conversion::Skipped { reason } => skipped.push(SkippedConversion {
            source: source.to_path_buf(),
            kind,
            reason,
        }),
    }
}

/// `dir/name.html` → `dir/name.<extension>`.
pub fn output_path(source: &Path, extension: &str) -> PathBuf {
    source.with_extension(extension)
}
