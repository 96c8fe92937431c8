//! Slide exporter library
//!
//! Renders a directory tree of self-contained HTML slides into fixed-size
//! PDF and PNG/JPEG files using headless Chromium.
//!
//! # Module Overview
//!
//! - [`browser`] - Executable discovery, launch with fallback, engine traits
//! - [`render`] - Per-document PDF/image conversion and readiness waits
//! - [`compensate`] - Print-only CSS injected into PDF renditions
//! - [`batch`] - Discovery → launch → convert → close orchestration
//! - [`config`] - Render configuration, overrides and TOML loading
//! - [`output`] - JSON output schemas
//!
//! # Example
//!
//! ```no_run
//! use slidex_lib::{export_slides, RenderOverrides};
//! use std::path::Path;
//!
//! # async fn example() -> slidex_lib::Result<()> {
//! let overrides = RenderOverrides {
//!     width: Some(1280),
//!     height: Some(720),
//!     ..Default::default()
//! };
//! let batch = export_slides(Path::new("./slides"), &overrides).await?;
//! println!("{} PDFs, {} images", batch.pdf_count(), batch.image_count());
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod browser;
pub mod compensate;
pub mod config;
pub mod error;
pub mod loader;
pub mod output;
pub mod render;
pub mod viewport;
pub mod walker;
pub mod writer;

pub use batch::{
    export_slides, export_slides_with, output_path, BatchResult, ExportOptions, ProgressCallback,
    SkippedConversion, TaggedResult, IMAGE_EXTENSION, NO_FILES_MESSAGE,
};
pub use browser::{
    launch_engine, ChromiumLauncher, Engine, EngineLauncher, EnginePage, LaunchOptions,
    PdfOptions, ScreenshotOptions,
};
pub use compensate::{compensate, PRINT_DEFECT_CSS};
pub use config::{ImageFormat, Margin, RenderConfig, RenderOverrides};
pub use error::{ErrorCategory, ErrorPayload, Result, SlidexError};
pub use loader::read_html;
pub use output::{ErrorOutput, ExportOutput, OutputFile, SlidexOutput, SLIDEX_OUTPUT_VERSION};
pub use render::{
    render_document, render_image, Conversion, ConversionKind, ConversionResult, SettleStrategy,
};
pub use viewport::Viewport;
pub use walker::find_html_files;
pub use writer::{write_output, WriteOutcome};
