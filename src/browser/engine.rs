//! Capability boundary between the render pipeline and the browser.
//!
//! The pipeline only needs to open pages, load inline markup, evaluate
//! scripts, observe open requests and capture output. [`super::chromium`] implements these traits
//! over the DevTools protocol; tests drive the pipeline with scripted fakes.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::config::{ImageFormat, Margin, CSS_PIXELS_PER_INCH};
use crate::{Result, Viewport};

/// Options for starting the engine process.
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchOptions {
    pub headless: bool,
    pub args: Vec<String>,
    pub ignore_https_errors: bool,
    pub timeout: Duration,
    /// Explicit binary; `None` lets the engine pick its default.
    pub executable: Option<PathBuf>,
}

/// Print-to-PDF geometry in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PdfOptions {
    pub width: u32,
    pub height: u32,
    pub margin: Margin,
    pub print_background: bool,
    pub prefer_css_page_size: bool,
}

impl PdfOptions {
    /// Paper size in inches, as the print backend expects it.
    pub fn paper_size_inches(&self) -> (f64, f64) {
        (px_to_inches(self.width as f64), px_to_inches(self.height as f64))
    }

    /// Margins in inches (top, right, bottom, left).
    pub fn margin_inches(&self) -> [f64; 4] {
        [
            px_to_inches(self.margin.top),
            px_to_inches(self.margin.right),
            px_to_inches(self.margin.bottom),
            px_to_inches(self.margin.left),
        ]
    }
}

fn px_to_inches(px: f64) -> f64 {
    px / CSS_PIXELS_PER_INCH
}

/// Screenshot clipped to a fixed rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenshotOptions {
    pub format: ImageFormat,
    /// Only set for lossy formats.
    pub quality: Option<u8>,
    pub clip_width: u32,
    pub clip_height: u32,
}

/// A running browser shared by a whole batch.
#[async_trait]
pub trait Engine: Send {
    async fn new_page(&mut self) -> Result<Box<dyn EnginePage>>;

    /// Shut the browser down. Called exactly once per launched engine.
    async fn close(self: Box<Self>) -> Result<()>;
}

/// One tab, used for a single conversion.
#[async_trait]
pub trait EnginePage: Send {
    async fn set_viewport(&mut self, viewport: Viewport) -> Result<()>;

    /// Replace the document with inline markup; no network navigation.
    async fn set_content(&mut self, html: &str) -> Result<()>;

    /// Evaluate an expression, awaiting it if it yields a promise.
    async fn evaluate(&mut self, expression: &str) -> Result<Value>;

    /// Network requests issued by the page that have neither finished nor failed.
    async fn pending_requests(&mut self) -> Result<usize>;

    async fn print_pdf(&mut self, options: &PdfOptions) -> Result<Vec<u8>>;

    async fn screenshot(&mut self, options: &ScreenshotOptions) -> Result<Vec<u8>>;

    async fn close(self: Box<Self>) -> Result<()>;
}

/// Starts engines; split out so launch fallback can be exercised without a browser.
#[async_trait]
pub trait EngineLauncher: Send + Sync {
    async fn launch(&self, options: &LaunchOptions) -> Result<Box<dyn Engine>>;
}
