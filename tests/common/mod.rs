//! Scripted browser used to drive the pipeline without Chromium.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::{json, Value};
use slidex_lib::config::{SettleConfig, Timeouts};
use slidex_lib::{
    Engine, EngineLauncher, EnginePage, LaunchOptions, PdfOptions, RenderConfig, Result,
    ScreenshotOptions, SlidexError, Viewport,
};

/// Markup containing this marker never finishes loading.
pub const HANG_MARKER: &str = "<!-- hang -->";

pub const FAKE_PDF: &[u8] = b"%PDF-1.7 fake";
pub const FAKE_IMAGE: &[u8] = b"\x89PNG fake";

#[derive(Debug, Default)]
pub struct Recorded {
    pub viewports: Vec<Viewport>,
    pub contents: Vec<String>,
    pub pdf_options: Vec<PdfOptions>,
    pub screenshot_options: Vec<ScreenshotOptions>,
    pub launches: Vec<LaunchOptions>,
    /// Every page operation in call order, e.g. `evaluate:fonts` or `print_pdf`.
    pub calls: Vec<String>,
    /// Answers for successive `readyState` checks; `true` once exhausted.
    pub ready_script: VecDeque<bool>,
    /// Answers for successive open-request polls; `0` once exhausted.
    pub pending_script: VecDeque<usize>,
    /// When each open-request poll happened and what it reported.
    pub polls: Vec<(Instant, usize)>,
}

#[derive(Debug, Default)]
pub struct FakeState {
    pub recorded: Mutex<Recorded>,
    pub pages_opened: AtomicUsize,
    pub pages_closed: AtomicUsize,
    pub engines_closed: AtomicUsize,
}

impl FakeState {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn engine_closes(&self) -> usize {
        self.engines_closed.load(Ordering::SeqCst)
    }

    pub fn recorded(&self) -> std::sync::MutexGuard<'_, Recorded> {
        self.recorded.lock().expect("recorded lock")
    }
}

pub struct FakeEngine {
    state: Arc<FakeState>,
}

impl FakeEngine {
    pub fn new(state: Arc<FakeState>) -> Self {
        Self { state }
    }
}

#[async_trait]
impl Engine for FakeEngine {
    async fn new_page(&mut self) -> Result<Box<dyn EnginePage>> {
        self.state.pages_opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakePage::new(self.state.clone())))
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.state.engines_closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub struct FakePage {
    state: Arc<FakeState>,
}

impl FakePage {
    pub fn new(state: Arc<FakeState>) -> Self {
        Self { state }
    }
}

/// Short name for the page script an expression belongs to.
pub fn script_label(expression: &str) -> &'static str {
    if expression.contains("readyState") {
        "ready"
    } else if expression.contains("document.fonts") {
        "fonts"
    } else if expression.contains("naturalWidth") {
        "broken-images"
    } else if expression.contains("background-image") {
        "backgrounds"
    } else if expression.contains("offsetHeight") {
        "layout"
    } else {
        "other"
    }
}

#[async_trait]
impl EnginePage for FakePage {
    async fn set_viewport(&mut self, viewport: Viewport) -> Result<()> {
        let mut recorded = self.state.recorded();
        recorded.calls.push("set_viewport".to_string());
        recorded.viewports.push(viewport);
        Ok(())
    }

    async fn set_content(&mut self, html: &str) -> Result<()> {
        {
            let mut recorded = self.state.recorded();
            recorded.calls.push("set_content".to_string());
            recorded.contents.push(html.to_string());
        }
        if html.contains(HANG_MARKER) {
            tokio::time::sleep(Duration::from_secs(30)).await;
        }
        Ok(())
    }

    async fn evaluate(&mut self, expression: &str) -> Result<Value> {
        let label = script_label(expression);
        let mut recorded = self.state.recorded();
        recorded.calls.push(format!("evaluate:{label}"));
        Ok(match label {
            "ready" => json!(recorded.ready_script.pop_front().unwrap_or(true)),
            "fonts" => json!("loaded"),
            _ => json!(0),
        })
    }

    async fn pending_requests(&mut self) -> Result<usize> {
        let mut recorded = self.state.recorded();
        let pending = recorded.pending_script.pop_front().unwrap_or(0);
        recorded.calls.push("pending_requests".to_string());
        recorded.polls.push((Instant::now(), pending));
        Ok(pending)
    }

    async fn print_pdf(&mut self, options: &PdfOptions) -> Result<Vec<u8>> {
        let mut recorded = self.state.recorded();
        recorded.calls.push("print_pdf".to_string());
        recorded.pdf_options.push(*options);
        Ok(FAKE_PDF.to_vec())
    }

    async fn screenshot(&mut self, options: &ScreenshotOptions) -> Result<Vec<u8>> {
        let mut recorded = self.state.recorded();
        recorded.calls.push("screenshot".to_string());
        recorded.screenshot_options.push(*options);
        Ok(FAKE_IMAGE.to_vec())
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.state.pages_closed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// How a [`FakeLauncher`] responds to launch attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchBehavior {
    Succeed,
    /// Fails whenever an explicit executable is requested.
    RejectExplicitPath,
    AlwaysFail,
}

pub struct FakeLauncher {
    pub state: Arc<FakeState>,
    pub behavior: LaunchBehavior,
}

impl FakeLauncher {
    pub fn new(state: Arc<FakeState>) -> Self {
        Self {
            state,
            behavior: LaunchBehavior::Succeed,
        }
    }

    pub fn with_behavior(state: Arc<FakeState>, behavior: LaunchBehavior) -> Self {
        Self { state, behavior }
    }
}

#[async_trait]
impl EngineLauncher for FakeLauncher {
    async fn launch(&self, options: &LaunchOptions) -> Result<Box<dyn Engine>> {
        self.state.recorded().launches.push(options.clone());
        let rejected = match self.behavior {
            LaunchBehavior::Succeed => false,
            LaunchBehavior::RejectExplicitPath => options.executable.is_some(),
            LaunchBehavior::AlwaysFail => true,
        };
        if rejected {
            return Err(SlidexError::Launch("executable not usable".to_string()));
        }
        Ok(Box::new(FakeEngine::new(self.state.clone())))
    }
}

/// Defaults with every wait shrunk so tests finish quickly.
pub fn fast_config() -> RenderConfig {
    RenderConfig {
        timeouts: Timeouts {
            launch: Duration::from_secs(5),
            document_navigation: Duration::from_millis(200),
            image_navigation: Duration::from_millis(200),
        },
        settle: SettleConfig {
            document_delay: Duration::ZERO,
            image_delay: Duration::ZERO,
            idle_window: Duration::ZERO,
            poll_interval: Duration::from_millis(1),
        },
        ..RenderConfig::default()
    }
}

pub fn write_slide(path: &Path, body: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create slide dir");
    }
    let html = format!(
        "<!DOCTYPE html><html><head><title>slide</title></head><body>{body}</body></html>"
    );
    std::fs::write(path, html).expect("write slide");
}
