//! Headless Chromium backend over the DevTools protocol (`chromiumoxide`).

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::network::{
    EnableParams as NetworkEnableParams, EventLoadingFailed, EventLoadingFinished,
    EventRequestWillBeSent, RequestId,
};
use chromiumoxide::cdp::browser_protocol::page::{
    CaptureScreenshotFormat, PrintToPdfParams, Viewport as ClipRect,
};
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use futures::stream::{self, BoxStream};
use futures::StreamExt;
use serde_json::Value;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;

use super::engine::{
    Engine, EngineLauncher, EnginePage, LaunchOptions, PdfOptions, ScreenshotOptions,
};
use crate::config::ImageFormat;
use crate::{Result, SlidexError, Viewport};

/// Launches Chrome/Chromium through `chromiumoxide`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChromiumLauncher;

#[async_trait]
impl EngineLauncher for ChromiumLauncher {
    async fn launch(&self, options: &LaunchOptions) -> Result<Box<dyn Engine>> {
        let mut builder = BrowserConfig::builder()
            .args(options.args.iter().map(String::as_str))
            .launch_timeout(options.timeout)
            .request_timeout(options.timeout);
        if !options.headless {
            builder = builder.with_head();
        }
        if !options.ignore_https_errors {
            builder = builder.respect_https_errors();
        }
        if let Some(path) = &options.executable {
            builder = builder.chrome_executable(path);
        }
        let config = builder.build().map_err(SlidexError::Launch)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| SlidexError::Launch(e.to_string()))?;

        // The handler drives the CDP websocket; it ends when the browser goes away.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(err) = event {
                    debug!("CDP handler error: {err}");
                }
            }
        });

        Ok(Box::new(ChromiumEngine {
            browser,
            handler_task,
        }))
    }
}

pub struct ChromiumEngine {
    browser: Browser,
    handler_task: JoinHandle<()>,
}

#[async_trait]
impl Engine for ChromiumEngine {
    async fn new_page(&mut self) -> Result<Box<dyn EnginePage>> {
        let page = self.browser.new_page("about:blank").await.map_err(cdp_error)?;
        page.execute(NetworkEnableParams::default())
            .await
            .map_err(cdp_error)?;
        let in_flight = Arc::new(Mutex::new(HashSet::new()));
        let tracker = tokio::spawn(track_requests(
            request_events(&page).await?,
            in_flight.clone(),
        ));
        Ok(Box::new(ChromiumPage {
            page,
            in_flight,
            tracker,
        }))
    }

    async fn close(self: Box<Self>) -> Result<()> {
        let ChromiumEngine {
            mut browser,
            handler_task,
        } = *self;
        let closed = browser.close().await.map_err(cdp_error);
        if let Err(err) = browser.wait().await {
            debug!("Waiting for browser exit failed: {err}");
        }
        handler_task.abort();
        let _ = handler_task.await;
        closed.map(|_| ())
    }
}

enum RequestEvent {
    Started(RequestId),
    Settled(RequestId),
}

/// Merged stream of request start and end events for one page.
async fn request_events(page: &Page) -> Result<BoxStream<'static, RequestEvent>> {
    let started = page
        .event_listener::<EventRequestWillBeSent>()
        .await
        .map_err(cdp_error)?
        .map(|event| RequestEvent::Started(event.request_id.clone()));
    let finished = page
        .event_listener::<EventLoadingFinished>()
        .await
        .map_err(cdp_error)?
        .map(|event| RequestEvent::Settled(event.request_id.clone()));
    let failed = page
        .event_listener::<EventLoadingFailed>()
        .await
        .map_err(cdp_error)?
        .map(|event| RequestEvent::Settled(event.request_id.clone()));
    Ok(stream::select_all([started.boxed(), finished.boxed(), failed.boxed()]).boxed())
}

/// Keeps `in_flight` equal to the set of requests without a terminal event.
/// Redirects reuse their request id, so they stay a single entry.
async fn track_requests(
    mut events: BoxStream<'static, RequestEvent>,
    in_flight: Arc<Mutex<HashSet<RequestId>>>,
) {
    while let Some(event) = events.next().await {
        let mut open = in_flight.lock().await;
        match event {
            RequestEvent::Started(id) => {
                open.insert(id);
            }
            RequestEvent::Settled(id) => {
                open.remove(&id);
            }
        }
    }
}

pub struct ChromiumPage {
    page: Page,
    in_flight: Arc<Mutex<HashSet<RequestId>>>,
    tracker: JoinHandle<()>,
}

#[async_trait]
impl EnginePage for ChromiumPage {
    async fn set_viewport(&mut self, viewport: Viewport) -> Result<()> {
        let params = SetDeviceMetricsOverrideParams::new(
            i64::from(viewport.width),
            i64::from(viewport.height),
            viewport.device_scale_factor,
            false,
        );
        self.page.execute(params).await.map_err(cdp_error)?;
        Ok(())
    }

    async fn set_content(&mut self, html: &str) -> Result<()> {
        self.page.set_content(html).await.map_err(cdp_error)?;
        Ok(())
    }

    async fn evaluate(&mut self, expression: &str) -> Result<Value> {
        let params = EvaluateParams::builder()
            .expression(expression)
            .await_promise(true)
            .return_by_value(true)
            .build()
            .map_err(SlidexError::Engine)?;
        let result = self
            .page
            .evaluate_expression(params)
            .await
            .map_err(cdp_error)?;
        Ok(result.value().cloned().unwrap_or(Value::Null))
    }

    async fn pending_requests(&mut self) -> Result<usize> {
        Ok(self.in_flight.lock().await.len())
    }

    async fn print_pdf(&mut self, options: &PdfOptions) -> Result<Vec<u8>> {
        let (paper_width, paper_height) = options.paper_size_inches();
        let [top, right, bottom, left] = options.margin_inches();
        let params = PrintToPdfParams {
            print_background: Some(options.print_background),
            paper_width: Some(paper_width),
            paper_height: Some(paper_height),
            margin_top: Some(top),
            margin_right: Some(right),
            margin_bottom: Some(bottom),
            margin_left: Some(left),
            prefer_css_page_size: Some(options.prefer_css_page_size),
            ..Default::default()
        };
        self.page.pdf(params).await.map_err(cdp_error)
    }

    async fn screenshot(&mut self, options: &ScreenshotOptions) -> Result<Vec<u8>> {
        let format = match options.format {
            ImageFormat::Png => CaptureScreenshotFormat::Png,
            ImageFormat::Jpeg => CaptureScreenshotFormat::Jpeg,
        };
        let clip = ClipRect {
            x: 0.0,
            y: 0.0,
            width: f64::from(options.clip_width),
            height: f64::from(options.clip_height),
            scale: 1.0,
        };
        let mut builder = ScreenshotParams::builder()
            .format(format)
            .clip(clip)
            .full_page(false);
        if let Some(quality) = options.quality {
            builder = builder.quality(i64::from(quality));
        }
        self.page.screenshot(builder.build()).await.map_err(cdp_error)
    }

    async fn close(self: Box<Self>) -> Result<()> {
        let ChromiumPage { page, tracker, .. } = *self;
        tracker.abort();
        page.close().await.map_err(cdp_error)
    }
}

fn cdp_error(err: chromiumoxide::error::CdpError) -> SlidexError {
    SlidexError::engine(err.to_string())
}
