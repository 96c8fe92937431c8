//! Heuristics for "the page has finished rendering".
//!
//! Slides are static and self-contained, so a quiet network followed by a
//! fixed settle delay is a good enough stand-in for a real paint-complete
//! signal. The remaining helpers patch up what commonly goes wrong in the
//! print path: late fonts, broken images and unreachable background images.

use std::future::Future;
use std::time::Duration;

use tokio::time::{sleep, timeout, Instant};
use tracing::debug;

use crate::browser::EnginePage;
use crate::config::SettleConfig;
use crate::{Result, SlidexError};

const DOCUMENT_READY: &str = "document.readyState === 'complete'";

const FONTS_READY: &str = "document.fonts.ready.then(() => document.fonts.status)";

/// Color used where an external background image would have been.
pub const FALLBACK_BACKGROUND: &str = "var(--bcg-green, #2e7d32)";

const HIDE_BROKEN_IMAGES: &str = r#"(() => {
  let hidden = 0;
  document.querySelectorAll('img').forEach((img) => {
    if (img.naturalWidth === 0 || img.naturalHeight === 0) {
      img.style.display = 'none';
      hidden += 1;
    }
  });
  return hidden;
})()"#;

const FORCE_LAYOUT: &str = "document.body ? document.body.offsetHeight : 0";

/// How to wait for a page to settle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SettleStrategy {
    /// Sleep for a fixed duration.
    Fixed(Duration),
    /// Poll until the document is complete and no request has been open
    /// for `window`.
    NetworkQuiet { window: Duration, poll: Duration },
}

impl SettleStrategy {
    pub fn network_idle(settle: &SettleConfig) -> Self {
        SettleStrategy::NetworkQuiet {
            window: settle.idle_window,
            poll: settle.poll_interval,
        }
    }

    pub async fn settle(&self, page: &mut dyn EnginePage) -> Result<()> {
        match *self {
            SettleStrategy::Fixed(delay) => {
                if !delay.is_zero() {
                    sleep(delay).await;
                }
                Ok(())
            }
            SettleStrategy::NetworkQuiet { window, poll } => {
                wait_for_network_quiet(page, window, poll).await
            }
        }
    }
}

async fn wait_for_network_quiet(
    page: &mut dyn EnginePage,
    window: Duration,
    poll: Duration,
) -> Result<()> {
    let mut quiet_since: Option<Instant> = None;
    loop {
        let ready = page
            .evaluate(DOCUMENT_READY)
            .await?
            .as_bool()
            .unwrap_or(true);
        let pending = page.pending_requests().await?;

        if ready && pending == 0 {
            let since = *quiet_since.get_or_insert_with(Instant::now);
            if since.elapsed() >= window {
                return Ok(());
            }
        } else if quiet_since.take().is_some() {
            debug!("network busy again ({pending} open request(s))");
        }
        sleep(poll).await;
    }
}

/// Run `fut`, turning an elapsed `limit` into [`SlidexError::Timeout`].
pub async fn bounded<T>(
    limit: Duration,
    stage: &str,
    fut: impl Future<Output = Result<T>>,
) -> Result<T> {
    match timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(SlidexError::timeout(stage, limit)),
    }
}

pub async fn wait_for_fonts(page: &mut dyn EnginePage) -> Result<()> {
    let status = page.evaluate(FONTS_READY).await?;
    debug!("font loading finished: {status}");
    Ok(())
}

/// Hide images that failed to decode so they do not print as placeholder boxes.
pub async fn hide_broken_images(page: &mut dyn EnginePage) -> Result<u64> {
    let hidden = page.evaluate(HIDE_BROKEN_IMAGES).await?;
    let hidden = hidden.as_u64().unwrap_or(0);
    if hidden > 0 {
        debug!("hid {hidden} broken image(s)");
    }
    Ok(hidden)
}

/// Give elements with remote inline `background-image`s a solid fallback color.
pub async fn substitute_external_backgrounds(page: &mut dyn EnginePage) -> Result<u64> {
    let script = format!(
        r#"(() => {{
  let patched = 0;
  document.querySelectorAll('[style*="background-image"]').forEach((el) => {{
    const bg = window.getComputedStyle(el).backgroundImage;
    if (bg.includes('http')) {{
      el.style.backgroundColor = '{FALLBACK_BACKGROUND}';
      patched += 1;
    }}
  }});
  return patched;
}})()"#
    );
    let patched = page.evaluate(&script).await?.as_u64().unwrap_or(0);
    if patched > 0 {
        debug!("substituted {patched} external background(s)");
    }
    Ok(patched)
}

/// Read a layout property to flush pending style and layout work.
pub async fn force_layout(page: &mut dyn EnginePage) -> Result<()> {
    page.evaluate(FORCE_LAYOUT).await?;
    Ok(())
}
