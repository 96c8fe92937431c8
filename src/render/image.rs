use std::path::Path;

use tracing::info;

use super::readiness::{bounded, SettleStrategy};
use super::{close_page, file_name, finish, Conversion, ConversionResult};
use crate::browser::{Engine, EnginePage, ScreenshotOptions};
use crate::loader::read_html;
use crate::{RenderConfig, Result};

/// Render `source` to a raster image at `dest`.
///
/// The markup is loaded as-is; print compensation only applies to PDFs.
pub async fn render_image(
    engine: &mut dyn Engine,
    source: &Path,
    dest: &Path,
    config: &RenderConfig,
) -> Result<Option<ConversionResult>> {
    Ok(render_image_detailed(engine, source, dest, config)
        .await?
        .into_result())
}

pub async fn render_image_detailed(
    engine: &mut dyn Engine,
    source: &Path,
    dest: &Path,
    config: &RenderConfig,
) -> Result<Conversion> {
    info!(
        "Converting {} to {}...",
        file_name(source),
        config.image_format.to_string().to_ascii_uppercase()
    );

    let produced = match engine.new_page().await {
        Ok(mut page) => {
            let produced = produce_image(page.as_mut(), source, config).await;
            close_page(page, source).await;
            produced
        }
        Err(err) => Err(err),
    };
    finish(source, dest, produced)
}

pub fn screenshot_options(config: &RenderConfig) -> ScreenshotOptions {
    ScreenshotOptions {
        format: config.image_format,
        quality: config
            .image_format
            .is_lossy()
            .then_some(config.image_quality),
        clip_width: config.width,
        clip_height: config.height,
    }
}

async fn produce_image(
    page: &mut dyn EnginePage,
    source: &Path,
    config: &RenderConfig,
) -> Result<Vec<u8>> {
    page.set_viewport(config.viewport).await?;

    let html = read_html(source)?;
    let network_idle = SettleStrategy::network_idle(&config.settle);
    bounded(
        config.timeouts.image_navigation,
        "loading the image source and waiting for network idle",
        async {
            page.set_content(&html).await?;
            network_idle.settle(page).await
        },
    )
    .await?;

    SettleStrategy::Fixed(config.settle.image_delay)
        .settle(page)
        .await?;

    bounded(
        config.timeouts.image_navigation,
        "capturing the screenshot",
        page.screenshot(&screenshot_options(config)),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ImageFormat;

    #[test]
    fn png_screenshots_have_no_quality() {
        let config = RenderConfig::default();
        let opts = screenshot_options(&config);
        assert_eq!(opts.format, ImageFormat::Png);
        assert_eq!(opts.quality, None);
        assert_eq!((opts.clip_width, opts.clip_height), (1600, 900));
    }

    #[test]
    fn jpeg_screenshots_carry_quality() {
        let mut config = RenderConfig::default();
        config.image_format = ImageFormat::Jpeg;
        config.image_quality = 80;
        assert_eq!(screenshot_options(&config).quality, Some(80));
    }
}
