use std::path::Path;

use tracing::info;

use super::readiness::{
    bounded, force_layout, hide_broken_images, substitute_external_backgrounds, wait_for_fonts,
    SettleStrategy,
};
use super::{close_page, file_name, finish, Conversion, ConversionResult};
use crate::browser::{Engine, EnginePage, PdfOptions};
use crate::compensate::compensate;
use crate::loader::read_html;
use crate::{RenderConfig, Result};

/// Render `source` to a PDF at `dest`.
///
/// Returns `Ok(None)` when the conversion was skipped; see [`super`].
pub async fn render_document(
    engine: &mut dyn Engine,
    source: &Path,
    dest: &Path,
    config: &RenderConfig,
) -> Result<Option<ConversionResult>> {
    Ok(render_document_detailed(engine, source, dest, config)
        .await?
        .into_result())
}

/// Like [`render_document`] but keeps the reason for a skipped conversion.
pub async fn render_document_detailed(
    engine: &mut dyn Engine,
    source: &Path,
    dest: &Path,
    config: &RenderConfig,
) -> Result<Conversion> {
    info!("Converting {} to PDF...", file_name(source));

    let produced = match engine.new_page().await {
        Ok(mut page) => {
            let produced = produce_pdf(page.as_mut(), source, config).await;
            close_page(page, source).await;
            produced
        }
        Err(err) => Err(err),
    };
    finish(source, dest, produced)
}

/// Print geometry for a config; the viewport scale factor never affects it.
pub fn pdf_options(config: &RenderConfig) -> PdfOptions {
    PdfOptions {
        width: config.width,
        height: config.height,
        margin: config.margin,
        print_background: config.print_background,
        prefer_css_page_size: false,
    }
}

async fn produce_pdf(
    page: &mut dyn EnginePage,
    source: &Path,
    config: &RenderConfig,
) -> Result<Vec<u8>> {
    page.set_viewport(config.document_viewport()).await?;

    let html = compensate(&read_html(source)?);
    let navigation = config.timeouts.document_navigation;
    let network_idle = SettleStrategy::network_idle(&config.settle);
    bounded(navigation, "loading the document and waiting for network idle", async {
        page.set_content(&html).await?;
        network_idle.settle(page).await
    })
    .await?;

    SettleStrategy::Fixed(config.settle.document_delay)
        .settle(page)
        .await?;
    bounded(navigation, "waiting for fonts", wait_for_fonts(page)).await?;
    bounded(navigation, "printing the document", async {
        hide_broken_images(page).await?;
        substitute_external_backgrounds(page).await?;
        force_layout(page).await?;
        page.print_pdf(&pdf_options(config)).await
    })
    .await
}
