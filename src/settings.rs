use std::path::Path;

use slidex_lib::config::ViewportOverrides;
use slidex_lib::{ImageFormat, RenderConfig, RenderOverrides, SlidexError};

use crate::cli::{Cli, ImageFormatArg};

/// Overrides carried by explicit CLI flags only.
pub fn cli_overrides(cli: &Cli) -> RenderOverrides {
    RenderOverrides {
        width: cli.width,
        height: cli.height,
        viewport: cli.viewport.map(|vp| ViewportOverrides {
            width: Some(vp.width),
            height: Some(vp.height),
            device_scale_factor: Some(vp.device_scale_factor),
        }),
        image_format: cli.image_format.map(image_format_from_cli),
        image_quality: cli.image_quality,
        chrome_executable: cli.chrome.clone(),
        ..Default::default()
    }
}

fn image_format_from_cli(arg: ImageFormatArg) -> ImageFormat {
    match arg {
        ImageFormatArg::Png => ImageFormat::Png,
        ImageFormatArg::Jpeg => ImageFormat::Jpeg,
    }
}

/// Load config-file overrides, or none when no path was given.
pub fn load_config(path: Option<&Path>) -> Result<RenderOverrides, SlidexError> {
    match path {
        Some(path) => RenderOverrides::load(path),
        None => Ok(RenderOverrides::default()),
    }
}

/// Merge CLI flags over the config file over built-in defaults, then validate.
pub fn resolve_config(
    file: RenderOverrides,
    cli: RenderOverrides,
) -> Result<RenderConfig, SlidexError> {
    let config = RenderConfig::from_overrides(&file.overlay(cli));
    config.validate()?;
    Ok(config)
}

/// Format effective config as a single-line string.
pub fn format_effective_config(config: &RenderConfig, config_source: Option<&Path>) -> String {
    let source = config_source
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "defaults".to_string());
    format!(
        "Effective config [{source}]: output={}x{}, viewport={}, image={} (quality {}), margins={}/{}/{}/{}px, timeouts: launch={}s, pdf-nav={}s, image-nav={}s, settle: pdf={}ms, image={}ms, idle-window={}ms",
        config.width,
        config.height,
        config.viewport,
        config.image_format,
        config.image_quality,
        config.margin.top,
        config.margin.right,
        config.margin.bottom,
        config.margin.left,
        config.timeouts.launch.as_secs(),
        config.timeouts.document_navigation.as_secs(),
        config.timeouts.image_navigation.as_secs(),
        config.settle.document_delay.as_millis(),
        config.settle.image_delay.as_millis(),
        config.settle.idle_window.as_millis(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn resolve_prefers_config_when_flags_absent() {
        let file = RenderOverrides::from_toml("width = 1111\nheight = 222\n").expect("parse");
        let cli = cli_overrides(&Cli::parse_from(["slidex"]));

        let config = resolve_config(file, cli).expect("resolve");
        assert_eq!(config.width, 1111);
        assert_eq!(config.height, 222);
        assert_eq!(config.image_format, ImageFormat::Png);
    }

    #[test]
    fn resolve_prefers_cli_when_flags_present() {
        let file = RenderOverrides::from_toml(
            "width = 1111\nimage_format = \"png\"\n[viewport]\nwidth = 10\nheight = 20\n",
        )
        .expect("parse");
        let cli = cli_overrides(&Cli::parse_from([
            "slidex",
            "--width",
            "1280",
            "--image-format",
            "jpeg",
        ]));

        let config = resolve_config(file, cli).expect("resolve");
        assert_eq!(config.width, 1280);
        assert_eq!(config.image_format, ImageFormat::Jpeg);
        assert_eq!(config.viewport.width, 10);
        assert_eq!(config.viewport.height, 20);
    }

    #[test]
    fn resolve_rejects_invalid_merged_config() {
        let file = RenderOverrides::from_toml("image_quality = 200\n").expect("parse");
        let err = resolve_config(file, RenderOverrides::default()).unwrap_err();
        assert!(matches!(err, SlidexError::Config(_)));
    }

    #[test]
    fn missing_config_file_is_config_error() {
        let err = load_config(Some(Path::new("definitely/missing/slidex.toml"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));
    }

    #[test]
    fn format_effective_config_includes_all_fields() {
        let summary =
            format_effective_config(&RenderConfig::default(), Some(Path::new("slidex.toml")));
        assert!(summary.contains("output=1600x900"));
        assert!(summary.contains("viewport=1600x900"));
        assert!(summary.contains("image=png (quality 95)"));
        assert!(summary.contains("pdf-nav=45s"));
        assert!(summary.contains("image-nav=30s"));
        assert!(summary.contains("settle: pdf=7000ms"));
        assert!(summary.contains("slidex.toml"));
    }
}
