//! Render configuration and override merging.
//!
//! A [`RenderConfig`] is built once per batch by merging caller
//! [`RenderOverrides`] over [`RenderConfig::default`] and is immutable
//! afterwards. Overrides come from the library caller, a TOML config file,
//! or CLI flags; scalar values replace the default, nested records
//! (`viewport`, `margin`, `timeouts`, `settle`) merge field by field.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Result, SlidexError, Viewport};

/// Device scale factor forced on the PDF path regardless of the configured viewport.
pub const DOCUMENT_SCALE_FACTOR: f64 = 2.0;

/// CSS reference pixels per inch; the print backend measures paper in inches.
pub const CSS_PIXELS_PER_INCH: f64 = 96.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
    Jpeg,
}

impl ImageFormat {
    /// Quality only applies to lossy formats.
    pub fn is_lossy(self) -> bool {
        matches!(self, ImageFormat::Jpeg)
    }
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageFormat::Png => f.write_str("png"),
            ImageFormat::Jpeg => f.write_str("jpeg"),
        }
    }
}

/// Page margins in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Timeouts {
    #[serde(with = "humantime_serde")]
    pub launch: Duration,
    #[serde(with = "humantime_serde")]
    pub document_navigation: Duration,
    #[serde(with = "humantime_serde")]
    pub image_navigation: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            launch: Duration::from_secs(60),
            document_navigation: Duration::from_secs(45),
            image_navigation: Duration::from_secs(30),
        }
    }
}

/// Waits applied after the network goes quiet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SettleConfig {
    /// Delay before fonts/images are inspected on the PDF path.
    #[serde(with = "humantime_serde")]
    pub document_delay: Duration,
    /// Delay before the screenshot on the image path.
    #[serde(with = "humantime_serde")]
    pub image_delay: Duration,
    /// How long the resource count must stay unchanged to count as network idle.
    #[serde(with = "humantime_serde")]
    pub idle_window: Duration,
    #[serde(with = "humantime_serde")]
    pub poll_interval: Duration,
}

impl Default for SettleConfig {
    fn default() -> Self {
        Self {
            document_delay: Duration::from_millis(7000),
            image_delay: Duration::from_millis(2000),
            idle_window: Duration::from_millis(500),
            poll_interval: Duration::from_millis(100),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub print_background: bool,
    pub margin: Margin,
    pub viewport: Viewport,
    pub image_format: ImageFormat,
    pub image_quality: u8,
    pub chrome_executable: Option<PathBuf>,
    pub timeouts: Timeouts,
    pub settle: SettleConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1600,
            height: 900,
            print_background: true,
            margin: Margin::default(),
            viewport: Viewport::default(),
            image_format: ImageFormat::Png,
            image_quality: 95,
            chrome_executable: None,
            timeouts: Timeouts::default(),
            settle: SettleConfig::default(),
        }
    }
}

impl RenderConfig {
    /// Defaults with `overrides` applied.
    pub fn from_overrides(overrides: &RenderOverrides) -> Self {
        Self::default().merge(overrides)
    }

    /// Returns a copy of `self` with every value present in `overrides` replacing ours.
    pub fn merge(&self, overrides: &RenderOverrides) -> Self {
        let viewport = overrides.viewport.unwrap_or_default();
        let margin = overrides.margin.unwrap_or_default();
        let timeouts = overrides.timeouts.unwrap_or_default();
        let settle = overrides.settle.unwrap_or_default();

        Self {
            width: overrides.width.unwrap_or(self.width),
            height: overrides.height.unwrap_or(self.height),
            print_background: overrides.print_background.unwrap_or(self.print_background),
            margin: Margin {
                top: margin.top.unwrap_or(self.margin.top),
                right: margin.right.unwrap_or(self.margin.right),
                bottom: margin.bottom.unwrap_or(self.margin.bottom),
                left: margin.left.unwrap_or(self.margin.left),
            },
            viewport: Viewport {
                width: viewport.width.unwrap_or(self.viewport.width),
                height: viewport.height.unwrap_or(self.viewport.height),
                device_scale_factor: viewport
                    .device_scale_factor
                    .unwrap_or(self.viewport.device_scale_factor),
            },
            image_format: overrides.image_format.unwrap_or(self.image_format),
            image_quality: overrides.image_quality.unwrap_or(self.image_quality),
            chrome_executable: overrides
                .chrome_executable
                .clone()
                .or_else(|| self.chrome_executable.clone()),
            timeouts: Timeouts {
                launch: timeouts.launch.unwrap_or(self.timeouts.launch),
                document_navigation: timeouts
                    .document_navigation
                    .unwrap_or(self.timeouts.document_navigation),
                image_navigation: timeouts
                    .image_navigation
                    .unwrap_or(self.timeouts.image_navigation),
            },
            settle: SettleConfig {
                document_delay: settle.document_delay.unwrap_or(self.settle.document_delay),
                image_delay: settle.image_delay.unwrap_or(self.settle.image_delay),
                idle_window: settle.idle_window.unwrap_or(self.settle.idle_window),
                poll_interval: settle.poll_interval.unwrap_or(self.settle.poll_interval),
            },
        }
    }

    /// Viewport used on the PDF path.
    pub fn document_viewport(&self) -> Viewport {
        self.viewport.with_scale(DOCUMENT_SCALE_FACTOR)
    }

    /// True when the output geometry and the layout viewport disagree.
    pub fn geometry_mismatch(&self) -> bool {
        self.width != self.viewport.width || self.height != self.viewport.height
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SlidexError::Config(format!(
                "output size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Err(SlidexError::Config(format!(
                "viewport size must be positive, got {}",
                self.viewport
            )));
        }
        let scale = self.viewport.device_scale_factor;
        if !(scale.is_finite() && scale > 0.0) {
            return Err(SlidexError::Config(format!(
                "device scale factor must be positive, got {scale}"
            )));
        }
        if self.image_quality > 100 {
            return Err(SlidexError::Config(format!(
                "image quality must be at most 100, got {}",
                self.image_quality
            )));
        }
        let m = &self.margin;
        for (side, value) in [
            ("top", m.top),
            ("right", m.right),
            ("bottom", m.bottom),
            ("left", m.left),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(SlidexError::Config(format!(
                    "margin {side} must be a non-negative number, got {value}"
                )));
            }
        }
        if self.settle.poll_interval.is_zero() {
            return Err(SlidexError::Config(
                "settle poll_interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ViewportOverrides {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub device_scale_factor: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MarginOverrides {
    pub top: Option<f64>,
    pub right: Option<f64>,
    pub bottom: Option<f64>,
    pub left: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimeoutOverrides {
    #[serde(default, with = "humantime_serde")]
    pub launch: Option<Duration>,
    #[serde(default, with = "humantime_serde")]
    pub document_navigation: Option<Duration>,
    #[serde(default, with = "humantime_serde")]
    pub image_navigation: Option<Duration>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SettleOverrides {
    #[serde(default, with = "humantime_serde")]
    pub document_delay: Option<Duration>,
    #[serde(default, with = "humantime_serde")]
    pub image_delay: Option<Duration>,
    #[serde(default, with = "humantime_serde")]
    pub idle_window: Option<Duration>,
    #[serde(default, with = "humantime_serde")]
    pub poll_interval: Option<Duration>,
}

/// Caller-supplied partial configuration. Absent keys keep the base value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RenderOverrides {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub print_background: Option<bool>,
    pub margin: Option<MarginOverrides>,
    pub viewport: Option<ViewportOverrides>,
    pub image_format: Option<ImageFormat>,
    pub image_quality: Option<u8>,
    pub chrome_executable: Option<PathBuf>,
    pub timeouts: Option<TimeoutOverrides>,
    pub settle: Option<SettleOverrides>,
}

impl RenderOverrides {
    /// Load overrides from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            SlidexError::Config(format!("Failed to read config {}: {}", path.display(), e))
        })?;
        toml::from_str(&raw).map_err(|e| {
            SlidexError::Config(format!("Invalid TOML in {}: {}", path.display(), e))
        })
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| SlidexError::Config(format!("invalid TOML: {e}")))
    }

    /// Layer `higher` on top of `self`; values present in `higher` win.
    pub fn overlay(self, higher: RenderOverrides) -> Self {
        Self {
            width: higher.width.or(self.width),
            height: higher.height.or(self.height),
            print_background: higher.print_background.or(self.print_background),
            margin: overlay_nested(self.margin, higher.margin, |base, top| MarginOverrides {
                top: top.top.or(base.top),
                right: top.right.or(base.right),
                bottom: top.bottom.or(base.bottom),
                left: top.left.or(base.left),
            }),
            viewport: overlay_nested(self.viewport, higher.viewport, |base, top| {
                ViewportOverrides {
                    width: top.width.or(base.width),
                    height: top.height.or(base.height),
                    device_scale_factor: top.device_scale_factor.or(base.device_scale_factor),
                }
            }),
            image_format: higher.image_format.or(self.image_format),
            image_quality: higher.image_quality.or(self.image_quality),
            chrome_executable: higher.chrome_executable.or(self.chrome_executable),
            timeouts: overlay_nested(self.timeouts, higher.timeouts, |base, top| {
                TimeoutOverrides {
                    launch: top.launch.or(base.launch),
                    document_navigation: top.document_navigation.or(base.document_navigation),
                    image_navigation: top.image_navigation.or(base.image_navigation),
                }
            }),
            settle: overlay_nested(self.settle, higher.settle, |base, top| SettleOverrides {
                document_delay: top.document_delay.or(base.document_delay),
                image_delay: top.image_delay.or(base.image_delay),
                idle_window: top.idle_window.or(base.idle_window),
                poll_interval: top.poll_interval.or(base.poll_interval),
            }),
        }
    }
}

fn overlay_nested<T: Copy>(
    base: Option<T>,
    higher: Option<T>,
    combine: impl Fn(T, T) -> T,
) -> Option<T> {
    match (base, higher) {
        (Some(base), Some(higher)) => Some(combine(base, higher)),
        (base, higher) => higher.or(base),
    }
}
