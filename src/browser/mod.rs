//! Browser automation for slide rendering.
//!
//! # Module Structure
//!
//! - [`executable`] - Chrome/Chromium binary discovery per platform
//! - [`launcher`] - Launch arguments and the explicit-path → default fallback
//! - [`engine`] - Traits the render pipeline talks to
//! - [`chromium`] - `chromiumoxide` implementation of those traits
//!
//! # Example
//!
//! ```no_run
//! use slidex_lib::browser::{default_launch_options, launch_engine, ChromiumLauncher};
//! use slidex_lib::RenderConfig;
//!
//! # async fn example() -> slidex_lib::Result<()> {
//! let config = RenderConfig::default();
//! let engine = launch_engine(&ChromiumLauncher, &default_launch_options(&config)).await?;
//! engine.close().await?;
//! # Ok(())
//! # }
//! ```

mod chromium;
pub mod engine;
pub mod executable;
pub mod launcher;

pub use chromium::{ChromiumEngine, ChromiumLauncher, ChromiumPage};
pub use engine::{
    Engine, EngineLauncher, EnginePage, LaunchOptions, PdfOptions, ScreenshotOptions,
};
pub use executable::{candidate_paths, resolve_executable, resolve_from, CHROME_ENV_VAR};
pub use launcher::{default_launch_options, launch_args, launch_engine};
