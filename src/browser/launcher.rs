//! Engine launch with platform-tuned arguments and a single fallback attempt.

use tokio::time::timeout;
use tracing::{error, info, warn};

use super::engine::{Engine, EngineLauncher, LaunchOptions};
use super::executable::resolve_executable;
use crate::{RenderConfig, Result, SlidexError};

/// Arguments valid on every platform.
const BASE_ARGS: &[&str] = &[
    "--no-sandbox",
    "--disable-setuid-sandbox",
    "--disable-dev-shm-usage",
    "--disable-web-security",
    "--disable-gpu",
    "--no-first-run",
    "--disable-background-timer-throttling",
    "--disable-backgrounding-occluded-windows",
    "--disable-renderer-backgrounding",
];

/// Extra isolation/throttling flags for Linux, where CI sandboxes are the norm.
const LINUX_ARGS: &[&str] = &[
    "--disable-extensions",
    "--disable-plugins",
    "--disable-sync",
    "--disable-translate",
    "--disable-default-apps",
    "--disable-background-networking",
    "--disable-background-timer-throttling",
    "--disable-client-side-phishing-detection",
    "--disable-component-update",
    "--disable-hang-monitor",
    "--disable-prompt-on-repost",
    "--disable-web-resources",
    "--disable-features=TranslateUI",
    "--disable-ipc-flooding-protection",
    "--disable-blink-features=AutomationControlled",
    "--no-zygote",
    "--single-process",
];

/// Launch arguments for a platform identifier (`std::env::consts::OS`).
pub fn launch_args(os: &str) -> Vec<String> {
    let extra: &[&str] = if os == "linux" { LINUX_ARGS } else { &[] };
    let mut args: Vec<String> = Vec::with_capacity(BASE_ARGS.len() + extra.len());
    for arg in BASE_ARGS.iter().chain(extra) {
        if !args.iter().any(|existing| existing == arg) {
            args.push((*arg).to_string());
        }
    }
    args
}

/// Launch options for the host platform, with the executable resolved on disk.
pub fn default_launch_options(config: &RenderConfig) -> LaunchOptions {
    LaunchOptions {
        headless: true,
        args: launch_args(std::env::consts::OS),
        ignore_https_errors: true,
        timeout: config.timeouts.launch,
        executable: resolve_executable(config.chrome_executable.as_deref()),
    }
}

/// Start the engine, retrying once with the engine's default binary.
///
/// The retry keeps every option except the explicit executable. When the
/// first attempt already used the default binary the retry still happens,
/// which covers transient start-up failures.
pub async fn launch_engine(
    launcher: &dyn EngineLauncher,
    options: &LaunchOptions,
) -> Result<Box<dyn Engine>> {
    info!(
        "Attempting to launch browser with executable: {} (platform {})",
        options
            .executable
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "system default".to_string()),
        std::env::consts::OS
    );

    match attempt(launcher, options).await {
        Ok(engine) => {
            info!("Browser launched successfully");
            Ok(engine)
        }
        Err(err) => {
            warn!("Failed to launch browser: {err}; retrying without explicit Chrome path");
            let fallback = LaunchOptions {
                executable: None,
                ..options.clone()
            };
            match attempt(launcher, &fallback).await {
                Ok(engine) => {
                    info!("Browser launched with fallback options");
                    Ok(engine)
                }
                Err(fallback_err) => {
                    error!("Fallback launch also failed: {fallback_err}");
                    Err(match fallback_err {
                        SlidexError::Launch(msg) => SlidexError::Launch(msg),
                        other => SlidexError::Launch(other.to_string()),
                    })
                }
            }
        }
    }
}

async fn attempt(launcher: &dyn EngineLauncher, options: &LaunchOptions) -> Result<Box<dyn Engine>> {
    match timeout(options.timeout, launcher.launch(options)).await {
        Ok(result) => result,
        Err(_) => Err(SlidexError::timeout("launching the browser", options.timeout)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_linux_platforms_get_base_args_only() {
        let args = launch_args("macos");
        assert_eq!(args.len(), BASE_ARGS.len());
        assert!(args.contains(&"--no-sandbox".to_string()));
        assert!(!args.contains(&"--single-process".to_string()));
    }

    #[test]
    fn linux_adds_ci_flags_without_duplicates() {
        let args = launch_args("linux");
        assert!(args.contains(&"--no-zygote".to_string()));
        assert!(args.contains(&"--single-process".to_string()));
        let throttling = args
            .iter()
            .filter(|a| a.as_str() == "--disable-background-timer-throttling")
            .count();
        assert_eq!(throttling, 1);
        assert_eq!(args[0], "--no-sandbox");
    }

    #[test]
    fn default_options_use_configured_launch_timeout() {
        let mut config = RenderConfig::default();
        config.timeouts.launch = std::time::Duration::from_secs(5);
        let opts = default_launch_options(&config);
        assert!(opts.headless);
        assert!(opts.ignore_https_errors);
        assert_eq!(opts.timeout, std::time::Duration::from_secs(5));
    }
}
