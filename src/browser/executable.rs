//! Chrome/Chromium executable discovery.
//!
//! Returning `None` is not an error: it tells the launcher to let the
//! engine locate its own default binary.

use std::path::{Path, PathBuf};

/// Environment variable that points at a Chrome/Chromium binary.
pub const CHROME_ENV_VAR: &str = "SLIDEX_CHROME";

const MACOS_CANDIDATES: &[&str] = &[
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "/Applications/Chromium.app/Contents/MacOS/Chromium",
];

const LINUX_CANDIDATES: &[&str] = &[
    "/usr/bin/google-chrome",
    "/usr/bin/google-chrome-stable",
    "/usr/bin/chromium-browser",
    "/usr/bin/chromium",
    "/snap/bin/chromium",
    "/usr/bin/google-chrome-beta",
    "/usr/bin/google-chrome-dev",
];

const WINDOWS_CANDIDATES: &[&str] = &[
    r"C:\Program Files\Google\Chrome\Application\chrome.exe",
    r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
];

/// Known install locations for a platform identifier as reported by `std::env::consts::OS`.
pub fn candidate_paths(os: &str) -> &'static [&'static str] {
    match os {
        "macos" => MACOS_CANDIDATES,
        "linux" => LINUX_CANDIDATES,
        "windows" => WINDOWS_CANDIDATES,
        _ => &[],
    }
}

/// First candidate accepted by `exists`.
pub fn resolve_from<I, P, F>(candidates: I, exists: F) -> Option<PathBuf>
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
    F: Fn(&Path) -> bool,
{
    candidates
        .into_iter()
        .map(Into::into)
        .find(|path| exists(path))
}

/// Locate a browser executable for the host platform.
///
/// `explicit` (from the config file) and the `SLIDEX_CHROME` variable are
/// consulted before the platform list; each is only used if it exists on disk.
pub fn resolve_executable(explicit: Option<&Path>) -> Option<PathBuf> {
    let from_env = std::env::var_os(CHROME_ENV_VAR)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from);

    let preferred = explicit.map(Path::to_path_buf).into_iter().chain(from_env);
    let platform = candidate_paths(std::env::consts::OS)
        .iter()
        .map(PathBuf::from);

    let found = resolve_from(preferred.chain(platform), |path| path.is_file());
    match &found {
        Some(path) => tracing::info!("Found Chrome at: {}", path.display()),
        None => tracing::info!("No Chrome executable found in standard locations"),
    }
    found
}
