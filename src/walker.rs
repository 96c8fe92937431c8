use std::path::{Path, PathBuf};

use crate::{Result, SlidexError};

/// Extension of the documents picked up by a batch.
pub const HTML_EXTENSION: &str = "html";

/// Recursively collect `*.html` files under `root`, sorted by path.
///
/// Directories are descended into but never yielded.
pub fn find_html_files(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(SlidexError::NotFound(root.to_path_buf()));
    }
    let root = std::path::absolute(root)?;
    let mut files = Vec::new();
    collect(&root, &mut files)?;
    files.sort();
    Ok(files)
}

fn collect(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        // follows symlinks, like a stat()
        let metadata = std::fs::metadata(&path)?;
        if metadata.is_dir() {
            collect(&path, files)?;
        } else if is_html(&path) {
            files.push(path);
        }
    }
    Ok(())
}

fn is_html(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == HTML_EXTENSION)
}
