use std::path::Path;

use crate::{Result, SlidexError};

/// Read an HTML document as UTF-8 text. The markup is not parsed or validated.
pub fn read_html(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(SlidexError::FileNotFound(path.to_path_buf()));
    }
    Ok(std::fs::read_to_string(path)?)
}
