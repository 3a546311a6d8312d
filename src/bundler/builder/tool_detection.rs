//! External tool detection.
//!
//! The signing utility is looked up once per process and cached.

use std::path::PathBuf;
use std::sync::LazyLock;

/// Path of `codesign` on `PATH`, if present.
pub static CODESIGN: LazyLock<Option<PathBuf>> = LazyLock::new(|| match which::which("codesign") {
    Ok(path) => {
        log::debug!("Found codesign at: {}", path.display());
        Some(path)
    }
    Err(e) => {
        log::debug!("codesign not found in PATH: {}", e);
        None
    }
});
