//! Mode-bit normalization so the host loader can traverse and read the bundle.
//!
//! A failure here does not necessarily make the bundle unloadable, so failures
//! are collected and handed back instead of aborting the export.

use std::path::{Path, PathBuf};

use serde::Serialize;

use super::{error::Error, layout::AssembledBundle};

/// Mode for the bundle root: traversable by everyone.
pub const ROOT_MODE: u32 = 0o755;
/// Mode for embedded assets: readable by everyone, writable by the owner.
pub const ASSET_MODE: u32 = 0o644;

/// A mode change that did not take effect.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PermissionWarning {
    pub path: PathBuf,
    pub mode: u32,
    pub message: String,
}

impl From<Error> for PermissionWarning {
    fn from(error: Error) -> Self {
        match error {
            Error::Permission { path, mode, error } => Self {
                path,
                mode,
                message: error.to_string(),
            },
            other => Self {
                path: PathBuf::new(),
                mode: 0,
                message: other.to_string(),
            },
        }
    }
}

/// Applies [`ROOT_MODE`] to the bundle root and [`ASSET_MODE`] to the video
/// and thumbnail, returning every change that failed.
pub fn normalize(bundle: &AssembledBundle) -> Vec<PermissionWarning> {
    let targets = [
        (bundle.layout.root(), ROOT_MODE),
        (bundle.video.as_path(), ASSET_MODE),
        (bundle.thumbnail.as_path(), ASSET_MODE),
    ];

    let warnings: Vec<PermissionWarning> = targets
        .into_iter()
        .filter_map(|(path, mode)| set_mode(path, mode).err())
        .map(PermissionWarning::from)
        .collect();

    for warning in &warnings {
        log::warn!(
            "Could not set mode {:o} on {}: {}",
            warning.mode,
            warning.path.display(),
            warning.message
        );
    }
    warnings
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> Result<(), Error> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode)).map_err(|error| {
        Error::Permission {
            path: path.to_path_buf(),
            mode,
            error,
        }
    })
}

#[cfg(not(unix))]
fn set_mode(_path: &Path, _mode: u32) -> Result<(), Error> {
    Ok(())
}
