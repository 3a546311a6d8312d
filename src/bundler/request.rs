//! Export inputs.

use std::path::{Path, PathBuf};

use super::error::{Error, Result};

/// Video container suffixes the host player accepts.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov"];
/// Raster suffixes accepted as thumbnails.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];
/// Suffix of a screen-saver bundle.
pub const BUNDLE_EXTENSION: &str = "saver";

/// The user's video and still image. Read-only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceAssets {
    video: PathBuf,
    thumbnail: PathBuf,
}

impl SourceAssets {
    /// Validates suffixes and that both inputs are existing files.
    pub fn new(video: impl Into<PathBuf>, thumbnail: impl Into<PathBuf>) -> Result<Self> {
        let video = video.into();
        let thumbnail = thumbnail.into();
        check_asset("video", &video, VIDEO_EXTENSIONS)?;
        check_asset("thumbnail", &thumbnail, IMAGE_EXTENSIONS)?;
        Ok(Self { video, thumbnail })
    }

    pub fn video(&self) -> &Path {
        &self.video
    }

    pub fn thumbnail(&self) -> &Path {
        &self.thumbnail
    }
}

/// Returns true if `path` ends in one of `extensions`, ignoring case.
pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| extensions.iter().any(|x| x.eq_ignore_ascii_case(e)))
}

fn check_asset(kind: &'static str, path: &Path, extensions: &[&str]) -> Result<()> {
    if !has_extension(path, extensions) {
        return Err(Error::UnsupportedAsset {
            kind,
            path: path.to_path_buf(),
            expected: extensions.join(", "),
        });
    }
    if !path.is_file() {
        crate::bail!("{kind} {} does not exist or is not a file", path.display());
    }
    Ok(())
}

/// One user-initiated export.
#[derive(Clone, Debug)]
pub struct ExportRequest {
    destination: PathBuf,
    display_name: String,
    assets: SourceAssets,
}

impl ExportRequest {
    /// Creates a request; the display name defaults to the destination's file
    /// name. A trailing `.saver` is stripped from either.
    pub fn new(destination: impl Into<PathBuf>, display_name: Option<&str>, assets: SourceAssets) -> Result<Self> {
        let destination = destination.into();
        let name = match display_name {
            Some(name) => name.to_string(),
            None => destination
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .ok_or_else(|| {
                    Error::GenericError(format!(
                        "destination {} has no file name",
                        destination.display()
                    ))
                })?,
        };

        let display_name = strip_bundle_suffix(&name).to_string();
        if display_name.trim().is_empty() {
            crate::bail!("display name cannot be empty");
        }

        Ok(Self {
            destination,
            display_name,
            assets,
        })
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn assets(&self) -> &SourceAssets {
        &self.assets
    }
}

/// `"Ocean.saver"` → `"Ocean"`; other names are returned unchanged.
pub fn strip_bundle_suffix(name: &str) -> &str {
    let dotted = format!(".{BUNDLE_EXTENSION}");
    if name.len() > dotted.len() && name.to_ascii_lowercase().ends_with(&dotted) {
        &name[..name.len() - dotted.len()]
    } else {
        name
    }
}
