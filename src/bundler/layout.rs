//! On-disk shape of a `.saver` bundle and the host-loader contract it must meet.

use std::path::{Path, PathBuf};

use serde::Serialize;

use super::error::{Error, ErrorExt, Result};
use super::manifest::Manifest;

/// Extension the host uses to find the embedded video.
pub const VIDEO_EXTENSION: &str = "mp4";
/// Fixed resource name of the thumbnail.
pub const THUMBNAIL_FILE_NAME: &str = "thumbnail.png";

/// Absolute paths inside one bundle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BundleLayout {
    root: PathBuf,
    resources_dir: PathBuf,
    executable_dir: PathBuf,
    manifest_path: PathBuf,
}

impl BundleLayout {
    /// Derives the layout of the bundle rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let contents = root.join("Contents");
        Self {
            resources_dir: contents.join("Resources"),
            executable_dir: contents.join("MacOS"),
            manifest_path: contents.join("Info.plist"),
            root,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resources_dir(&self) -> &Path {
        &self.resources_dir
    }

    pub fn executable_dir(&self) -> &Path {
        &self.executable_dir
    }

    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    /// Regular files in the executable directory, sorted by name.
    pub fn executables(&self) -> Result<Vec<PathBuf>> {
        regular_files(&self.executable_dir)
    }
}

/// A bundle after assembly: layout plus the files placed into it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AssembledBundle {
    pub layout: BundleLayout,
    pub executable: PathBuf,
    pub video: PathBuf,
    pub thumbnail: PathBuf,
}

impl AssembledBundle {
    /// Re-roots every path at `new_root`, after the bundle has been moved there.
    pub fn relocate(&self, new_root: &Path) -> Result<Self> {
        let old_root = self.layout.root();
        let rebase = |path: &Path| -> Result<PathBuf> {
            Ok(new_root.join(path.strip_prefix(old_root)?))
        };

        Ok(Self {
            layout: BundleLayout::new(new_root),
            executable: rebase(&self.executable)?,
            video: rebase(&self.video)?,
            thumbnail: rebase(&self.thumbnail)?,
        })
    }
}

/// Verifies what the host loader relies on:
///
/// - the executable directory holds exactly one file, named by the manifest
/// - the resources directory holds exactly one video and the thumbnail
pub fn check_conformance(layout: &BundleLayout) -> Result<()> {
    let manifest = Manifest::load(layout.manifest_path())?;
    let declared = manifest.executable().ok_or_else(|| {
        Error::Configuration(format!(
            "{} has no {}",
            layout.manifest_path().display(),
            super::manifest::EXECUTABLE_KEY
        ))
    })?;

    let executables = layout.executables()?;
    let names: Vec<_> = executables
        .iter()
        .filter_map(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .collect();
    if names != [declared] {
        return Err(Error::Configuration(format!(
            "executable directory must contain only {declared}, found {names:?}"
        )));
    }

    let resources = regular_files(layout.resources_dir())?;
    let videos = resources
        .iter()
        .filter(|p| p.extension().is_some_and(|e| e == VIDEO_EXTENSION))
        .count();
    if videos != 1 {
        return Err(Error::Configuration(format!(
            "resources must contain exactly one .{VIDEO_EXTENSION} file, found {videos}"
        )));
    }
    if !resources
        .iter()
        .any(|p| p.file_name().is_some_and(|n| n == THUMBNAIL_FILE_NAME))
    {
        return Err(Error::Configuration(format!(
            "resources are missing {THUMBNAIL_FILE_NAME}"
        )));
    }

    Ok(())
}

fn regular_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).fs_context("listing", dir)? {
        let entry = entry.fs_context("listing", dir)?;
        if entry.file_type().fs_context("inspecting", entry.path())?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_follows_bundle_convention() {
        let layout = BundleLayout::new("/out/My.saver");
        assert_eq!(layout.resources_dir(), Path::new("/out/My.saver/Contents/Resources"));
        assert_eq!(layout.executable_dir(), Path::new("/out/My.saver/Contents/MacOS"));
        assert_eq!(layout.manifest_path(), Path::new("/out/My.saver/Contents/Info.plist"));
    }

    #[test]
    fn relocate_rebases_every_path() {
        let layout = BundleLayout::new("/staging/My.saver");
        let bundle = AssembledBundle {
            executable: layout.executable_dir().join("Viewer_1"),
            video: layout.resources_dir().join("video_1.mp4"),
            thumbnail: layout.resources_dir().join(THUMBNAIL_FILE_NAME),
            layout,
        };

        let moved = bundle.relocate(Path::new("/final/My.saver")).unwrap();
        assert_eq!(moved.layout.root(), Path::new("/final/My.saver"));
        assert_eq!(moved.executable, Path::new("/final/My.saver/Contents/MacOS/Viewer_1"));
        assert_eq!(
            moved.video,
            Path::new("/final/My.saver/Contents/Resources/video_1.mp4")
        );
    }

    #[test]
    fn executables_ignores_directories() {
        let dir = tempfile::tempdir().unwrap();
        let layout = BundleLayout::new(dir.path());
        std::fs::create_dir_all(layout.executable_dir().join("nested")).unwrap();
        std::fs::write(layout.executable_dir().join("b"), b"").unwrap();
        std::fs::write(layout.executable_dir().join("a"), b"").unwrap();

        let names: Vec<_> = layout
            .executables()
            .unwrap()
            .into_iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["a", "b"]);
    }
}
