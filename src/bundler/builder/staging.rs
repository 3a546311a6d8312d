//! Private build area next to the destination.
//!
//! The bundle is built inside a temp directory in the destination's parent
//! (same filesystem, so the final rename is atomic). Dropping a [`Staging`]
//! without committing removes everything it holds.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::bundler::error::{Context, Error, ErrorExt, Result};

#[derive(Debug)]
pub struct Staging {
    dir: TempDir,
    bundle_root: PathBuf,
}

impl Staging {
    /// Creates the staging area for a bundle that will end up at `destination`.
    pub fn prepare(destination: &Path) -> Result<Self> {
        let file_name = destination
            .file_name()
            .with_context(|| format!("destination {} has no file name", destination.display()))?;
        let parent = match destination.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };

        std::fs::create_dir_all(&parent).fs_context("creating destination parent", &parent)?;

        let dir = tempfile::Builder::new()
            .prefix(&format!(".{}.staging-", file_name.to_string_lossy()))
            .tempdir_in(&parent)
            .fs_context("creating staging directory in", &parent)?;
        let bundle_root = dir.path().join(file_name);

        log::debug!("Staging bundle at {}", bundle_root.display());
        Ok(Self { dir, bundle_root })
    }

    /// Where the bundle is assembled.
    pub fn bundle_root(&self) -> &Path {
        &self.bundle_root
    }

    /// Scratch space for intermediate files; never part of the bundle.
    pub fn scratch_dir(&self) -> &Path {
        self.dir.path()
    }

    /// Moves the finished bundle to `destination` and removes the staging area.
    ///
    /// Fails without touching `destination` if something already exists there.
    /// On Unix a directory rename replaces an empty target directory, so the
    /// target is first claimed with `create_dir`, which fails if anything is
    /// already there; the rename then replaces only that placeholder.
    pub fn commit(self, destination: &Path) -> Result<()> {
        claim(destination)?;
        if let Err(error) = std::fs::rename(&self.bundle_root, destination) {
            release(destination);
            return Err(Error::Fs {
                context: "moving bundle into place at",
                path: destination.to_path_buf(),
                error,
            });
        }
        log::debug!("Committed {}", destination.display());
        Ok(())
    }
}

#[cfg(unix)]
fn claim(destination: &Path) -> Result<()> {
    std::fs::create_dir(destination).map_err(|error| Error::Fs {
        context: "refusing to overwrite",
        path: destination.to_path_buf(),
        error,
    })
}

#[cfg(unix)]
fn release(destination: &Path) {
    // remove_dir only succeeds while the placeholder is still empty
    if let Err(e) = std::fs::remove_dir(destination) {
        log::warn!("Could not remove placeholder {}: {e}", destination.display());
    }
}

// rename never replaces an existing directory here
#[cfg(not(unix))]
fn claim(destination: &Path) -> Result<()> {
    if destination.exists() {
        return Err(Error::Fs {
            context: "refusing to overwrite",
            path: destination.to_path_buf(),
            error: std::io::Error::from(std::io::ErrorKind::AlreadyExists),
        });
    }
    Ok(())
}

#[cfg(not(unix))]
fn release(_destination: &Path) {}
