//! Bundle assembly: template copy, asset embedding, manifest rewrite and
//! executable rename.
//!
//! # Process
//!
//! 1. Copy the template tree verbatim to the destination
//! 2. Ensure `Contents/Resources` exists
//! 3. Copy the video in as `video_{suffix}.mp4`
//! 4. Re-encode the thumbnail and place it at `thumbnail.png`
//! 5. Rewrite the identity keys of `Info.plist`
//! 6. Rename the placeholder executable to the generated name
//!
//! A failing step aborts assembly. Nothing is cleaned up here; callers build
//! into a staging directory they own.

use std::path::{Path, PathBuf};

use super::{
    error::{Error, ErrorExt, Result},
    identity::GeneratedIdentity,
    layout::{AssembledBundle, BundleLayout, THUMBNAIL_FILE_NAME, VIDEO_EXTENSION, check_conformance},
    manifest::Manifest,
    request::SourceAssets,
    thumbnail,
    utils::fs,
};

/// Builds customized bundles from one template skeleton.
#[derive(Clone, Debug)]
pub struct BundleAssembler {
    placeholder_executable: String,
}

impl BundleAssembler {
    /// `placeholder_executable` is the file name of the executable shipped in
    /// the template's `Contents/MacOS`.
    pub fn new(placeholder_executable: impl Into<String>) -> Self {
        Self {
            placeholder_executable: placeholder_executable.into(),
        }
    }

    /// Assembles a bundle at `destination`.
    ///
    /// `scratch_dir` receives the intermediate PNG; it must outlive the call.
    pub async fn assemble(
        &self,
        template: &Path,
        destination: &Path,
        identity: &GeneratedIdentity,
        assets: &SourceAssets,
        display_name: &str,
        scratch_dir: &Path,
    ) -> Result<AssembledBundle> {
        log::info!("Assembling {} from {}", destination.display(), template.display());

        if !template.is_dir() {
            return Err(Error::Fs {
                context: "template skeleton missing",
                path: template.to_path_buf(),
                error: std::io::Error::from(std::io::ErrorKind::NotFound),
            });
        }
        fs::copy_dir(template, destination).await?;

        let layout = BundleLayout::new(destination);
        tokio::fs::create_dir_all(layout.resources_dir())
            .await
            .fs_context("creating resources directory", layout.resources_dir())?;

        let video = layout
            .resources_dir()
            .join(format!("video_{}.{VIDEO_EXTENSION}", identity.suffix()));
        fs::copy_file(assets.video(), &video).await?;
        log::debug!("Embedded video as {}", video.display());

        let thumbnail = self
            .embed_thumbnail(assets.thumbnail(), &layout, scratch_dir)
            .await?;

        let mut manifest = Manifest::load(layout.manifest_path())?;
        manifest.apply_identity(identity, display_name);
        manifest.save()?;

        let placeholder = layout.executable_dir().join(&self.placeholder_executable);
        if !placeholder.is_file() {
            return Err(Error::Configuration(format!(
                "template has no placeholder executable at {}",
                placeholder.display()
            )));
        }
        let executable = layout.executable_dir().join(identity.executable_name());
        fs::rename_new(&placeholder, &executable).await?;

        check_conformance(&layout)?;

        log::info!("✓ Assembled bundle {}", identity.executable_name());

        Ok(AssembledBundle {
            layout,
            executable,
            video,
            thumbnail,
        })
    }

    async fn embed_thumbnail(
        &self,
        source: &Path,
        layout: &BundleLayout,
        scratch_dir: &Path,
    ) -> Result<PathBuf> {
        let source = source.to_path_buf();
        let scratch = scratch_dir.to_path_buf();
        let normalized = tokio::task::spawn_blocking(move || thumbnail::normalize(&source, &scratch))
            .await
            .map_err(|e| Error::GenericError(format!("thumbnail task panicked: {e}")))??;

        let target = layout.resources_dir().join(THUMBNAIL_FILE_NAME);
        fs::copy_file(normalized.path(), &target).await?;
        Ok(target)
    }
}
