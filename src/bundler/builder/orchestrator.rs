//! Export orchestration.
//!
//! This module provides the [`Exporter`] that runs one export request through
//! identity generation, assembly, permission normalization and signing, and
//! moves the result into place only when every step succeeded.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tokio_util::sync::CancellationToken;

use super::{checksum::calculate_directory_sha256, staging::Staging};
use crate::bundler::{
    assembler::BundleAssembler,
    error::{Error, Result},
    identity::{GeneratedIdentity, IdentityGenerator},
    layout::AssembledBundle,
    permissions::{self, PermissionWarning},
    request::ExportRequest,
    settings::ExportSettings,
    signing::{CodesignRunner, SignatureRewriter, SigningRunner},
};

/// Outcome of a successful export.
#[derive(Clone, Debug, Serialize)]
pub struct ExportReport {
    /// Final location of the bundle.
    pub bundle: PathBuf,
    pub display_name: String,
    pub identity: GeneratedIdentity,
    /// Executable, video and thumbnail at their final paths.
    pub contents: AssembledBundle,
    /// SHA-256 over the bundle tree.
    pub checksum: String,
    /// Mode changes that did not take effect.
    pub warnings: Vec<PermissionWarning>,
}

/// Runs export requests against one template.
///
/// # Examples
///
/// ```no_run
/// use saver_builder::bundler::{Exporter, ExportRequest, SettingsBuilder, SourceAssets};
///
/// # async fn example() -> saver_builder::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .template("ScreenSaverViewer.saver")
///     .build()?;
/// let exporter = Exporter::new(settings);
///
/// let assets = SourceAssets::new("clip.mov", "pic.jpg")?;
/// let request = ExportRequest::new("MyScreenSaver.saver", None, assets)?;
/// let report = exporter.export(&request).await?;
/// println!("Created {}", report.bundle.display());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Exporter<R = CodesignRunner> {
    settings: ExportSettings,
    identities: IdentityGenerator,
    assembler: BundleAssembler,
    signer: SignatureRewriter<R>,
}

impl Exporter<CodesignRunner> {
    /// Creates an exporter that signs with the configured `codesign`.
    pub fn new(settings: ExportSettings) -> Self {
        let runner = CodesignRunner::new(settings.codesign());
        Self::with_runner(settings, runner)
    }
}

impl<R: SigningRunner> Exporter<R> {
    /// Creates an exporter with a custom signing runner.
    pub fn with_runner(settings: ExportSettings, runner: R) -> Self {
        Self {
            identities: IdentityGenerator::new(
                settings.placeholder_executable(),
                settings.identifier_prefix(),
            ),
            assembler: BundleAssembler::new(settings.placeholder_executable()),
            signer: SignatureRewriter::new(runner),
            settings,
        }
    }

    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    pub fn signer(&self) -> &SignatureRewriter<R> {
        &self.signer
    }

    /// Runs one export to completion.
    pub async fn export(&self, request: &ExportRequest) -> Result<ExportReport> {
        self.export_with_cancel(request, &CancellationToken::new())
            .await
    }

    /// Runs one export, aborting when `cancel` fires.
    ///
    /// On any error, including cancellation, nothing is left at the
    /// destination.
    pub async fn export_with_cancel(
        &self,
        request: &ExportRequest,
        cancel: &CancellationToken,
    ) -> Result<ExportReport> {
        let destination = request.destination();
        log::info!(
            "Exporting \"{}\" to {}",
            request.display_name(),
            destination.display()
        );

        self.check_preconditions(destination)?;

        let identity = self.identities.generate();
        let staging = Staging::prepare(destination)?;

        let (bundle, warnings) = self
            .build_in(&staging, request, &identity, cancel)
            .await?;

        // Hash paths are relative, so the staged tree hashes like the final one.
        let checksum = calculate_directory_sha256(staging.bundle_root()).await?;
        let contents = bundle.relocate(destination)?;

        // Commit is the last fallible step.
        ensure_not_cancelled(cancel)?;
        staging.commit(destination)?;

        log::info!("✓ Exported {} ({})", destination.display(), identity.executable_name());

        Ok(ExportReport {
            bundle: destination.to_path_buf(),
            display_name: request.display_name().to_string(),
            identity,
            contents,
            checksum,
            warnings,
        })
    }

    /// Template present, destination free. Runs before anything is written.
    fn check_preconditions(&self, destination: &Path) -> Result<()> {
        let template = self.settings.template();
        if !template.is_dir() {
            return Err(Error::Configuration(format!(
                "template skeleton not found at {}",
                template.display()
            )));
        }
        if destination.exists() {
            return Err(Error::Fs {
                context: "destination already exists",
                path: destination.to_path_buf(),
                error: std::io::Error::from(std::io::ErrorKind::AlreadyExists),
            });
        }
        Ok(())
    }

    async fn build_in(
        &self,
        staging: &Staging,
        request: &ExportRequest,
        identity: &GeneratedIdentity,
        cancel: &CancellationToken,
    ) -> Result<(AssembledBundle, Vec<PermissionWarning>)> {
        let bundle = self
            .assembler
            .assemble(
                self.settings.template(),
                staging.bundle_root(),
                identity,
                request.assets(),
                request.display_name(),
                staging.scratch_dir(),
            )
            .await?;
        ensure_not_cancelled(cancel)?;

        let warnings = permissions::normalize(&bundle);
        ensure_not_cancelled(cancel)?;

        self.signer.resign(&bundle.layout, cancel).await?;
        Ok((bundle, warnings))
    }
}

fn ensure_not_cancelled(cancel: &CancellationToken) -> Result<()> {
    if cancel.is_cancelled() {
        Err(Error::Cancelled)
    } else {
        Ok(())
    }
}
