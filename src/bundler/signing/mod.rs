//! Ad-hoc re-signing of assembled bundles.
//!
//! - [`SigningInvocation`] - one call of the signing utility
//! - [`SigningRunner`] - executes invocations; [`CodesignRunner`] is the real one
//! - [`SignatureRewriter`] - strips and re-signs a bundle inside-out

mod rewriter;
mod runner;

pub use rewriter::SignatureRewriter;
pub use runner::CodesignRunner;

use std::{
    ffi::OsString,
    fmt,
    future::Future,
    path::{Path, PathBuf},
};

use tokio_util::sync::CancellationToken;

use super::error::Result;

/// Identity string for an ad-hoc signature.
pub const AD_HOC_IDENTITY: &str = "-";

/// One out-of-process call to the signing utility.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SigningInvocation {
    /// `--remove-signature <path>`
    RemoveSignature(PathBuf),
    /// `--force --sign - <path>`
    Sign(PathBuf),
    /// `--force --deep --sign - <path>`
    DeepSign(PathBuf),
}

impl SigningInvocation {
    pub fn target(&self) -> &Path {
        match self {
            Self::RemoveSignature(p) | Self::Sign(p) | Self::DeepSign(p) => p,
        }
    }

    pub fn is_strip(&self) -> bool {
        matches!(self, Self::RemoveSignature(_))
    }

    /// Command-line arguments, target last.
    pub fn args(&self) -> Vec<OsString> {
        let flags: &[&str] = match self {
            Self::RemoveSignature(_) => &["--remove-signature"],
            Self::Sign(_) => &["--force", "--sign", AD_HOC_IDENTITY],
            Self::DeepSign(_) => &["--force", "--deep", "--sign", AD_HOC_IDENTITY],
        };
        flags
            .iter()
            .map(OsString::from)
            .chain(std::iter::once(self.target().as_os_str().to_owned()))
            .collect()
    }
}

impl fmt::Display for SigningInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let args: Vec<String> = self
            .args()
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        write!(f, "codesign {}", args.join(" "))
    }
}

/// Completion status and diagnostics of one invocation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Exit code; `None` if the process was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success() -> Self {
        Self {
            code: Some(0),
            ..Default::default()
        }
    }

    pub fn failure(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            stderr: stderr.into(),
            ..Default::default()
        }
    }

    pub fn succeeded(&self) -> bool {
        self.code == Some(0)
    }
}

/// Executes signing invocations.
///
/// Implementations must wait for the invocation to finish and report its real
/// exit status. If `cancel` fires first, the invocation is terminated and
/// [`Error::Cancelled`](super::Error::Cancelled) returned.
pub trait SigningRunner: Send + Sync {
    fn run(
        &self,
        invocation: &SigningInvocation,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<ToolOutput>> + Send;
}
