//! Error types for the export pipeline.
//!
//! Every stage of an export maps its failures onto one [`Error`] variant so the
//! caller can tell a broken template from a failed signing step without parsing
//! messages.

use std::{
    fmt::Display,
    io,
    path::{Path, PathBuf},
};

use super::signing::SigningInvocation;

/// Result alias used throughout the pipeline.
pub type Result<T> = std::result::Result<T, Error>;

/// Pipeline error taxonomy.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The template skeleton is missing or does not satisfy the host contract.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A filesystem operation failed.
    #[error("{context} {}: {error}", path.display())]
    Fs {
        /// What was being done.
        context: &'static str,
        /// Path the operation targeted.
        path: PathBuf,
        /// Underlying error.
        error: io::Error,
    },

    /// Bare IO error without path context.
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    /// The thumbnail source could not be decoded or re-encoded.
    #[error("cannot normalize thumbnail {}: {reason}", path.display())]
    Format {
        /// Source image.
        path: PathBuf,
        /// Decoder or encoder message.
        reason: String,
    },

    /// A mode-bit change failed.
    #[error("cannot set permissions {mode:o} on {}: {error}", path.display())]
    Permission {
        /// Target path.
        path: PathBuf,
        /// Requested mode.
        mode: u32,
        /// Underlying error.
        error: io::Error,
    },

    /// The signing utility exited unsuccessfully.
    #[error("{invocation} failed (exit code {}): {stderr}", code.map_or_else(|| "none".to_string(), |c| c.to_string()))]
    Signing {
        /// Invocation that failed.
        invocation: SigningInvocation,
        /// Exit code, `None` when killed by a signal.
        code: Option<i32>,
        /// Captured diagnostics.
        stderr: String,
    },

    /// An input file is not one of the recognized kinds.
    #[error("unsupported {kind} file {}: expected one of {expected}", path.display())]
    UnsupportedAsset {
        /// "video" or "thumbnail".
        kind: &'static str,
        /// Offending path.
        path: PathBuf,
        /// Accepted suffixes.
        expected: String,
    },

    /// The manifest could not be parsed or written.
    #[error("manifest {}: {error}", path.display())]
    Manifest {
        /// Manifest path.
        path: PathBuf,
        /// Property list error.
        error: plist::Error,
    },

    /// The export was aborted by its caller.
    #[error("export cancelled")]
    Cancelled,

    /// Another instance of the builder is already running.
    #[error("another instance is already running (pid {pid})")]
    AlreadyRunning {
        /// Process id of the other instance.
        pid: u32,
    },

    /// Error produced by a directory walk.
    #[error("{0}")]
    WalkDir(#[from] walkdir::Error),

    /// Path prefix error.
    #[error("{0}")]
    StripPrefix(#[from] std::path::StripPrefixError),

    /// Anything else, with a message.
    #[error("{0}")]
    GenericError(String),
}

impl Error {
    /// True when the failure happened before anything was written.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration(_))
    }
}

/// Attaches filesystem context to IO results.
pub trait ErrorExt<T> {
    /// Wraps an IO error with what was being done and to which path.
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, io::Error> {
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context,
            path: path.as_ref().to_path_buf(),
            error,
        })
    }
}

/// Converts options and foreign errors into [`Error::GenericError`].
pub trait Context<T> {
    /// Attaches a static message.
    fn context<C: Display + Send + Sync + 'static>(self, context: C) -> Result<T>;

    /// Attaches a lazily built message.
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T> Context<T> for Option<T> {
    fn context<C: Display + Send + Sync + 'static>(self, context: C) -> Result<T> {
        self.ok_or_else(|| Error::GenericError(context.to_string()))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.ok_or_else(|| Error::GenericError(f().to_string()))
    }
}

impl<T> Context<T> for Result<T> {
    fn context<C: Display + Send + Sync + 'static>(self, context: C) -> Result<T> {
        self.map_err(|e| Error::GenericError(format!("{context}: {e}")))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| Error::GenericError(format!("{}: {e}", f())))
    }
}

/// Returns early with a [`Error::GenericError`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::bundler::Error::GenericError(format!($($arg)*)))
    };
}
