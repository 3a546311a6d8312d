//! Top-level error types for the builder.
//!
//! Wraps pipeline errors together with CLI and configuration failures, and
//! maps each onto a process exit code.

use thiserror::Error;

/// Result type alias for builder operations
pub type Result<T> = std::result::Result<T, BuilderError>;

/// Main error type for all builder operations
#[derive(Error, Debug)]
pub enum BuilderError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Config file parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Export pipeline errors
    #[error("Export failed: {0}")]
    Export(#[from] crate::bundler::Error),

    /// Generic errors from anyhow
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// Command execution failed
    #[error("Command execution failed: {command} - {reason}")]
    ExecutionFailed {
        /// Command that failed
        command: String,
        /// Reason for the error
        reason: String,
    },
}

impl BuilderError {
    /// Process exit code for this error.
    ///
    /// - 2: another instance is running
    /// - 3: template or configuration problem
    /// - 4: signing failed
    /// - 1: anything else
    pub fn exit_code(&self) -> i32 {
        use crate::bundler::Error as E;
        match self {
            BuilderError::Export(E::AlreadyRunning { .. }) => 2,
            BuilderError::Export(E::Configuration(_)) | BuilderError::Toml(_) => 3,
            BuilderError::Export(E::Signing { .. }) => 4,
            _ => 1,
        }
    }

    /// Actionable hints for this error.
    pub fn recovery_suggestions(&self) -> Vec<String> {
        use crate::bundler::Error as E;
        match self {
            BuilderError::Export(E::Configuration(_)) => vec![
                "Pass --template pointing at the ScreenSaverViewer.saver skeleton".to_string(),
                "Or set template_path in the config file".to_string(),
            ],
            BuilderError::Export(E::Signing { .. }) => vec![
                "Run `codesign -dv` on the template executable to check it is a valid Mach-O"
                    .to_string(),
            ],
            BuilderError::Export(E::AlreadyRunning { .. }) => {
                vec!["Wait for the other export to finish".to_string()]
            }
            BuilderError::Export(E::UnsupportedAsset { .. }) => {
                vec!["Use an .mp4/.mov video and a .png/.jpg thumbnail".to_string()]
            }
            _ => Vec::new(),
        }
    }
}
