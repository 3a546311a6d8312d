//! Screen-saver bundle builder.
//!
//! Builds a macOS `.saver` bundle that plays a user-supplied video: the
//! template skeleton is copied, the video and a PNG thumbnail are embedded,
//! the bundle receives a unique identity and is re-signed ad-hoc.
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod bundler;
pub mod cli;
pub mod config;
pub mod error;

// Re-export commonly used types
pub use error::{BuilderError, CliError, Result};
