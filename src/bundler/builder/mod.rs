//! Export orchestration and coordination.
//!
//! This module provides the [`Exporter`] that sequences one export:
//!
//! 1. Checks the template and destination
//! 2. Generates a fresh identity
//! 3. Assembles the bundle in a private staging directory
//! 4. Normalizes permissions and re-signs
//! 5. Moves the bundle into place and checksums it
//!
//! # Module Organization
//!
//! - [`checksum`] - SHA-256 over the finished bundle tree
//! - [`orchestrator`] - [`Exporter`] and [`ExportReport`]
//! - [`staging`] - staging directory with atomic commit
//! - [`tool_detection`] - signing utility lookup

mod checksum;
mod orchestrator;
mod staging;
mod tool_detection;

pub use checksum::calculate_directory_sha256;
pub use orchestrator::{ExportReport, Exporter};
pub use staging::Staging;
pub use tool_detection::CODESIGN;
