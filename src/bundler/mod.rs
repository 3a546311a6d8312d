//! Screen-saver bundle export pipeline.
//!
//! Turns a video and a still image into a signed `.saver` bundle built from a
//! template skeleton:
//!
//! ```text
//! Exporter ─► IdentityGenerator
//!          ─► BundleAssembler ─► thumbnail::normalize
//!          ─► permissions::normalize
//!          ─► SignatureRewriter ─► SigningRunner (codesign)
//! ```

pub mod assembler;
pub mod builder;
pub mod error;
pub mod identity;
pub mod instance;
pub mod layout;
pub mod manifest;
pub mod permissions;
pub mod request;
pub mod settings;
pub mod signing;
pub mod thumbnail;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;

pub use assembler::BundleAssembler;
pub use builder::{ExportReport, Exporter};
pub use error::{Error, Result};
pub use identity::{GeneratedIdentity, IdentityGenerator};
pub use layout::{AssembledBundle, BundleLayout};
pub use request::{ExportRequest, SourceAssets};
pub use settings::{ExportSettings, SettingsBuilder, TemplateSettings};
pub use signing::{CodesignRunner, SignatureRewriter, SigningInvocation, SigningRunner, ToolOutput};
