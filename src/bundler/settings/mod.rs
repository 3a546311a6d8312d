//! Configuration structures for export operations.
//!
//! [`TemplateSettings`] describes the template skeleton and is what the config
//! file deserializes into; [`ExportSettings`] is the validated, resolved form
//! built through [`SettingsBuilder`].

mod builder;
mod core;
mod template;

pub use builder::SettingsBuilder;
pub use core::ExportSettings;
pub use template::{DEFAULT_IDENTIFIER_PREFIX, DEFAULT_PLACEHOLDER_EXECUTABLE, TemplateSettings};
