//! Resolved export settings.

use std::path::{Path, PathBuf};

use super::TemplateSettings;

/// Everything an [`Exporter`](crate::bundler::Exporter) needs besides the
/// request itself. Constructed via [`SettingsBuilder`](super::SettingsBuilder).
#[derive(Clone, Debug)]
pub struct ExportSettings {
    /// Root of the template skeleton (`*.saver` directory).
    template: PathBuf,

    /// Naming conventions of the template.
    template_settings: TemplateSettings,

    /// Signing utility to invoke.
    codesign: PathBuf,
}

impl ExportSettings {
    pub(super) fn new(template: PathBuf, template_settings: TemplateSettings, codesign: PathBuf) -> Self {
        Self {
            template,
            template_settings,
            codesign,
        }
    }

    pub fn template(&self) -> &Path {
        &self.template
    }

    pub fn placeholder_executable(&self) -> &str {
        &self.template_settings.placeholder_executable
    }

    pub fn identifier_prefix(&self) -> &str {
        &self.template_settings.identifier_prefix
    }

    pub fn codesign(&self) -> &Path {
        &self.codesign
    }
}
