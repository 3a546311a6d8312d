//! Builder for constructing ExportSettings.

use super::{ExportSettings, TemplateSettings};
use crate::bundler::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Builder for constructing [`ExportSettings`].
///
/// # Examples
///
/// ```no_run
/// use saver_builder::bundler::SettingsBuilder;
///
/// # fn example() -> saver_builder::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .template("/Applications/Saver Builder.app/Contents/Resources/ScreenSaverViewer.saver")
///     .identifier_prefix("com.example.viewer")
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct SettingsBuilder {
    template: Option<PathBuf>,
    template_settings: TemplateSettings,
    codesign: Option<PathBuf>,
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the template skeleton.
    ///
    /// # Required
    pub fn template<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.template = Some(path.as_ref().to_path_buf());
        self
    }

    /// Replaces all template naming conventions at once.
    pub fn template_settings(mut self, settings: TemplateSettings) -> Self {
        self.template_settings = settings;
        self
    }

    /// Sets the placeholder executable name.
    ///
    /// Default: [`DEFAULT_PLACEHOLDER_EXECUTABLE`](super::DEFAULT_PLACEHOLDER_EXECUTABLE)
    pub fn placeholder_executable(mut self, name: impl Into<String>) -> Self {
        self.template_settings.placeholder_executable = name.into();
        self
    }

    /// Sets the bundle identifier prefix.
    ///
    /// Default: [`DEFAULT_IDENTIFIER_PREFIX`](super::DEFAULT_IDENTIFIER_PREFIX)
    pub fn identifier_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.template_settings.identifier_prefix = prefix.into();
        self
    }

    /// Sets the signing utility.
    ///
    /// Default: `codesign` found on `PATH`
    pub fn codesign<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.codesign = Some(path.as_ref().to_path_buf());
        self
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// [`Error::Configuration`] if the template is unset, a naming convention
    /// is unusable, or no signing utility can be found.
    pub fn build(self) -> Result<ExportSettings> {
        let template = self
            .template
            .ok_or_else(|| Error::Configuration("template skeleton path is required".into()))?;

        let placeholder = &self.template_settings.placeholder_executable;
        if placeholder.is_empty() || placeholder.contains(['/', '\\']) {
            return Err(Error::Configuration(format!(
                "invalid placeholder executable name {placeholder:?}"
            )));
        }

        let prefix = &self.template_settings.identifier_prefix;
        if prefix.is_empty()
            || !prefix
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
        {
            return Err(Error::Configuration(format!(
                "invalid bundle identifier prefix {prefix:?}"
            )));
        }

        let codesign = match self.codesign {
            Some(path) => path,
            None => crate::bundler::builder::CODESIGN.clone().ok_or_else(|| {
                Error::Configuration(
                    "codesign not found in PATH; pass an explicit signing utility".into(),
                )
            })?,
        };

        Ok(ExportSettings::new(template, self.template_settings, codesign))
    }
}
