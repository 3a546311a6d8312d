//! Template skeleton settings.

/// Executable shipped in the template's `Contents/MacOS`.
pub const DEFAULT_PLACEHOLDER_EXECUTABLE: &str = "ScreenSaverViewer";
/// Reverse-DNS prefix of generated bundle identifiers.
pub const DEFAULT_IDENTIFIER_PREFIX: &str = "com.GetInfo.MacSaverBuilder.Viewer";

/// Naming conventions of the template skeleton.
///
/// # Configuration
///
/// ```toml
/// [template]
/// placeholder_executable = "ScreenSaverViewer"
/// identifier_prefix = "com.example.viewer"
/// ```
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct TemplateSettings {
    /// File name of the executable inside the template.
    ///
    /// Generated executables are named `{placeholder_executable}_{suffix}`.
    ///
    /// Default: `ScreenSaverViewer`
    pub placeholder_executable: String,

    /// Prefix of the generated `CFBundleIdentifier`.
    ///
    /// Default: `com.GetInfo.MacSaverBuilder.Viewer`
    pub identifier_prefix: String,
}

impl Default for TemplateSettings {
    fn default() -> Self {
        Self {
            placeholder_executable: DEFAULT_PLACEHOLDER_EXECUTABLE.to_string(),
            identifier_prefix: DEFAULT_IDENTIFIER_PREFIX.to_string(),
        }
    }
}
