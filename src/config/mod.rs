//! Builder configuration from an optional TOML file.
//!
//! ```toml
//! template_path = "/opt/saver-builder/ScreenSaverViewer.saver"
//! codesign = "/usr/bin/codesign"
//!
//! [template]
//! placeholder_executable = "ScreenSaverViewer"
//! identifier_prefix = "com.example.viewer"
//! ```
//!
//! Every key is optional. Command-line flags override the file.

use crate::bundler::TemplateSettings;
use crate::error::{BuilderError, CliError, Result};
use std::path::{Path, PathBuf};

/// File name of the template skeleton shipped with the builder.
pub const TEMPLATE_BUNDLE_NAME: &str = "ScreenSaverViewer.saver";

/// Contents of the configuration file.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// Template skeleton location.
    pub template_path: Option<PathBuf>,

    /// Signing utility location.
    pub codesign: Option<PathBuf>,

    /// Template naming conventions.
    pub template: TemplateSettings,
}

/// Default config location: `<config dir>/saver-builder/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("saver-builder").join("config.toml"))
}

/// Loads the configuration.
///
/// An explicitly given path must exist. The default path is optional; when it
/// is absent the built-in defaults apply.
pub fn load_config(explicit: Option<&Path>) -> Result<ConfigFile> {
    let (path, required) = match explicit {
        Some(path) => (path.to_path_buf(), true),
        None => match default_config_path() {
            Some(path) => (path, false),
            None => return Ok(ConfigFile::default()),
        },
    };

    if !path.exists() {
        if required {
            return Err(BuilderError::Cli(CliError::InvalidArguments {
                reason: format!("Config file does not exist: {}", path.display()),
            }));
        }
        log::debug!("No config file at {}, using defaults", path.display());
        return Ok(ConfigFile::default());
    }

    let text = std::fs::read_to_string(&path).map_err(|e| {
        BuilderError::Cli(CliError::ExecutionFailed {
            command: "read_config".to_string(),
            reason: format!("Failed to read {}: {}", path.display(), e),
        })
    })?;

    let config: ConfigFile = toml::from_str(&text)?;
    log::info!("Loaded config from {}", path.display());
    Ok(config)
}

/// Looks for the template skeleton in conventional locations:
///
/// - next to the builder executable
/// - in `../Resources` relative to it (inside an app bundle)
/// - in the current directory
pub fn discover_template() -> Option<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        candidates.push(exe_dir.join(TEMPLATE_BUNDLE_NAME));
        candidates.push(exe_dir.join("../Resources").join(TEMPLATE_BUNDLE_NAME));
    }
    candidates.push(PathBuf::from(TEMPLATE_BUNDLE_NAME));

    let found = candidates.into_iter().find(|c| c.is_dir());
    match &found {
        Some(path) => log::info!("Found template skeleton: {}", path.display()),
        None => log::debug!("No template skeleton in conventional locations"),
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_file() {
        let config: ConfigFile = toml::from_str(
            r#"
            template_path = "/t/Viewer.saver"
            codesign = "/usr/bin/codesign"

            [template]
            placeholder_executable = "Viewer"
            identifier_prefix = "com.example.viewer"
            "#,
        )
        .unwrap();

        assert_eq!(config.template_path.as_deref(), Some(Path::new("/t/Viewer.saver")));
        assert_eq!(config.template.placeholder_executable, "Viewer");
        assert_eq!(config.template.identifier_prefix, "com.example.viewer");
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config: ConfigFile = toml::from_str("[template]\nplaceholder_executable = \"V\"\n").unwrap();
        assert_eq!(config.template_path, None);
        assert_eq!(config.template.placeholder_executable, "V");
        assert_eq!(
            config.template.identifier_prefix,
            crate::bundler::settings::DEFAULT_IDENTIFIER_PREFIX
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<ConfigFile>("tempalte_path = \"/t\"").is_err());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn explicit_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "codesign = \"/bin/true\"\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.codesign.as_deref(), Some(Path::new("/bin/true")));
    }
}
