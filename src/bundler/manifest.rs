//! Bundle manifest (`Info.plist`) editing.

use std::path::{Path, PathBuf};

use plist::{Dictionary, Value};

use super::error::{Error, Result};
use super::identity::GeneratedIdentity;

/// Name of the executable the host loads.
pub const EXECUTABLE_KEY: &str = "CFBundleExecutable";
/// Class the host instantiates.
pub const PRINCIPAL_CLASS_KEY: &str = "NSPrincipalClass";
/// Bundle identity.
pub const IDENTIFIER_KEY: &str = "CFBundleIdentifier";
/// Name shown in the host's picker.
pub const DISPLAY_NAME_KEY: &str = "CFBundleName";

/// An `Info.plist` loaded into memory.
#[derive(Debug, Clone)]
pub struct Manifest {
    path: PathBuf,
    entries: Dictionary,
}

impl Manifest {
    /// Loads a manifest; binary and XML property lists are both accepted.
    pub fn load(path: &Path) -> Result<Self> {
        let manifest_error = |error| Error::Manifest {
            path: path.to_path_buf(),
            error,
        };

        let entries = Value::from_file(path)
            .map_err(manifest_error)?
            .into_dictionary()
            .ok_or_else(|| {
                Error::Configuration(format!(
                    "{} does not contain a dictionary",
                    path.display()
                ))
            })?;

        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    /// Points every identity-bearing key at `identity` and sets the display name.
    ///
    /// Keys not named here are left untouched.
    pub fn apply_identity(&mut self, identity: &GeneratedIdentity, display_name: &str) {
        self.set(EXECUTABLE_KEY, identity.executable_name());
        self.set(PRINCIPAL_CLASS_KEY, identity.principal_class_name());
        self.set(IDENTIFIER_KEY, identity.bundle_identifier());
        self.set(DISPLAY_NAME_KEY, display_name);
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.entries
            .insert(key.to_string(), Value::String(value.to_string()));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).and_then(Value::as_string)
    }

    pub fn executable(&self) -> Option<&str> {
        self.get(EXECUTABLE_KEY)
    }

    pub fn entries(&self) -> &Dictionary {
        &self.entries
    }

    /// Writes the manifest back to where it was loaded from, as XML.
    pub fn save(&self) -> Result<()> {
        Value::Dictionary(self.entries.clone())
            .to_file_xml(&self.path)
            .map_err(|error| Error::Manifest {
                path: self.path.clone(),
                error,
            })
    }
}
