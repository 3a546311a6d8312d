//! Collision-free naming for generated bundles.
//!
//! The host loads every installed screen saver into one process, so two bundles
//! built from the same template must never share an executable name, a
//! principal class or a bundle identifier.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Process-wide sequence, shared by every generator instance.
static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Names derived from one unique suffix.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct GeneratedIdentity {
    suffix: String,
    executable_name: String,
    principal_class_name: String,
    bundle_identifier: String,
}

impl GeneratedIdentity {
    /// Builds an identity around a known suffix.
    ///
    /// `placeholder` is the template's executable stem and `identifier_prefix`
    /// the reverse-DNS prefix of the bundle identifier.
    pub fn from_suffix(
        suffix: impl Into<String>,
        placeholder: &str,
        identifier_prefix: &str,
    ) -> Self {
        let suffix = suffix.into();
        let executable_name = format!("{placeholder}_{suffix}");
        Self {
            principal_class_name: executable_name.clone(),
            bundle_identifier: format!("{}.{suffix}", identifier_prefix.trim_end_matches('.')),
            executable_name,
            suffix,
        }
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn executable_name(&self) -> &str {
        &self.executable_name
    }

    pub fn principal_class_name(&self) -> &str {
        &self.principal_class_name
    }

    pub fn bundle_identifier(&self) -> &str {
        &self.bundle_identifier
    }
}

/// Produces a fresh [`GeneratedIdentity`] per export.
///
/// The suffix is `{unix seconds}{sequence:04x}{random:04x}`: the timestamp keeps
/// names readable and roughly ordered, the sequence separates exports issued
/// within the same second in this process, and the random part separates
/// independent processes.
#[derive(Clone, Debug)]
pub struct IdentityGenerator {
    placeholder: String,
    identifier_prefix: String,
}

impl IdentityGenerator {
    pub fn new(placeholder: impl Into<String>, identifier_prefix: impl Into<String>) -> Self {
        Self {
            placeholder: placeholder.into(),
            identifier_prefix: identifier_prefix.into(),
        }
    }

    /// Generates a new identity.
    pub fn generate(&self) -> GeneratedIdentity {
        let seconds = chrono::Utc::now().timestamp();
        let sequence = SEQUENCE.fetch_add(1, Ordering::Relaxed) & 0xffff;
        let random = uuid::Uuid::new_v4().as_u128() as u16;
        let suffix = format!("{seconds}{sequence:04x}{random:04x}");

        log::debug!("Generated identity suffix {suffix}");
        GeneratedIdentity::from_suffix(suffix, &self.placeholder, &self.identifier_prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn generator() -> IdentityGenerator {
        IdentityGenerator::new("ScreenSaverViewer", "com.example.Viewer")
    }

    #[test]
    fn derived_names_embed_suffix() {
        let identity = GeneratedIdentity::from_suffix("1700000000", "Viewer", "com.example.Viewer");
        assert_eq!(identity.executable_name(), "Viewer_1700000000");
        assert_eq!(identity.principal_class_name(), "Viewer_1700000000");
        assert_eq!(identity.bundle_identifier(), "com.example.Viewer.1700000000");
    }

    #[test]
    fn trailing_dot_in_prefix_is_not_doubled() {
        let identity = GeneratedIdentity::from_suffix("42", "Viewer", "com.example.");
        assert_eq!(identity.bundle_identifier(), "com.example.42");
    }

    #[test]
    fn suffix_is_alphanumeric() {
        let identity = generator().generate();
        assert!(identity.suffix().chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn sequential_identities_differ() {
        let generator = generator();
        let names: HashSet<_> = (0..1000).map(|_| generator.generate()).collect();
        assert_eq!(names.len(), 1000);
    }

    #[test]
    fn concurrent_identities_differ() {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                std::thread::spawn(|| {
                    let generator = generator();
                    (0..200).map(|_| generator.generate()).collect::<Vec<_>>()
                })
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for identity in handle.join().unwrap() {
                assert!(seen.insert(identity.executable_name().to_string()));
            }
        }
        assert_eq!(seen.len(), 1600);
    }
}
