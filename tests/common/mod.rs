//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use image::{Rgba, RgbaImage};
use plist::{Dictionary, Value};
use saver_builder::bundler::{
    Error, Exporter, Result, SettingsBuilder, SigningInvocation, SigningRunner, SourceAssets,
    ToolOutput,
};
use tokio_util::sync::CancellationToken;

pub const PLACEHOLDER: &str = "ScreenSaverViewer";

/// Writes a template skeleton with one placeholder executable.
pub fn write_template(dir: &Path) -> PathBuf {
    let root = dir.join("ScreenSaverViewer.saver");
    let macos = root.join("Contents/MacOS");
    std::fs::create_dir_all(&macos).unwrap();
    std::fs::create_dir_all(root.join("Contents/Resources")).unwrap();
    std::fs::write(macos.join(PLACEHOLDER), b"\xcf\xfa\xed\xfe\x07\x00\x00\x01").unwrap();

    let mut dict = Dictionary::new();
    dict.insert("CFBundleExecutable".into(), Value::String(PLACEHOLDER.into()));
    dict.insert("NSPrincipalClass".into(), Value::String(PLACEHOLDER.into()));
    dict.insert(
        "CFBundleIdentifier".into(),
        Value::String("com.example.ScreenSaverViewer".into()),
    );
    dict.insert("CFBundleName".into(), Value::String(PLACEHOLDER.into()));
    dict.insert("CFBundleShortVersionString".into(), Value::String("1.0".into()));
    Value::Dictionary(dict)
        .to_file_xml(root.join("Contents/Info.plist"))
        .unwrap();
    root
}

/// A fake `.mov` and a real `.jpg`.
pub fn write_assets(dir: &Path) -> SourceAssets {
    let video = dir.join("clip.mov");
    let image = dir.join("picture.jpg");
    std::fs::write(&video, b"\x00\x00\x00\x14ftypqt  ").unwrap();
    image::DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 6, Rgba([200, 40, 40, 255])))
        .to_rgb8()
        .save(&image)
        .unwrap();
    SourceAssets::new(video, image).unwrap()
}

/// What the fake signer does when it sees a matching invocation.
#[derive(Clone, Copy, Debug)]
pub enum Fault {
    None,
    /// Exit 1 with a generic diagnostic on the deep sign of the root.
    FailDeepSign,
    /// Cancel the token on the first sign and wait for cancellation.
    CancelOnSign,
    /// Add a file without read permission to the bundle during the deep sign.
    UnreadableFileOnDeepSign,
}

/// Signing runner that records invocations instead of running codesign.
pub struct Recorder {
    calls: Mutex<Vec<SigningInvocation>>,
    fault: Fault,
}

impl Recorder {
    pub fn new(fault: Fault) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fault,
        }
    }

    pub fn calls(&self) -> Vec<SigningInvocation> {
        self.calls.lock().unwrap().clone()
    }
}

impl SigningRunner for Recorder {
    async fn run(
        &self,
        invocation: &SigningInvocation,
        cancel: &CancellationToken,
    ) -> Result<ToolOutput> {
        self.calls.lock().unwrap().push(invocation.clone());
        match (self.fault, invocation) {
            (Fault::FailDeepSign, SigningInvocation::DeepSign(_)) => {
                Ok(ToolOutput::failure(1, "resource fork, Finder information, or similar detritus not allowed"))
            }
            (Fault::UnreadableFileOnDeepSign, SigningInvocation::DeepSign(root)) => {
                lock_file(&root.join("Contents/Resources/locked.bin"));
                Ok(ToolOutput::success())
            }
            (Fault::CancelOnSign, SigningInvocation::Sign(_)) => {
                cancel.cancel();
                cancel.cancelled().await;
                Err(Error::Cancelled)
            }
            (_, SigningInvocation::RemoveSignature(_)) => {
                Ok(ToolOutput::failure(1, "code object is not signed at all"))
            }
            _ => Ok(ToolOutput::success()),
        }
    }
}

#[cfg(unix)]
fn lock_file(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    std::fs::write(path, b"sealed").unwrap();
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o000)).unwrap();
}

#[cfg(not(unix))]
fn lock_file(path: &Path) {
    std::fs::write(path, b"sealed").unwrap();
}

pub fn exporter(template: &Path, fault: Fault) -> Exporter<Recorder> {
    let settings = SettingsBuilder::new()
        .template(template)
        .codesign("/usr/bin/codesign")
        .build()
        .unwrap();
    Exporter::with_runner(settings, Recorder::new(fault))
}

/// Entries of `dir` other than the ones named in `keep`.
pub fn leftovers(dir: &Path, keep: &[&str]) -> Vec<String> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| !keep.contains(&name.as_str()))
        .collect()
}
