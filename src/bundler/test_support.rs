//! Fixtures shared by unit tests.

use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use plist::{Dictionary, Value};

use super::manifest::{DISPLAY_NAME_KEY, EXECUTABLE_KEY, IDENTIFIER_KEY, PRINCIPAL_CLASS_KEY};
use super::request::SourceAssets;

/// Writes a minimal template skeleton under `dir/Template.saver`.
pub fn write_template(dir: &Path, placeholder: &str) -> PathBuf {
    let root = dir.join("Template.saver");
    let contents = root.join("Contents");
    std::fs::create_dir_all(contents.join("MacOS")).unwrap();
    std::fs::write(contents.join("MacOS").join(placeholder), b"\xcf\xfa\xed\xfe").unwrap();

    let mut dict = Dictionary::new();
    dict.insert(EXECUTABLE_KEY.into(), Value::String(placeholder.into()));
    dict.insert(PRINCIPAL_CLASS_KEY.into(), Value::String(placeholder.into()));
    dict.insert(IDENTIFIER_KEY.into(), Value::String("com.example.Viewer".into()));
    dict.insert(DISPLAY_NAME_KEY.into(), Value::String(placeholder.into()));
    dict.insert("CFBundleVersion".into(), Value::String("1".into()));
    Value::Dictionary(dict)
        .to_file_xml(contents.join("Info.plist"))
        .unwrap();
    root
}

/// Writes a fake video and a real image with the given names.
pub fn sample_assets(dir: &Path, video: &str, image: &str) -> SourceAssets {
    let video = dir.join(video);
    let image = dir.join(image);
    std::fs::write(&video, b"\x00\x00\x00\x18ftypmp42").unwrap();
    RgbImage::from_pixel(4, 3, Rgb([10, 120, 200]))
        .save(&image)
        .unwrap();
    SourceAssets::new(video, image).unwrap()
}
