//! Thumbnail re-encoding.
//!
//! The host only shows PNG thumbnails, so every source image is decoded and
//! written back out as PNG before it is embedded.

use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat, ImageReader};
use tempfile::NamedTempFile;

use super::error::{Error, ErrorExt, Result};

/// A PNG thumbnail living in a uniquely named temp file.
///
/// The file is deleted when this value is dropped.
#[derive(Debug)]
pub struct NormalizedThumbnail {
    file: NamedTempFile,
    width: u32,
    height: u32,
}

impl NormalizedThumbnail {
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Decodes `source` and re-encodes it as PNG inside `scratch_dir`.
///
/// Fails with [`Error::Format`] if the source cannot be decoded.
pub fn normalize(source: &Path, scratch_dir: &Path) -> Result<NormalizedThumbnail> {
    let image = decode(source)?;
    let (width, height) = (image.width(), image.height());

    // PNG has no float channels
    let image = match image {
        DynamicImage::ImageRgb32F(_) | DynamicImage::ImageRgba32F(_) => {
            DynamicImage::ImageRgba16(image.to_rgba16())
        }
        other => other,
    };

    let mut file = tempfile::Builder::new()
        .prefix("thumbnail-")
        .suffix(".png")
        .tempfile_in(scratch_dir)
        .fs_context("creating thumbnail temp file in", scratch_dir)?;

    image
        .write_to(file.as_file_mut(), ImageFormat::Png)
        .map_err(|e| Error::Format {
            path: source.to_path_buf(),
            reason: format!("PNG encoding failed: {e}"),
        })?;

    log::debug!(
        "Normalized {} ({width}x{height}) to {}",
        source.display(),
        file.path().display()
    );

    Ok(NormalizedThumbnail {
        file,
        width,
        height,
    })
}

/// Decodes an image, guessing the format from its content.
pub fn decode(source: &Path) -> Result<DynamicImage> {
    let format_error = |reason: String| Error::Format {
        path: PathBuf::from(source),
        reason,
    };

    ImageReader::open(source)
        .fs_context("opening thumbnail", source)?
        .with_guessed_format()
        .fs_context("reading thumbnail", source)?
        .decode()
        .map_err(|e| format_error(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    #[test]
    fn jpeg_becomes_png() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("pic.jpg");
        RgbImage::from_pixel(16, 9, Rgb([200, 10, 10]))
            .save(&source)
            .unwrap();

        let thumbnail = normalize(&source, dir.path()).unwrap();

        assert_eq!(thumbnail.dimensions(), (16, 9));
        let bytes = std::fs::read(thumbnail.path()).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Png);
    }

    #[test]
    fn renormalizing_is_pixel_identical() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("pic.png");
        RgbaImage::from_fn(8, 8, |x, y| Rgba([x as u8 * 30, y as u8 * 30, 7, 128]))
            .save(&source)
            .unwrap();

        let first = normalize(&source, dir.path()).unwrap();
        let second = normalize(first.path(), dir.path()).unwrap();

        let a = decode(first.path()).unwrap();
        let b = decode(second.path()).unwrap();
        assert_eq!(a.color(), b.color());
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn each_call_gets_its_own_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("pic.png");
        RgbImage::new(2, 2).save(&source).unwrap();

        let a = normalize(&source, dir.path()).unwrap();
        let b = normalize(&source, dir.path()).unwrap();
        assert_ne!(a.path(), b.path());
    }

    #[test]
    fn temp_file_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("pic.png");
        RgbImage::new(2, 2).save(&source).unwrap();

        let thumbnail = normalize(&source, dir.path()).unwrap();
        let path = thumbnail.path().to_path_buf();
        drop(thumbnail);
        assert!(!path.exists());
    }

    #[test]
    fn undecodable_source_is_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("broken.png");
        std::fs::write(&source, b"definitely not an image").unwrap();

        let err = normalize(&source, dir.path()).unwrap_err();
        assert!(matches!(err, Error::Format { .. }));
    }
}
