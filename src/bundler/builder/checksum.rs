//! Bundle checksum calculation.
//!
//! A `.saver` bundle is a directory, so the checksum covers the whole tree:
//! relative paths and contents, in sorted order.

use crate::bundler::{Result, error::ErrorExt};
use sha2::{Digest, Sha256};
use tokio::io::AsyncReadExt;

/// Calculates the SHA-256 of a directory tree.
///
/// # Algorithm
///
/// 1. Collect every regular file with walkdir (symlinks are not followed)
/// 2. Sort by path
/// 3. For each file: hash(relative_path + file_content)
///
/// # Returns
///
/// Hex-encoded SHA-256 hash (64 characters).
pub async fn calculate_directory_sha256(dir_path: &std::path::Path) -> Result<String> {
    let mut entries = Vec::new();
    for entry in walkdir::WalkDir::new(dir_path).follow_links(false) {
        let entry = entry?;
        if entry.file_type().is_file() {
            entries.push(entry.into_path());
        }
    }
    entries.sort();

    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; 8192];

    for path in entries {
        let rel_path = path.strip_prefix(dir_path)?;
        hasher.update(rel_path.to_string_lossy().as_bytes());

        let mut file = tokio::fs::File::open(&path)
            .await
            .fs_context("opening file for hashing", &path)?;

        loop {
            let n = file
                .read(&mut buffer)
                .await
                .fs_context("reading file for hash calculation", &path)?;
            if n == 0 {
                break;
            }
            hasher.update(&buffer[..n]);
        }
    }

    Ok(format!("{:x}", hasher.finalize()))
}
