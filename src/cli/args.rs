//! Command line argument parsing and validation.

use clap::Parser;
use std::path::PathBuf;

use crate::bundler::request::{IMAGE_EXTENSIONS, VIDEO_EXTENSIONS, has_extension};

/// Screen-saver bundle builder
#[derive(Parser, Debug)]
#[command(
    name = "saver-builder",
    version,
    about = "Builds a signed .saver screen saver from a video and a thumbnail",
    long_about = "Builds a macOS .saver screen-saver bundle that loops a video.

Copies the template skeleton, embeds the video and a PNG thumbnail, gives the
bundle a unique identity, and re-signs it ad-hoc.

Usage:
  saver-builder --video clip.mov --thumbnail pic.jpg --output ~/Desktop/Ocean.saver
  saver-builder -v clip.mp4 -t pic.png -o Waves.saver --name \"Calm Waves\" --json

Exit code 0 = bundle guaranteed to exist at the output path."
)]
pub struct Args {
    /// Video to embed (.mp4 or .mov)
    #[arg(short = 'v', long, value_name = "VIDEO")]
    pub video: PathBuf,

    /// Thumbnail image (.png, .jpg or .jpeg)
    #[arg(short = 't', long, value_name = "IMAGE")]
    pub thumbnail: PathBuf,

    /// Where to create the bundle
    ///
    /// Must not exist yet. Parent directories are created as needed.
    #[arg(short = 'o', long, value_name = "PATH")]
    pub output: PathBuf,

    /// Name shown in the screen-saver picker (default: output file name)
    #[arg(short = 'n', long, value_name = "NAME")]
    pub name: Option<String>,

    /// Template skeleton (.saver directory)
    #[arg(long, value_name = "PATH", env = "SAVER_TEMPLATE")]
    pub template: Option<PathBuf>,

    /// Signing utility (default: codesign on PATH)
    #[arg(long, value_name = "PATH", env = "SAVER_CODESIGN")]
    pub codesign: Option<PathBuf>,

    /// Config file (default: <config dir>/saver-builder/config.toml)
    #[arg(short = 'c', long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print the export report as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Suppress progress output
    #[arg(short = 'q', long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Show embedded asset paths and other details
    #[arg(long)]
    pub verbose: bool,

    /// Skip the check for other running instances
    #[arg(long)]
    pub allow_concurrent: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if !has_extension(&self.video, VIDEO_EXTENSIONS) {
            return Err(format!(
                "Invalid video: {}. Supported: {}",
                self.video.display(),
                VIDEO_EXTENSIONS.join(", ")
            ));
        }

        if !has_extension(&self.thumbnail, IMAGE_EXTENSIONS) {
            return Err(format!(
                "Invalid thumbnail: {}. Supported: {}",
                self.thumbnail.display(),
                IMAGE_EXTENSIONS.join(", ")
            ));
        }

        if self.output.file_name().is_none() {
            return Err(format!("Output path has no file name: {}", self.output.display()));
        }

        if self.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err("Name cannot be empty".to_string());
        }

        Ok(())
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Output manager for colored terminal output
    output: super::OutputManager,
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        // JSON owns stdout
        let output = super::OutputManager::new(args.verbose, args.quiet || args.json);
        Self { output }
    }
}

impl RuntimeConfig {
    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }

    pub fn success(&self, message: &str) {
        self.output.success(message)
    }

    pub fn warn(&self, message: &str) {
        self.output.warn(message)
    }

    pub fn progress(&self, message: &str) {
        self.output.progress(message)
    }

    pub fn section(&self, title: &str) {
        self.output.section(title)
    }

    pub fn indent(&self, message: &str) {
        self.output.indent(message)
    }
}
