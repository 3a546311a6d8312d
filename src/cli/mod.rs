//! Command line interface for the screen-saver builder.
//!
//! Parses arguments, merges them with the config file, runs one export and
//! reports the result.

mod args;
mod output;

pub use args::{Args, RuntimeConfig};
pub use output::OutputManager;

use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Context as _;
use path_absolutize::Absolutize;
use tokio_util::sync::CancellationToken;

use crate::bundler::{
    ExportReport, ExportRequest, Exporter, SettingsBuilder, SourceAssets,
    instance::{SysinfoRegistry, ensure_single_instance},
};
use crate::config::{self, ConfigFile};
use crate::error::{BuilderError, CliError, Result};

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    args.validate()
        .map_err(|reason| CliError::InvalidArguments { reason })?;

    let runtime = RuntimeConfig::from(&args);

    if !args.allow_concurrent {
        ensure_single_instance(&SysinfoRegistry, &process_name(), std::process::id())?;
    }

    let config = config::load_config(args.config.as_deref())?;
    let exporter = Exporter::new(build_settings(&args, config)?);

    let destination = args
        .output
        .absolutize()
        .map_err(BuilderError::Io)?
        .into_owned();
    let assets = SourceAssets::new(&args.video, &args.thumbnail)?;
    let request = ExportRequest::new(destination, args.name.as_deref(), assets)?;

    runtime.progress(&format!(
        "Building \"{}\" from {}",
        request.display_name(),
        exporter.settings().template().display()
    ));

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("Interrupted, cancelling export");
            on_interrupt.cancel();
        }
    });

    let report = exporter.export_with_cancel(&request, &cancel).await?;

    if args.json {
        print_json(&report)?;
    } else {
        print_report(&runtime, &report);
    }

    for warning in &report.warnings {
        runtime.warn(&format!(
            "could not set mode {:o} on {}: {}",
            warning.mode,
            warning.path.display(),
            warning.message
        ));
    }

    Ok(0)
}

/// Merges CLI flags over config file values, then template discovery.
fn build_settings(args: &Args, config: ConfigFile) -> Result<crate::bundler::ExportSettings> {
    let template: Option<PathBuf> = args
        .template
        .clone()
        .or(config.template_path)
        .or_else(config::discover_template);

    let mut builder = SettingsBuilder::new().template_settings(config.template);
    if let Some(template) = template {
        builder = builder.template(template);
    }
    if let Some(codesign) = args.codesign.clone().or(config.codesign) {
        builder = builder.codesign(codesign);
    }

    Ok(builder.build()?)
}

/// Name this process is listed under in the process table.
fn process_name() -> OsString {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.file_name().map(ToOwned::to_owned))
        .unwrap_or_else(|| OsString::from("saver-builder"))
}

fn print_json(report: &ExportReport) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, report)?;
    writeln!(stdout).context("Failed to write report to stdout")?;
    Ok(())
}

fn print_report(runtime: &RuntimeConfig, report: &ExportReport) {
    runtime.success(&format!("Created {}", report.bundle.display()));
    runtime.section("Bundle");
    runtime.indent(&format!("Name:        {}", report.display_name));
    runtime.indent(&format!("Identifier:  {}", report.identity.bundle_identifier()));
    runtime.indent(&format!("Executable:  {}", report.identity.executable_name()));
    runtime.indent(&format!("SHA-256:     {}", report.checksum));
    let output = runtime.output();
    output.verbose(&format!("Binary:      {}", report.contents.executable.display()));
    output.verbose(&format!("Video:       {}", report.contents.video.display()));
    output.verbose(&format!("Thumbnail:   {}", report.contents.thumbnail.display()));
}
