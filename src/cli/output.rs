//! Colored terminal output.
//!
//! All human-facing progress goes to stderr so stdout stays clean for `--json`.
//! Write failures are ignored: output is decorative.

use colored::Colorize;
use std::io::Write;

/// Prints progress, success and warning lines.
#[derive(Debug, Clone)]
pub struct OutputManager {
    verbose: bool,
    quiet: bool,
}

impl OutputManager {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose && !self.quiet
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    fn line(&self, text: String) {
        let _ = writeln!(std::io::stderr(), "{text}");
    }

    /// Shown only in verbose mode.
    pub fn verbose(&self, message: &str) {
        if self.is_verbose() {
            self.line(message.dimmed().to_string());
        }
    }

    pub fn progress(&self, message: &str) {
        if !self.quiet {
            self.line(format!("{} {}", "→".cyan(), message));
        }
    }

    pub fn success(&self, message: &str) {
        if !self.quiet {
            self.line(format!("{} {}", "✓".green().bold(), message));
        }
    }

    /// Warnings are shown even in quiet mode.
    pub fn warn(&self, message: &str) {
        self.line(format!("{} {}", "warning:".yellow().bold(), message));
    }

    pub fn error(&self, message: &str) {
        self.line(format!("{} {}", "error:".red().bold(), message));
    }

    pub fn section(&self, title: &str) {
        if !self.quiet {
            self.line(format!("\n{}", title.bold().underline()));
        }
    }

    pub fn indent(&self, message: &str) {
        if !self.quiet {
            self.line(format!("  {message}"));
        }
    }
}
