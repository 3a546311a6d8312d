//! saver-builder - builds signed `.saver` screen-saver bundles from a video.
//!
//! Exit code 0 means the bundle exists at the requested path and is signed.

mod bundler;
mod cli;
mod config;
mod error;

use std::process;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Run CLI and get exit code
    let exit_code = match cli::run().await {
        Ok(code) => code,
        Err(e) => {
            let output = cli::OutputManager::new(false, false);
            output.error(&e.to_string());
            for suggestion in e.recovery_suggestions() {
                output.indent(&format!("hint: {suggestion}"));
            }
            e.exit_code()
        }
    };

    process::exit(exit_code);
}
