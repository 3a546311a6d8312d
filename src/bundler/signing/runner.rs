//! Subprocess runner for the system `codesign` utility.

use std::path::{Path, PathBuf};

use tokio_util::sync::CancellationToken;

use super::{SigningInvocation, SigningRunner, ToolOutput};
use crate::bundler::error::{Error, ErrorExt, Result};

/// Runs invocations through a `codesign` binary.
#[derive(Clone, Debug)]
pub struct CodesignRunner {
    program: PathBuf,
}

impl CodesignRunner {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl SigningRunner for CodesignRunner {
    async fn run(
        &self,
        invocation: &SigningInvocation,
        cancel: &CancellationToken,
    ) -> Result<ToolOutput> {
        log::debug!("Running {invocation}");

        let child = tokio::process::Command::new(&self.program)
            .args(invocation.args())
            .stdin(std::process::Stdio::null())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .fs_context("spawning signing utility", &self.program)?;

        // Dropping the wait future drops the child, which kills it.
        let output = tokio::select! {
            output = child.wait_with_output() => output.fs_context("waiting for signing utility", invocation.target())?,
            () = cancel.cancelled() => {
                log::warn!("Cancelled while running {invocation}");
                return Err(Error::Cancelled);
            }
        };

        let output = ToolOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        };
        log::debug!("{invocation} exited with {:?}", output.code);
        Ok(output)
    }
}
