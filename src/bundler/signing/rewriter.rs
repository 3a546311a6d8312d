//! Two-phase strip-then-sign protocol.
//!
//! A deep signature on the bundle root embeds the signatures of the nested
//! executables, so every executable must carry its final signature before the
//! root is signed. The host loader rejects bundles signed outer-first.

use tokio_util::sync::CancellationToken;

use super::{SigningInvocation, SigningRunner, ToolOutput};
use crate::bundler::{
    error::{Error, Result},
    layout::BundleLayout,
};

/// Diagnostic `codesign` prints when asked to strip an unsigned object.
const NOT_SIGNED_MARKER: &str = "not signed";

/// Strips stale signatures and re-signs a bundle with the ad-hoc identity.
#[derive(Debug)]
pub struct SignatureRewriter<R> {
    runner: R,
}

impl<R: SigningRunner> SignatureRewriter<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Runs the strip phase, then the sign phase.
    ///
    /// Strip: every executable, then the root. Sign: every executable, then
    /// the root with `--deep`. Any failed invocation aborts immediately.
    pub async fn resign(&self, layout: &BundleLayout, cancel: &CancellationToken) -> Result<()> {
        let executables = layout.executables()?;
        if executables.is_empty() {
            return Err(Error::Signing {
                invocation: SigningInvocation::Sign(layout.executable_dir().to_path_buf()),
                code: None,
                stderr: "no executables to sign".into(),
            });
        }

        log::info!("Stripping existing signatures");
        for executable in &executables {
            self.strip(SigningInvocation::RemoveSignature(executable.clone()), cancel)
                .await?;
        }
        self.strip(
            SigningInvocation::RemoveSignature(layout.root().to_path_buf()),
            cancel,
        )
        .await?;

        log::info!("Signing {} executable(s) ad-hoc", executables.len());
        for executable in &executables {
            self.sign(SigningInvocation::Sign(executable.clone()), cancel)
                .await?;
        }
        self.sign(SigningInvocation::DeepSign(layout.root().to_path_buf()), cancel)
            .await?;

        log::info!("✓ Signed {}", layout.root().display());
        Ok(())
    }

    async fn strip(&self, invocation: SigningInvocation, cancel: &CancellationToken) -> Result<()> {
        let output = self.runner.run(&invocation, cancel).await?;
        if output.succeeded() {
            return Ok(());
        }
        if output.stderr.contains(NOT_SIGNED_MARKER) {
            log::debug!("{} was not signed", invocation.target().display());
            return Ok(());
        }
        Err(signing_error(invocation, output))
    }

    async fn sign(&self, invocation: SigningInvocation, cancel: &CancellationToken) -> Result<()> {
        let output = self.runner.run(&invocation, cancel).await?;
        if output.succeeded() {
            Ok(())
        } else {
            Err(signing_error(invocation, output))
        }
    }
}

fn signing_error(invocation: SigningInvocation, output: ToolOutput) -> Error {
    log::error!("{invocation} failed: {}", output.stderr);
    Error::Signing {
        invocation,
        code: output.code,
        stderr: output.stderr,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records invocations and answers from a script keyed by position.
    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<SigningInvocation>>,
        fail_at: Option<(usize, ToolOutput)>,
    }

    impl Recorder {
        fn calls(&self) -> Vec<SigningInvocation> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl SigningRunner for Recorder {
        async fn run(
            &self,
            invocation: &SigningInvocation,
            _cancel: &CancellationToken,
        ) -> Result<ToolOutput> {
            let mut calls = self.calls.lock().unwrap();
            let index = calls.len();
            calls.push(invocation.clone());
            match &self.fail_at {
                Some((at, output)) if *at == index => Ok(output.clone()),
                _ => Ok(ToolOutput::success()),
            }
        }
    }

    fn layout_with(executables: &[&str]) -> (tempfile::TempDir, BundleLayout) {
        let dir = tempfile::tempdir().unwrap();
        let layout = BundleLayout::new(dir.path().join("A.saver"));
        std::fs::create_dir_all(layout.executable_dir()).unwrap();
        for name in executables {
            std::fs::write(layout.executable_dir().join(name), b"").unwrap();
        }
        (dir, layout)
    }

    #[tokio::test]
    async fn signs_inside_out() {
        let (_dir, layout) = layout_with(&["Viewer_1", "Helper"]);
        let rewriter = SignatureRewriter::new(Recorder::default());

        rewriter.resign(&layout, &CancellationToken::new()).await.unwrap();

        let exe = |n: &str| layout.executable_dir().join(n);
        let root = layout.root().to_path_buf();
        assert_eq!(
            rewriter.runner().calls(),
            vec![
                SigningInvocation::RemoveSignature(exe("Helper")),
                SigningInvocation::RemoveSignature(exe("Viewer_1")),
                SigningInvocation::RemoveSignature(root.clone()),
                SigningInvocation::Sign(exe("Helper")),
                SigningInvocation::Sign(exe("Viewer_1")),
                SigningInvocation::DeepSign(root),
            ]
        );
    }

    #[tokio::test]
    async fn unsigned_objects_are_tolerated_during_strip() {
        let (_dir, layout) = layout_with(&["Viewer_1"]);
        let rewriter = SignatureRewriter::new(Recorder {
            fail_at: Some((1, ToolOutput::failure(1, "A.saver: code object is not signed at all"))),
            ..Default::default()
        });

        rewriter.resign(&layout, &CancellationToken::new()).await.unwrap();
        assert_eq!(rewriter.runner().calls().len(), 4);
    }

    #[tokio::test]
    async fn other_strip_failures_abort() {
        let (_dir, layout) = layout_with(&["Viewer_1"]);
        let rewriter = SignatureRewriter::new(Recorder {
            fail_at: Some((0, ToolOutput::failure(1, "permission denied"))),
            ..Default::default()
        });

        let err = rewriter.resign(&layout, &CancellationToken::new()).await.unwrap_err();
        assert!(matches!(err, Error::Signing { code: Some(1), .. }));
        assert_eq!(rewriter.runner().calls().len(), 1);
    }

    #[tokio::test]
    async fn inner_sign_failure_stops_before_outer_sign() {
        let (_dir, layout) = layout_with(&["Viewer_1"]);
        let rewriter = SignatureRewriter::new(Recorder {
            fail_at: Some((2, ToolOutput::failure(1, "resource fork not allowed"))),
            ..Default::default()
        });

        let err = rewriter.resign(&layout, &CancellationToken::new()).await.unwrap_err();

        assert!(matches!(err, Error::Signing { invocation: SigningInvocation::Sign(_), .. }));
        assert!(!rewriter
            .runner()
            .calls()
            .iter()
            .any(|c| matches!(c, SigningInvocation::DeepSign(_))));
    }

    #[tokio::test]
    async fn outer_sign_failure_is_fatal() {
        let (_dir, layout) = layout_with(&["Viewer_1"]);
        let rewriter = SignatureRewriter::new(Recorder {
            fail_at: Some((3, ToolOutput::failure(1, "bundle format unrecognized"))),
            ..Default::default()
        });

        let err = rewriter.resign(&layout, &CancellationToken::new()).await.unwrap_err();
        assert!(matches!(err, Error::Signing { invocation: SigningInvocation::DeepSign(_), .. }));
    }

    #[tokio::test]
    async fn empty_executable_directory_is_an_error() {
        let (_dir, layout) = layout_with(&[]);
        let rewriter = SignatureRewriter::new(Recorder::default());

        assert!(rewriter.resign(&layout, &CancellationToken::new()).await.is_err());
        assert!(rewriter.runner().calls().is_empty());
    }
}
