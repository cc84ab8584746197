//! Wails CLI installation and build invocation.
//!
//! The build is the single point where the pipeline can fail because of the
//! core task itself rather than environment setup, so its error is logged
//! at error severity and propagated unchanged.

use std::time::{Duration, Instant};

use crate::error::Result;
use crate::exec::CommandSpec;
use crate::pipeline::RunContext;
use crate::toolchain::{WAILS, probe};

/// Module path installed to obtain the Wails CLI.
pub const WAILS_INSTALL_PACKAGE: &str = "github.com/wailsapp/wails/v2/cmd/wails@latest";

/// Fixed build flag set: NSIS installer generation, clean build, stripped
/// debug symbols, UPX compression at maximum level.
pub const BUILD_ARGS: &[&str] = &[
    "build",
    "-nsis",
    "-clean",
    "-ldflags",
    "-s -w",
    "-upx",
    "-upxflags",
    "--best --lzma",
];

/// Outcome of the single build invocation.
#[derive(Debug, Clone, Copy)]
pub struct BuildResult {
    /// Exit code of the build process
    pub exit_code: i32,
    /// Wall-clock duration of the invocation
    pub duration: Duration,
}

impl BuildResult {
    /// Whether the build exited cleanly.
    #[allow(dead_code)] // Public API - preserved for external consumers
    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }
}

/// Installs the Wails CLI and records its version in the context.
///
/// The `go install` itself is mandatory and fatal on failure. The follow-up
/// version probe is best-effort; when it fails the reported version falls
/// back to "latest", matching what was just requested.
pub async fn install_wails_cli(ctx: &mut RunContext) -> Result<()> {
    log::info!("Installing Wails CLI (latest)...");
    ctx.shell
        .must_run(&CommandSpec::new("go", ["install", WAILS_INSTALL_PACKAGE]))
        .await?;

    let status = probe(&ctx.shell, &WAILS).await;
    ctx.versions.wails = Some(status.version.unwrap_or_else(|| "latest".to_string()));
    Ok(())
}

/// Runs the packaging build once with the fixed flag set.
///
/// # Returns
///
/// * `Ok(BuildResult)` - Build exited cleanly
/// * `Err` - Non-zero exit or spawn failure, after an error-severity log
pub async fn run_build(ctx: &RunContext) -> Result<BuildResult> {
    let spec = CommandSpec::new("wails", BUILD_ARGS.iter().copied());
    log::info!("Running: {}", spec.rendered());

    let started = Instant::now();

    match ctx.shell.must_run(&spec).await {
        Ok(()) => {
            let result = BuildResult {
                exit_code: 0,
                duration: started.elapsed(),
            };
            log::info!("Build completed successfully!");
            log::debug!(
                "wails build exited with code {} after {:.2}s",
                result.exit_code,
                result.duration.as_secs_f64()
            );
            Ok(result)
        }
        Err(e) => {
            log::error!("Build failed: {}", e);
            Err(e.into())
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;

    fn write_stub(dir: &Path, name: &str, body: &str) {
        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).expect("write stub");
        let mut perms = std::fs::metadata(&path).expect("stub metadata").permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).expect("chmod stub");
    }

    fn stubbed_context(project: &Path, stubs: &Path) -> RunContext {
        let mut ctx = RunContext::new(project, Path::new("frontend")).expect("context");
        ctx.shell.prepend_path(stubs);
        ctx
    }

    #[tokio::test]
    async fn clean_exit_yields_build_result() {
        let project = tempfile::tempdir().expect("project dir");
        let stubs = tempfile::tempdir().expect("stub dir");
        write_stub(stubs.path(), "wails", "exit 0");

        let ctx = stubbed_context(project.path(), stubs.path());
        let result = run_build(&ctx).await.expect("build succeeds");
        assert!(result.succeeded());
        assert_eq!(result.exit_code, 0);
    }

    #[tokio::test]
    async fn non_zero_exit_is_fatal_with_command_text() {
        let project = tempfile::tempdir().expect("project dir");
        let stubs = tempfile::tempdir().expect("stub dir");
        write_stub(stubs.path(), "wails", "exit 7");

        let ctx = stubbed_context(project.path(), stubs.path());
        let err = run_build(&ctx).await.expect_err("build fails");
        assert_eq!(
            err.to_string(),
            format!(
                "command `wails {}` failed with exit code 7",
                BUILD_ARGS.join(" ")
            )
        );
    }

    #[tokio::test]
    async fn cli_install_records_probed_version() {
        let project = tempfile::tempdir().expect("project dir");
        let stubs = tempfile::tempdir().expect("stub dir");
        write_stub(stubs.path(), "go", "exit 0");
        write_stub(stubs.path(), "wails", "echo v2.9.2");

        let mut ctx = stubbed_context(project.path(), stubs.path());
        install_wails_cli(&mut ctx).await.expect("install succeeds");
        assert_eq!(ctx.versions.wails.as_deref(), Some("v2.9.2"));
    }

    #[tokio::test]
    async fn cli_version_defaults_to_latest_when_probe_fails() {
        let project = tempfile::tempdir().expect("project dir");
        let stubs = tempfile::tempdir().expect("stub dir");
        write_stub(stubs.path(), "go", "exit 0");
        write_stub(stubs.path(), "wails", "exit 1");

        let mut ctx = stubbed_context(project.path(), stubs.path());
        install_wails_cli(&mut ctx).await.expect("install succeeds");
        assert_eq!(ctx.versions.wails.as_deref(), Some("latest"));
    }

    #[tokio::test]
    async fn failing_cli_install_is_fatal() {
        let project = tempfile::tempdir().expect("project dir");
        let stubs = tempfile::tempdir().expect("stub dir");
        write_stub(stubs.path(), "go", "exit 3");

        let mut ctx = stubbed_context(project.path(), stubs.path());
        let err = install_wails_cli(&mut ctx)
            .await
            .expect_err("install fails");
        assert_eq!(
            err.to_string(),
            format!(
                "command `go install {}` failed with exit code 3",
                WAILS_INSTALL_PACKAGE
            )
        );
    }
}
