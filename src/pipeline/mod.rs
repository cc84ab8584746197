//! Pipeline orchestration.
//!
//! Drives the stages in their fixed order inside two collapsible log
//! groups, then records the run's outputs. The envelope guarantees a
//! terminal report: every failure after argument validation still emits
//! the `::error::` marker and the full output set with
//! `build-status=failed`, and the process exits non-zero.
//!
//! ```no_run
//! use wails_winbuild::pipeline::{self, PipelineOptions};
//!
//! # async fn demo() {
//! let options = PipelineOptions {
//!     project_dir: "./app".into(),
//!     frontend_dir: "frontend".into(),
//!     summary_json: None,
//! };
//! let exit_code = pipeline::run(&options).await;
//! # let _ = exit_code;
//! # }
//! ```

pub mod context;
pub mod summary;

pub use context::{RunContext, ToolVersions};
pub use summary::{BuildStatus, RunSummary};

use std::path::PathBuf;
use std::time::Instant;

use chrono::Utc;

use crate::actions::OutputChannel;
use crate::artifacts::ArtifactSet;
use crate::error::Result;
use crate::{artifacts, build, deps, toolchain};

const SETUP_GROUP_TITLE: &str = "Setup Dependencies for Windows";
const BUILD_GROUP_TITLE: &str = "Building Wails Application for Windows with NSIS installer";

/// Validated inputs for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Root of the Wails project to build
    pub project_dir: PathBuf,
    /// Frontend directory, resolved against the project root when relative
    pub frontend_dir: PathBuf,
    /// Optional path for the JSON run summary
    pub summary_json: Option<PathBuf>,
}

/// Runs the pipeline, reporting through the environment-configured channel.
///
/// # Returns
///
/// The process exit code: 0 on success, 1 on any failure.
pub async fn run(options: &PipelineOptions) -> i32 {
    let channel = OutputChannel::from_env();
    run_with_channel(options, &channel).await
}

/// Runs the pipeline against an explicit output channel.
pub async fn run_with_channel(options: &PipelineOptions, channel: &OutputChannel) -> i32 {
    let entered = Instant::now();
    let entered_at = Utc::now();

    let mut ctx = match RunContext::new(&options.project_dir, &options.frontend_dir) {
        Ok(ctx) => ctx,
        Err(e) => {
            channel.set_failed(&format!("Action failed: {}", e));
            let summary = RunSummary::failed_early(entered_at, entered.elapsed(), &e);
            record_failure(channel, &summary);
            write_summary(options, &summary).await;
            return 1;
        }
    };

    match execute(&mut ctx, channel).await {
        Ok(artifacts) => {
            let summary = RunSummary::success(&ctx, &artifacts);
            match record_outputs(channel, &summary) {
                Ok(()) => {
                    log::info!("Build Time: {}", summary.build_time);
                    log::info!("Installer: {}", path_or_not_found(&summary.installer_path));
                    log::info!("Binary: {}", path_or_not_found(&summary.binary_path));
                    write_summary(options, &summary).await;
                    0
                }
                Err(e) => {
                    channel.set_failed(&format!("Action failed: {}", e));
                    let summary = RunSummary::failed(&ctx, &e);
                    record_failure(channel, &summary);
                    write_summary(options, &summary).await;
                    1
                }
            }
        }
        Err(e) => {
            channel.set_failed(&format!("Action failed: {}", e));
            let summary = RunSummary::failed(&ctx, &e);
            record_failure(channel, &summary);
            write_summary(options, &summary).await;
            1
        }
    }
}

/// The stage sequence proper. Any error propagates to the envelope with the
/// current log group left open, and no later stage runs.
async fn execute(ctx: &mut RunContext, channel: &OutputChannel) -> Result<ArtifactSet> {
    log::debug!("Project: {}", ctx.project_dir.display());

    channel.start_group(SETUP_GROUP_TITLE);
    toolchain::setup(ctx, channel).await?;
    build::install_wails_cli(ctx).await?;
    deps::install_dependencies(ctx).await?;
    channel.end_group();

    channel.start_group(BUILD_GROUP_TITLE);
    build::run_build(ctx).await?;
    let artifacts = artifacts::locate_artifacts(&ctx.artifact_dir).await?;
    channel.end_group();

    Ok(artifacts)
}

/// Records the full output set, in its fixed order.
fn record_outputs(channel: &OutputChannel, summary: &RunSummary) -> Result<()> {
    channel.set_output("go-version", &summary.go_version)?;
    channel.set_output("wails-version", &summary.wails_version)?;
    channel.set_output("build-status", summary.build_status.as_str())?;
    channel.set_output("installer-path", &summary.installer_path)?;
    channel.set_output("binary-path", &summary.binary_path)?;
    channel.set_output("build-time", &summary.build_time)?;
    Ok(())
}

/// Failure-path variant of [`record_outputs`]: problems are logged instead
/// of raised, and the status key alone is retried so `build-status=failed`
/// lands whenever anything can be written at all.
fn record_failure(channel: &OutputChannel, summary: &RunSummary) {
    if let Err(e) = record_outputs(channel, summary) {
        log::warn!("Could not record the failure outputs: {}", e);
        if let Err(e) = channel.set_output("build-status", summary.build_status.as_str()) {
            log::warn!("Could not record the failure status: {}", e);
        }
    }
}

/// Writes the JSON summary when a path was requested. A summary that cannot
/// be written must not change the run's outcome, so errors are logged only.
async fn write_summary(options: &PipelineOptions, summary: &RunSummary) {
    if let Some(path) = &options.summary_json {
        if let Err(e) = summary.write_json(path).await {
            log::warn!(
                "Could not write the run summary to {}: {}",
                path.display(),
                e
            );
        }
    }
}

fn path_or_not_found(path: &str) -> &str {
    if path.is_empty() { "Not found" } else { path }
}
