//! Project dependency installation.

use crate::error::Result;
use crate::exec::CommandSpec;
use crate::pipeline::RunContext;

/// Manifest whose presence marks a frontend sub-project.
pub const FRONTEND_MANIFEST: &str = "package.json";

/// Installs project dependencies with pnpm.
///
/// The root install always runs and is fatal on failure. The frontend
/// install runs only when the frontend directory carries a manifest; a
/// missing manifest is the expected single-project layout and skips with an
/// info log, not a warning.
pub async fn install_dependencies(ctx: &RunContext) -> Result<()> {
    log::info!("Installing dependencies with pnpm...");
    ctx.shell
        .must_run(&CommandSpec::new("pnpm", ["install"]))
        .await?;

    let manifest = ctx.frontend_dir.join(FRONTEND_MANIFEST);
    if tokio::fs::try_exists(&manifest).await.unwrap_or(false) {
        log::info!(
            "Installing frontend dependencies in {}...",
            ctx.frontend_dir.display()
        );
        ctx.shell
            .must_run(&CommandSpec::new("pnpm", ["install"]).cwd(&ctx.frontend_dir))
            .await?;
    } else {
        log::info!(
            "No {} in {}, skipping frontend install",
            FRONTEND_MANIFEST,
            ctx.frontend_dir.display()
        );
    }

    Ok(())
}
