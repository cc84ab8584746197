//! Tool provisioning with primary and fallback install methods.
//!
//! Package-manager bootstrap steps are unreliable in fresh environments, so
//! every tool acquisition that has a second sane install path declares it as
//! a fallback. A tool the probe already found is never re-installed.

use std::path::Path;

use crate::error::{ExecError, Result};
use crate::exec::{CommandSpec, Shell};
use crate::pipeline::RunContext;

use super::probe::probe;
use super::{CHOCOLATEY, MAKENSIS, PNPM, Tool, UPX};

/// Where chocolatey's shim executables land after a bootstrap install.
pub const CHOCOLATEY_BIN_DIR: &str = r"C:\ProgramData\chocolatey\bin";

/// Bootstrap script that installs chocolatey itself.
pub const CHOCOLATEY_INSTALL_URL: &str = "https://community.chocolatey.org/install.ps1";

/// How a tool ended up available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionMethod {
    /// The probe found the tool, nothing was installed
    AlreadyPresent,
    /// The primary install method succeeded
    Primary,
    /// The primary failed and the fallback succeeded
    Fallback,
}

/// Record of one provisioning decision, consumed for logging.
#[derive(Debug, Clone)]
pub struct ProvisionOutcome {
    /// Display name of the provisioned tool
    pub tool: String,
    /// Which path made it available
    pub method: ProvisionMethod,
}

/// A named installation strategy: commands run in order, all must succeed.
#[derive(Debug, Clone)]
pub struct InstallMethod {
    label: &'static str,
    steps: Vec<CommandSpec>,
}

impl InstallMethod {
    /// Creates an install method.
    ///
    /// # Arguments
    ///
    /// * `label` - Short name used in logs ("corepack", "chocolatey", ...)
    /// * `steps` - Commands run in order; the first failure fails the method
    pub fn new(label: &'static str, steps: Vec<CommandSpec>) -> Self {
        Self { label, steps }
    }
}

/// Ensures a tool is available, installing it if the probe misses.
///
/// Runs `primary` first; if it fails, logs a warning and runs `fallback`.
/// When both fail, the fallback's error propagates unchanged.
///
/// # Returns
///
/// The [`ProvisionOutcome`] describing which path made the tool available.
pub async fn ensure(
    shell: &Shell,
    tool: &Tool,
    primary: InstallMethod,
    fallback: Option<InstallMethod>,
) -> Result<ProvisionOutcome> {
    let status = probe(shell, tool).await;
    if status.detected {
        log::info!("{} already available, skipping install", tool.name);
        return Ok(ProvisionOutcome {
            tool: tool.name.to_string(),
            method: ProvisionMethod::AlreadyPresent,
        });
    }

    log::info!("Installing {} via {}...", tool.name, primary.label);
    match run_method(shell, &primary).await {
        Ok(()) => {
            log::info!("✓ {} installed via {}", tool.name, primary.label);
            Ok(ProvisionOutcome {
                tool: tool.name.to_string(),
                method: ProvisionMethod::Primary,
            })
        }
        Err(primary_err) => match fallback {
            Some(method) => {
                log::warn!(
                    "{} install via {} failed ({}), falling back to {}...",
                    tool.name,
                    primary.label,
                    primary_err,
                    method.label
                );
                run_method(shell, &method).await?;
                log::info!("✓ {} installed via {}", tool.name, method.label);
                Ok(ProvisionOutcome {
                    tool: tool.name.to_string(),
                    method: ProvisionMethod::Fallback,
                })
            }
            None => Err(primary_err.into()),
        },
    }
}

async fn run_method(shell: &Shell, method: &InstallMethod) -> std::result::Result<(), ExecError> {
    for step in &method.steps {
        shell.must_run(step).await?;
    }
    Ok(())
}

/// Ensures pnpm: enable through corepack (verified with a version query),
/// falling back to a global npm install.
pub async fn ensure_pnpm(shell: &Shell) -> Result<ProvisionOutcome> {
    ensure(
        shell,
        &PNPM,
        InstallMethod::new(
            "corepack",
            vec![
                CommandSpec::new("corepack", ["enable", "pnpm"]),
                PNPM.version_query(),
            ],
        ),
        Some(InstallMethod::new(
            "npm",
            vec![CommandSpec::new("npm", ["install", "-g", "pnpm@latest"])],
        )),
    )
    .await
}

/// Ensures NSIS through chocolatey. No fallback: a failing chocolatey
/// install is fatal.
pub async fn ensure_nsis(shell: &Shell) -> Result<ProvisionOutcome> {
    ensure(
        shell,
        &MAKENSIS,
        InstallMethod::new(
            "chocolatey",
            vec![CommandSpec::new("choco", ["install", "nsis", "-y"])],
        ),
        None,
    )
    .await
}

/// Ensures UPX through chocolatey. No fallback.
pub async fn ensure_upx(shell: &Shell) -> Result<ProvisionOutcome> {
    ensure(
        shell,
        &UPX,
        InstallMethod::new(
            "chocolatey",
            vec![CommandSpec::new("choco", ["install", "upx", "-y"])],
        ),
        None,
    )
    .await
}

/// Ensures chocolatey itself, bootstrapping it from the official install
/// script when missing. No fallback: without a package manager the NSIS and
/// UPX installs cannot proceed.
///
/// On a successful bootstrap the chocolatey shim directory is prepended to
/// the context's PATH so the freshly installed `choco` resolves in later
/// stages of this same run.
pub async fn ensure_chocolatey(ctx: &mut RunContext) -> Result<ProvisionOutcome> {
    let status = probe(&ctx.shell, &CHOCOLATEY).await;
    if status.detected {
        log::info!("{} already available, skipping install", CHOCOLATEY.name);
        return Ok(ProvisionOutcome {
            tool: CHOCOLATEY.name.to_string(),
            method: ProvisionMethod::AlreadyPresent,
        });
    }

    log::info!("Chocolatey not found, bootstrapping...");
    bootstrap_chocolatey(&ctx.shell).await?;
    ctx.shell.prepend_path(Path::new(CHOCOLATEY_BIN_DIR));

    log::info!("✓ Chocolatey installed via bootstrap script");
    Ok(ProvisionOutcome {
        tool: CHOCOLATEY.name.to_string(),
        method: ProvisionMethod::Primary,
    })
}

/// Downloads the chocolatey install script to a unique temp file and runs
/// it through PowerShell. The temp file is removed best-effort afterwards.
async fn bootstrap_chocolatey(shell: &Shell) -> Result<()> {
    log::info!("Downloading {}", CHOCOLATEY_INSTALL_URL);
    let script = download_text(CHOCOLATEY_INSTALL_URL).await?;

    let script_path = std::env::temp_dir().join(format!(
        "chocolatey-install-{}.ps1",
        uuid::Uuid::new_v4()
    ));
    tokio::fs::write(&script_path, &script).await?;

    let script_arg = script_path
        .to_str()
        .ok_or_else(|| {
            anyhow::anyhow!(
                "Bootstrap script path is not valid UTF-8: {}",
                script_path.display()
            )
        })?
        .to_string();

    let result = shell
        .must_run(&CommandSpec::new(
            "powershell",
            [
                "-NoProfile",
                "-ExecutionPolicy",
                "Bypass",
                "-File",
                script_arg.as_str(),
            ],
        ))
        .await;

    if let Err(e) = tokio::fs::remove_file(&script_path).await {
        log::warn!(
            "Failed to remove bootstrap script {}: {}",
            script_path.display(),
            e
        );
    }

    result?;
    Ok(())
}

async fn download_text(url: &str) -> Result<String> {
    let response = reqwest::get(url).await?.error_for_status()?;
    Ok(response.text().await?)
}
