//! Windows build toolchain detection and provisioning.
//!
//! Defines the external tools the pipeline depends on (Go, Node.js, pnpm,
//! chocolatey, NSIS, UPX, the Wails CLI) and the setup stage that probes
//! for them and installs the ones that are missing.

pub mod probe;
pub mod provision;

pub use probe::{ToolStatus, probe};
pub use provision::{InstallMethod, ProvisionMethod, ProvisionOutcome, ensure};

use crate::actions::OutputChannel;
use crate::error::Result;
use crate::exec::CommandSpec;
use crate::pipeline::RunContext;

/// Go toolchain release the runner is expected to carry (logged, never
/// enforced).
pub const EXPECTED_GO_VERSION: &str = "1.25.5";

/// An external tool the pipeline depends on.
#[derive(Debug, Clone, Copy)]
pub struct Tool {
    /// Display name used in logs
    pub name: &'static str,
    /// Executable resolved on the effective PATH
    pub program: &'static str,
    /// Arguments of the tool's version query
    pub version_args: &'static [&'static str],
}

impl Tool {
    /// The version-query invocation for this tool.
    pub fn version_query(&self) -> CommandSpec {
        CommandSpec::new(self.program, self.version_args.iter().copied())
    }
}

/// Go runtime
pub const GO: Tool = Tool {
    name: "Go",
    program: "go",
    version_args: &["version"],
};

/// Node.js runtime
pub const NODE: Tool = Tool {
    name: "Node.js",
    program: "node",
    version_args: &["--version"],
};

/// pnpm package manager
pub const PNPM: Tool = Tool {
    name: "pnpm",
    program: "pnpm",
    version_args: &["--version"],
};

/// Chocolatey package manager
pub const CHOCOLATEY: Tool = Tool {
    name: "Chocolatey",
    program: "choco",
    version_args: &["--version"],
};

/// NSIS installer compiler
pub const MAKENSIS: Tool = Tool {
    name: "NSIS",
    program: "makensis",
    version_args: &["--version"],
};

/// UPX executable compressor
pub const UPX: Tool = Tool {
    name: "UPX",
    program: "upx",
    version_args: &["--version"],
};

/// Wails CLI
pub const WAILS: Tool = Tool {
    name: "Wails",
    program: "wails",
    version_args: &["version"],
};

/// Prepares the Windows toolchain for the build.
///
/// Exports GOPATH to the runner, probes the runtimes whose versions are
/// reported (Go, Node.js), and ensures pnpm, chocolatey, NSIS, and UPX are
/// installed. Probe failures only cost version information; a tool that
/// cannot be installed aborts the pipeline.
pub async fn setup(ctx: &mut RunContext, channel: &OutputChannel) -> Result<()> {
    channel.export_variable("GOPATH", &ctx.gopath.display().to_string())?;

    log::info!(
        "Checking Go version (expected: go{})...",
        EXPECTED_GO_VERSION
    );
    let go = probe(&ctx.shell, &GO).await;
    ctx.versions.go = go.version;

    log::info!("Checking Node.js version...");
    probe(&ctx.shell, &NODE).await;

    log::info!("Checking pnpm installation...");
    note_outcome(&provision::ensure_pnpm(&ctx.shell).await?);

    log::info!("Checking Chocolatey installation...");
    note_outcome(&provision::ensure_chocolatey(ctx).await?);

    log::info!("Checking NSIS installation...");
    note_outcome(&provision::ensure_nsis(&ctx.shell).await?);

    log::info!("Checking UPX installation...");
    note_outcome(&provision::ensure_upx(&ctx.shell).await?);

    Ok(())
}

fn note_outcome(outcome: &ProvisionOutcome) {
    log::debug!("{} availability: {:?}", outcome.tool, outcome.method);
}
