//! Command line interface for the Windows build pipeline.
//!
//! Thin wrapper over the pipeline: parse arguments, validate them, run,
//! and surface the pipeline's exit code to the caller.

mod args;

pub use args::Args;

use crate::error::{CliError, Result};
use crate::pipeline::{self, PipelineOptions};

/// Main CLI entry point
///
/// # Returns
///
/// The process exit code the caller should terminate with. Argument
/// errors surface as `Err` instead, before any output is recorded.
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    if let Err(reason) = args.validate() {
        return Err(CliError::InvalidArguments { reason }.into());
    }

    let options = PipelineOptions::from(&args);
    Ok(pipeline::run(&options).await)
}

/// Parse arguments without executing (for testing)
#[allow(dead_code)] // Public API - preserved for external consumers
pub fn parse_args() -> Args {
    Args::parse_args()
}

/// Validate arguments without executing (for testing)
#[allow(dead_code)] // Public API - preserved for external consumers
pub fn validate_args(args: &Args) -> std::result::Result<(), String> {
    args.validate()
}

/// Create pipeline options from arguments
#[allow(dead_code)] // Public API - preserved for external consumers
pub fn create_pipeline_options(args: &Args) -> PipelineOptions {
    PipelineOptions::from(args)
}
