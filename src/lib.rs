//! Windows build pipeline library for Wails applications
//!
//! This library provides the stages of the pipeline:
//! - Toolchain probing and provisioning (Go, Node.js, pnpm, chocolatey, NSIS, UPX)
//! - Wails CLI installation and dependency installs
//! - The packaging build with an NSIS installer and UPX compression
//! - Artifact discovery with checksums
//! - Result reporting through the GitHub Actions env-file protocol
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod actions;
pub mod artifacts;
pub mod build;
pub mod cli;
pub mod deps;
pub mod error;
pub mod exec;
pub mod pipeline;
pub mod toolchain;

// Re-export commonly used types
pub use error::{CliError, ExecError, PipelineError, Result};
