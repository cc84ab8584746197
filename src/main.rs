//! Wails Windows Build - toolchain provisioning and NSIS packaging pipeline.
//!
//! This binary provisions the Windows build toolchain, installs project
//! dependencies, runs the Wails build with an NSIS installer and UPX
//! compression, and reports the results to the enclosing automation runner.

mod actions;
mod artifacts;
mod build;
mod cli;
mod deps;
mod error;
mod exec;
mod pipeline;
mod toolchain;

use std::process;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Run CLI and get exit code
    let exit_code = match cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };

    process::exit(exit_code);
}
