//! NPM Buildpack
//!
//! CLI entry point that dispatches to the detect and build phases.

use clap::Parser;
use console::style;
use npm_buildpack::cli::{commands, Cli, Commands};
use npm_buildpack::error::{BuildpackError, BuildpackResult};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(BuildpackError::DetectFailed(reason)) => {
            // Not an error for the lifecycle, just "does not apply".
            eprintln!("{}", reason);
            ExitCode::from(npm_buildpack::error::DETECT_FAIL_EXIT_CODE)
        }
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::from(e.exit_code())
        }
    }
}

fn run() -> BuildpackResult<()> {
    let cli = Cli::parse();

    // stdout carries the build log, diagnostics go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(cli.filter_directive()))
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Detect(args) => commands::detect(args),
        Commands::Build(args) => commands::build(args),
    }
}
