//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// NPM Buildpack - installs node_modules for a Node.js application
///
/// Implements the detect and build phases of a Cloud Native Buildpack.
#[derive(Parser, Debug)]
#[command(name = "npm-buildpack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Diagnostic log level, overrides -v
    #[arg(long, global = true, env = "BP_LOG_LEVEL", ignore_case = true)]
    pub log_level: Option<LogLevel>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Decide whether this buildpack applies to the application
    Detect(DetectArgs),

    /// Install the application's dependencies into layers
    Build(BuildArgs),
}

/// Arguments for the detect command
#[derive(Parser, Debug)]
pub struct DetectArgs {
    /// Application directory (defaults to current directory)
    #[arg(long)]
    pub app_dir: Option<PathBuf>,

    /// Platform directory
    pub platform: PathBuf,

    /// Path the build plan is written to
    pub plan: PathBuf,
}

/// Arguments for the build command
#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// Application directory (defaults to current directory)
    #[arg(long)]
    pub app_dir: Option<PathBuf>,

    /// Directory holding buildpack.toml
    #[arg(long, env = "CNB_BUILDPACK_DIR")]
    pub buildpack_dir: Option<PathBuf>,

    /// Layers directory for this buildpack
    pub layers: PathBuf,

    /// Platform directory
    pub platform: PathBuf,

    /// Buildpack plan, read and written back
    pub plan: PathBuf,
}

/// Diagnostic log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Info,
    Debug,
}

impl Cli {
    /// Tracing filter directive for the selected verbosity
    pub fn filter_directive(&self) -> &'static str {
        match (self.log_level, self.verbose) {
            (Some(LogLevel::Debug), _) | (None, 2..) => "npm_buildpack=debug",
            (Some(LogLevel::Info), _) | (None, 1) => "npm_buildpack=info",
            (None, 0) => "npm_buildpack=warn",
        }
    }
}
