//! CLI command implementations

pub mod build;
pub mod detect;

pub use build::execute as build;
pub use detect::execute as detect;

use crate::error::{BuildpackError, BuildpackResult};
use std::path::PathBuf;

/// Application directory from `--app-dir`, or the current directory
fn app_dir(arg: Option<PathBuf>) -> BuildpackResult<PathBuf> {
    match arg {
        Some(dir) => Ok(dir),
        None => std::env::current_dir()
            .map_err(|e| BuildpackError::io("getting current directory", e)),
    }
}
