//! NPM Buildpack
//!
//! Detects npm applications and installs their dependencies into
//! Cloud Native Buildpack layers, reusing the previous install when
//! `package-lock.json` has not changed.

pub mod build;
pub mod cache;
pub mod cli;
pub mod config;
pub mod detect;
pub mod error;
pub mod fs_util;
pub mod layer;
pub mod npm;
pub mod plan;
pub mod process;
pub mod ui;

#[cfg(test)]
mod testing;

pub use error::{BuildpackError, BuildpackResult};
