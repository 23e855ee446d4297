//! Configuration for the npm buildpack
//!
//! The only file-based configuration is the buildpack descriptor
//! (`buildpack.toml`) found in the buildpack directory. Everything else
//! comes from the lifecycle's command-line arguments.

pub mod schema;

pub use schema::{BuildpackInfo, Descriptor};

use crate::error::{BuildpackError, BuildpackResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Descriptor file name inside the buildpack directory
pub const DESCRIPTOR_FILE: &str = "buildpack.toml";

/// Loads the buildpack descriptor
pub struct ConfigManager {
    descriptor_path: PathBuf,
}

impl ConfigManager {
    /// Config manager for the descriptor in `buildpack_dir`
    pub fn new(buildpack_dir: &Path) -> Self {
        Self {
            descriptor_path: buildpack_dir.join(DESCRIPTOR_FILE),
        }
    }

    /// Load the descriptor, falling back to defaults when it does not exist
    pub fn load(&self) -> BuildpackResult<Descriptor> {
        if !self.descriptor_path.exists() {
            debug!(
                "Descriptor {} not found, using defaults",
                self.descriptor_path.display()
            );
            return Ok(Descriptor::default());
        }

        self.load_from_file(&self.descriptor_path)
    }

    /// Load the descriptor from a specific file
    pub fn load_from_file(&self, path: &Path) -> BuildpackResult<Descriptor> {
        let content = fs::read_to_string(path)
            .map_err(|e| BuildpackError::io(format!("reading {}", path.display()), e))?;

        toml::from_str(&content).map_err(|e| BuildpackError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Get the descriptor file path
    pub fn path(&self) -> &Path {
        &self.descriptor_path
    }
}
