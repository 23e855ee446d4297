//! Layer manifest parsing
//!
//! Each layer has a `<name>.toml` manifest next to its directory describing
//! where the layer is available and the metadata persisted for it.

use crate::error::{BuildpackError, BuildpackResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Free-form metadata persisted with a layer
pub type Metadata = toml::Table;

/// Parsed layer manifest from `<name>.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerManifest {
    /// Available to the launched application
    pub launch: bool,

    /// Available to subsequent buildpacks during the build
    pub build: bool,

    /// Restored on the next build
    pub cache: bool,

    /// Metadata from the build that produced the layer
    #[serde(skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
}

impl LayerManifest {
    /// Read a manifest from disk, `None` if it does not exist
    pub fn from_file(path: &Path) -> BuildpackResult<Option<Self>> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(BuildpackError::io(
                    format!("reading layer manifest {}", path.display()),
                    e,
                ))
            }
        };

        Self::parse(&content)
            .map(Some)
            .map_err(|reason| BuildpackError::ConfigInvalid {
                path: path.to_path_buf(),
                reason,
            })
    }

    /// Parse a manifest from a TOML string
    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Write the manifest to disk
    pub fn write(&self, path: &Path) -> BuildpackResult<()> {
        let content = toml::to_string(self)?;
        fs::write(path, content).map_err(|e| {
            BuildpackError::io(format!("writing layer manifest {}", path.display()), e)
        })
    }
}
