//! `package.json` parsing

use crate::error::{BuildpackError, BuildpackResult};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Extracts the node version requirement from a manifest
pub trait VersionParser {
    /// Version constraint declared by the manifest at `path`, or `""`.
    /// A missing file is reported as an IO error of kind `NotFound`.
    fn parse_version(&self, path: &Path) -> BuildpackResult<String>;
}

/// Reads `engines.node` from `package.json`
#[derive(Debug, Default, Clone, Copy)]
pub struct PackageJsonParser;

#[derive(Debug, Default, Deserialize)]
struct PackageJson {
    #[serde(default)]
    engines: BTreeMap<String, serde_json::Value>,
}

impl PackageJsonParser {
    pub fn new() -> Self {
        Self
    }
}

impl VersionParser for PackageJsonParser {
    fn parse_version(&self, path: &Path) -> BuildpackResult<String> {
        let content = fs::read_to_string(path)
            .map_err(|e| BuildpackError::io(format!("reading {}", path.display()), e))?;

        let manifest: PackageJson =
            serde_json::from_str(&content).map_err(|e| BuildpackError::PackageJson {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        match manifest.engines.get("node") {
            None | Some(serde_json::Value::Null) => Ok(String::new()),
            Some(serde_json::Value::String(version)) => Ok(version.trim().to_string()),
            Some(other) => Err(BuildpackError::PackageJson {
                path: path.to_path_buf(),
                reason: format!("engines.node must be a string, got {}", other),
            }),
        }
    }
}
