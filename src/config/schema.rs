//! Buildpack descriptor schema
//!
//! The descriptor is the `buildpack.toml` shipped next to the binary.

use serde::{Deserialize, Serialize};

/// Root of `buildpack.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Descriptor {
    /// Buildpack API version
    pub api: String,

    /// Identity of the buildpack
    pub buildpack: BuildpackInfo,
}

/// `[buildpack]` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildpackInfo {
    pub id: String,
    pub name: String,
    pub version: String,
}

impl Default for BuildpackInfo {
    fn default() -> Self {
        Self {
            id: env!("CARGO_PKG_NAME").to_string(),
            name: "NPM Buildpack".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl BuildpackInfo {
    /// "Name Version" line used as the build log title
    pub fn title(&self) -> String {
        format!("{} {}", self.name, self.version)
    }
}
