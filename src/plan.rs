//! Build plan types
//!
//! Detection writes a [`BuildPlan`] declaring what this buildpack provides
//! and requires. The build phase receives the resolved [`BuildpackPlan`] and
//! hands it back unchanged.

use crate::error::{BuildpackError, BuildpackResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Plan entry name for installed dependencies
pub const PLAN_NODE_MODULES: &str = "node_modules";

/// Plan entry name for the node runtime
pub const PLAN_NODE: &str = "node";

/// Plan produced by detection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildPlan {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub provides: Vec<Provision>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requires: Vec<Requirement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provision {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<PlanMetadata>,
}

/// Where and when a required dependency is needed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanMetadata {
    #[serde(
        rename = "version-source",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub version_source: Option<String>,

    #[serde(default)]
    pub build: bool,

    #[serde(default)]
    pub launch: bool,
}

impl BuildPlan {
    pub fn write(&self, path: &Path) -> BuildpackResult<()> {
        let content = toml::to_string(self)?;
        fs::write(path, content)
            .map_err(|e| BuildpackError::io(format!("writing build plan {}", path.display()), e))
    }
}

/// Entries resolved for this buildpack by the lifecycle
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildpackPlan {
    #[serde(default)]
    pub entries: Vec<PlanEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanEntry {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "toml::Table::is_empty")]
    pub metadata: toml::Table,
}

impl BuildpackPlan {
    /// Read the plan, empty if the file does not exist
    pub fn from_file(path: &Path) -> BuildpackResult<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(BuildpackError::io(
                    format!("reading buildpack plan {}", path.display()),
                    e,
                ))
            }
        };

        toml::from_str(&content).map_err(|e| BuildpackError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    pub fn write(&self, path: &Path) -> BuildpackResult<()> {
        let content = toml::to_string(self)?;
        fs::write(path, content).map_err(|e| {
            BuildpackError::io(format!("writing buildpack plan {}", path.display()), e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn build_plan_toml_shape() {
        let plan = BuildPlan {
            provides: vec![Provision {
                name: PLAN_NODE_MODULES.into(),
            }],
            requires: vec![Requirement {
                name: PLAN_NODE.into(),
                version: Some("1.2.3".into()),
                metadata: Some(PlanMetadata {
                    version_source: Some("package.json".into()),
                    build: true,
                    launch: true,
                }),
            }],
        };

        let content = toml::to_string(&plan).unwrap();
        assert!(content.contains("[[provides]]"));
        assert!(content.contains("[[requires]]"));
        assert!(content.contains("version = \"1.2.3\""));
        assert!(content.contains("version-source = \"package.json\""));

        let parsed: BuildPlan = toml::from_str(&content).unwrap();
        assert_eq!(parsed, plan);
    }

    #[test]
    fn buildpack_plan_missing_is_empty() {
        let temp = TempDir::new().unwrap();
        let plan = BuildpackPlan::from_file(&temp.path().join("plan.toml")).unwrap();
        assert!(plan.entries.is_empty());
    }

    #[test]
    fn buildpack_plan_preserves_entries() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("plan.toml");
        fs::write(
            &path,
            "[[entries]]\nname = \"node_modules\"\n\n[entries.metadata]\nlaunch = true\n",
        )
        .unwrap();

        let plan = BuildpackPlan::from_file(&path).unwrap();
        assert_eq!(plan.entries.len(), 1);
        assert_eq!(plan.entries[0].name, "node_modules");

        plan.write(&path).unwrap();
        assert_eq!(BuildpackPlan::from_file(&path).unwrap(), plan);
    }
}
