//! Launch metadata (`launch.toml`)

use crate::error::{BuildpackError, BuildpackResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A process the launched image can run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    /// Process type, e.g. "web"
    #[serde(rename = "type")]
    pub kind: String,

    /// Shell command line
    pub command: String,
}

impl Process {
    pub fn new(kind: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            command: command.into(),
        }
    }
}

/// Contents of `launch.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchMetadata {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub processes: Vec<Process>,
}

impl LaunchMetadata {
    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    pub fn write(&self, path: &Path) -> BuildpackResult<()> {
        let content = toml::to_string(self)?;
        fs::write(path, content)
            .map_err(|e| BuildpackError::io(format!("writing {}", path.display()), e))
    }
}
