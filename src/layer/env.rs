//! Layer environment variables
//!
//! Each variable becomes a file named `<NAME>.<action>` holding the value;
//! `prepend` also writes `<NAME>.delim` with the separator.

use crate::error::{BuildpackError, BuildpackResult};
use std::fs;
use std::path::Path;

/// How a variable is combined with any existing value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvAction {
    Override,
    Prepend,
}

impl EnvAction {
    fn suffix(self) -> &'static str {
        match self {
            Self::Override => "override",
            Self::Prepend => "prepend",
        }
    }
}

/// A single environment modification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvVar {
    pub name: String,
    pub action: EnvAction,
    pub value: String,
    pub delim: Option<String>,
}

/// Environment modifications contributed by one layer scope
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: Vec<EnvVar>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any existing value
    pub fn override_var(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.push(name.into(), EnvAction::Override, value.into(), None);
    }

    /// Add before any existing value, separated by `delim`
    pub fn prepend(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
        delim: impl Into<String>,
    ) {
        let delim = Some(delim.into());
        self.push(name.into(), EnvAction::Prepend, value.into(), delim);
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn vars(&self) -> &[EnvVar] {
        &self.vars
    }

    pub fn clear(&mut self) {
        self.vars.clear();
    }

    /// Value set for `name`, if any
    pub fn get(&self, name: &str) -> Option<&EnvVar> {
        self.vars.iter().find(|v| v.name == name)
    }

    fn push(&mut self, name: String, action: EnvAction, value: String, delim: Option<String>) {
        // Last write wins for a given variable.
        self.vars.retain(|v| v.name != name);
        self.vars.push(EnvVar {
            name,
            action,
            value,
            delim,
        });
    }

    /// Write the variables as files under `dir`; nothing is created when empty
    pub fn write(&self, dir: &Path) -> BuildpackResult<()> {
        if self.vars.is_empty() {
            return Ok(());
        }

        fs::create_dir_all(dir)
            .map_err(|e| BuildpackError::io(format!("creating directory {}", dir.display()), e))?;

        for var in &self.vars {
            let path = dir.join(format!("{}.{}", var.name, var.action.suffix()));
            fs::write(&path, &var.value)
                .map_err(|e| BuildpackError::io(format!("writing {}", path.display()), e))?;

            if let Some(delim) = &var.delim {
                let path = dir.join(format!("{}.delim", var.name));
                fs::write(&path, delim)
                    .map_err(|e| BuildpackError::io(format!("writing {}", path.display()), e))?;
            }
        }

        Ok(())
    }
}
