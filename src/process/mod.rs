//! npm build processes
//!
//! There are exactly three ways to install dependencies, chosen from the
//! state of the application directory:
//!
//! | Process   | Chosen when                          | npm command   |
//! |-----------|--------------------------------------|---------------|
//! | `Ci`      | `package-lock.json` exists           | `npm ci`      |
//! | `Rebuild` | no lockfile, `node_modules` exists   | `npm rebuild` |
//! | `Install` | neither                              | `npm install` |
//!
//! Each process knows whether it needs to run given the metadata of the
//! previous build ([`BuildProcess::should_run`]) and how to run
//! ([`BuildProcess::run`]).

mod modules;
pub mod resolver;

pub use modules::link_node_modules;
pub use resolver::{select, BuildProcessResolver, WorkingDirState};

use crate::cache::{fingerprint_lockfile, Summer, NPM_CACHE_DIR};
use crate::error::BuildpackResult;
use crate::layer::Metadata;
use crate::npm::{Executable, Execution, MANIFEST};
use crate::ui::BuildLog;
use std::fmt;
use std::path::Path;
use tracing::debug;

/// Metadata key holding the lockfile fingerprint of the last install
pub const METADATA_CACHE_SHA: &str = "cache_sha";

/// Metadata key holding the completion time of the last install
pub const METADATA_BUILT_AT: &str = "built_at";

/// Dependency installation strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildProcess {
    /// Fresh install, writes a new lockfile
    Install,
    /// Repair an existing `node_modules` in place
    Rebuild,
    /// Clean install strictly from the lockfile
    Ci,
}

/// Whether a process needs to run, and the fingerprint to record if it does
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunDecision {
    pub run: bool,
    pub sha: String,
}

/// Collaborators a process needs to execute
pub struct Tools<'a> {
    pub executable: &'a dyn Executable,
    pub summer: &'a dyn Summer,
    pub log: &'a BuildLog,
}

impl Tools<'_> {
    fn npm(&self, subcommand: &str, cache_dir: &Path, working_dir: &Path) -> BuildpackResult<()> {
        let npm_cache = cache_dir.join(NPM_CACHE_DIR).to_string_lossy().into_owned();
        let execution = Execution::new(
            [subcommand, "--unsafe-perm", "--cache", npm_cache.as_str()],
            working_dir,
        );

        self.log
            .subprocess(&format!("Running '{}'", execution.display("npm")));
        self.executable.execute(&execution, self.log)
    }
}

impl BuildProcess {
    /// The npm command this process corresponds to
    pub fn command(&self) -> &'static str {
        match self {
            Self::Install => "npm install",
            Self::Rebuild => "npm rebuild",
            Self::Ci => "npm ci",
        }
    }

    /// Decide whether to run given the metadata of the previous install.
    ///
    /// Only `Ci` can be skipped: it is skipped when the previous install
    /// recorded the same lockfile fingerprint as the current one.
    pub fn should_run(
        &self,
        summer: &dyn Summer,
        working_dir: &Path,
        metadata: &Metadata,
    ) -> BuildpackResult<RunDecision> {
        match self {
            Self::Install | Self::Rebuild => Ok(RunDecision {
                run: true,
                sha: String::new(),
            }),
            Self::Ci => {
                let sha = fingerprint_lockfile(summer, working_dir)?;
                let previous = metadata.get(METADATA_CACHE_SHA).and_then(|v| v.as_str());
                let run = metadata.is_empty() || previous != Some(sha.as_str());
                debug!(
                    "Lockfile fingerprint {} (previous {:?}), run = {}",
                    sha, previous, run
                );
                Ok(RunDecision { run, sha })
            }
        }
    }

    /// Install dependencies into `<modules_dir>/node_modules`
    pub fn run(
        &self,
        tools: &Tools<'_>,
        modules_dir: &Path,
        cache_dir: &Path,
        working_dir: &Path,
    ) -> BuildpackResult<()> {
        link_node_modules(modules_dir, working_dir)?;

        match self {
            Self::Install => tools.npm("install", cache_dir, working_dir),
            Self::Ci => tools.npm("ci", cache_dir, working_dir),
            Self::Rebuild => {
                let manifest = working_dir.join(MANIFEST);
                let before = tools.summer.sum(&[manifest.as_path()])?;

                tools.npm("rebuild", cache_dir, working_dir)?;

                let after = tools.summer.sum(&[manifest.as_path()])?;
                if before != after {
                    tools.log.subprocess(&format!(
                        "{} changed during rebuild, installing new dependencies",
                        MANIFEST
                    ));
                    tools.npm("install", cache_dir, working_dir)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for BuildProcess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.command())
    }
}
