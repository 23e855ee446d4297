//! npm collaborators
//!
//! The package manager itself is an external process. This module holds the
//! file names npm reads and writes, the `package.json` version parser used by
//! detection, and the [`Executable`] seam used to run npm.

mod executable;
mod package_json;

pub use executable::{Executable, Execution, Npm};
pub use package_json::{PackageJsonParser, VersionParser};

/// Dependency manifest
pub const MANIFEST: &str = "package.json";

/// Fully resolved dependency tree
pub const LOCKFILE: &str = "package-lock.json";

/// Installed dependencies directory
pub const NODE_MODULES: &str = "node_modules";
