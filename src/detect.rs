//! Detection
//!
//! An application is an npm application when it has a `package.json`.
//! Detection declares that this buildpack provides `node_modules` and needs
//! node at build and launch time, pinned to `engines.node` when declared.

use crate::error::{BuildpackError, BuildpackResult};
use crate::npm::{VersionParser, MANIFEST};
use crate::plan::{BuildPlan, PlanMetadata, Provision, Requirement, PLAN_NODE, PLAN_NODE_MODULES};
use std::path::PathBuf;
use tracing::debug;

/// Inputs to detection
#[derive(Debug, Clone)]
pub struct DetectContext {
    /// Application source directory
    pub working_dir: PathBuf,
    /// Platform directory provided by the lifecycle
    pub platform_dir: PathBuf,
}

/// Outcome of a passing detection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectResult {
    pub plan: BuildPlan,
}

/// Decide whether this buildpack applies to the application.
///
/// A missing `package.json` fails detection with
/// [`BuildpackError::DetectFailed`]; any other parser error is returned as is.
pub fn detect(
    parser: &dyn VersionParser,
    context: &DetectContext,
) -> BuildpackResult<DetectResult> {
    let manifest = context.working_dir.join(MANIFEST);
    debug!(
        "Detecting {} (platform {})",
        manifest.display(),
        context.platform_dir.display()
    );

    let version = match parser.parse_version(&manifest) {
        Ok(version) => version,
        Err(e) if e.is_not_found() => {
            return Err(BuildpackError::DetectFailed(format!(
                "no {} in {}",
                MANIFEST,
                context.working_dir.display()
            )))
        }
        Err(e) => return Err(e),
    };

    let (version, version_source) = if version.is_empty() {
        (None, None)
    } else {
        (Some(version), Some(MANIFEST.to_string()))
    };

    Ok(DetectResult {
        plan: BuildPlan {
            provides: vec![Provision {
                name: PLAN_NODE_MODULES.to_string(),
            }],
            requires: vec![
                Requirement {
                    name: PLAN_NODE_MODULES.to_string(),
                    version: None,
                    metadata: None,
                },
                Requirement {
                    name: PLAN_NODE.to_string(),
                    version,
                    metadata: Some(PlanMetadata {
                        version_source,
                        build: true,
                        launch: true,
                    }),
                },
            ],
        },
    })
}
