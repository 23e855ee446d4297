//! Detect command - write the build plan for an npm application

use crate::cli::DetectArgs;
use crate::detect::{detect, DetectContext};
use crate::error::BuildpackResult;
use crate::npm::PackageJsonParser;
use tracing::info;

/// Execute the detect command
pub fn execute(args: DetectArgs) -> BuildpackResult<()> {
    let context = DetectContext {
        working_dir: super::app_dir(args.app_dir)?,
        platform_dir: args.platform,
    };

    let result = detect(&PackageJsonParser::new(), &context)?;
    result.plan.write(&args.plan)?;

    info!("Wrote build plan to {}", args.plan.display());
    Ok(())
}
