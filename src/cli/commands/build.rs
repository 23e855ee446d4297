//! Build command - install node_modules into layers

use crate::build::{Build, BuildContext, SystemClock};
use crate::cache::Sha256Summer;
use crate::cli::BuildArgs;
use crate::config::{ConfigManager, Descriptor};
use crate::error::BuildpackResult;
use crate::layer::Layers;
use crate::npm::Npm;
use crate::plan::BuildpackPlan;
use crate::ui::BuildLog;
use tracing::debug;

/// Execute the build command
pub fn execute(args: BuildArgs) -> BuildpackResult<()> {
    let working_dir = super::app_dir(args.app_dir)?;

    let descriptor = match &args.buildpack_dir {
        Some(dir) => ConfigManager::new(dir).load()?,
        None => Descriptor::default(),
    };
    debug!(
        "Building {} in {} (platform {})",
        descriptor.buildpack.id,
        working_dir.display(),
        args.platform.display()
    );

    let layers = Layers::new(&args.layers);
    let context = BuildContext {
        working_dir,
        layers: layers.clone(),
        buildpack: descriptor.buildpack,
        plan: BuildpackPlan::from_file(&args.plan)?,
    };

    let npm = Npm::new();
    let summer = Sha256Summer::new();
    let log = BuildLog::stdout();
    let build = Build {
        executable: &npm,
        summer: &summer,
        clock: &SystemClock,
        log: &log,
    };

    let result = build.run(context)?;
    result.persist(&layers, &args.plan)
}
