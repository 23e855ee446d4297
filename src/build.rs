//! Build orchestration
//!
//! A build resolves the [`BuildProcess`], asks it whether it needs to run
//! against the metadata of the previous build, and then either runs it into
//! a fresh modules layer or links the previous layer back into place.

use crate::cache::Summer;
use crate::config::BuildpackInfo;
use crate::error::BuildpackResult;
use crate::fs_util;
use crate::layer::{LaunchMetadata, Layer, LayerKind, Layers, Metadata, Process};
use crate::npm::{Executable, NODE_MODULES};
use crate::plan::BuildpackPlan;
use crate::process::{
    BuildProcess, BuildProcessResolver, Tools, METADATA_BUILT_AT, METADATA_CACHE_SHA,
};
use crate::ui::{BuildLog, Level};
use chrono::{DateTime, SecondsFormat, Utc};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Layer holding installed dependencies, available at launch
pub const LAYER_NAME_NODE_MODULES: &str = "modules";

/// Layer holding npm's download cache, restored between builds
pub const LAYER_NAME_CACHE: &str = "npm-cache";

/// Source of the current time
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Inputs to a build
#[derive(Debug, Clone)]
pub struct BuildContext {
    /// Application source directory
    pub working_dir: PathBuf,
    /// The buildpack's layers directory
    pub layers: Layers,
    /// Identity of this buildpack, for the log title
    pub buildpack: BuildpackInfo,
    /// Entries resolved for this buildpack
    pub plan: BuildpackPlan,
}

/// Everything a build contributes
#[derive(Debug, Clone)]
pub struct BuildResult {
    pub plan: BuildpackPlan,
    pub layers: Vec<Layer>,
    pub launch: LaunchMetadata,
}

impl BuildResult {
    /// Write layers, `launch.toml` and the plan back to disk
    pub fn persist(&self, layers: &Layers, plan_path: &Path) -> BuildpackResult<()> {
        layers.persist(&self.layers, &self.launch)?;
        self.plan.write(plan_path)
    }
}

/// The build phase and its collaborators
pub struct Build<'a> {
    pub executable: &'a dyn Executable,
    pub summer: &'a dyn Summer,
    pub clock: &'a dyn Clock,
    pub log: &'a BuildLog,
}

impl Build<'_> {
    pub fn run(&self, context: BuildContext) -> BuildpackResult<BuildResult> {
        let log = self.log;
        log.title(&context.buildpack.title());

        let mut modules_layer = context
            .layers
            .get(LAYER_NAME_NODE_MODULES, &[LayerKind::Launch])?;
        let cache_layer = context.layers.get(LAYER_NAME_CACHE, &[LayerKind::Cache])?;

        log.process("Resolving installation process");
        let process =
            BuildProcessResolver::new(log).resolve(&context.working_dir, &cache_layer.path)?;

        let decision =
            process.should_run(self.summer, &context.working_dir, &modules_layer.metadata)?;
        info!("{} selected, run = {}", process, decision.run);

        if decision.run {
            self.execute(
                process,
                &mut modules_layer,
                &cache_layer,
                &context.working_dir,
                decision.sha,
            )?;
        } else {
            reuse(&modules_layer, &context.working_dir, log)?;
        }

        let mut layers = vec![modules_layer];
        if fs_util::exists(&cache_layer.path)? && !fs_util::is_empty_dir(&cache_layer.path)? {
            layers.push(cache_layer);
        } else {
            debug!("Cache layer {} is empty, not persisting", cache_layer.path.display());
        }

        Ok(BuildResult {
            plan: context.plan,
            layers,
            launch: LaunchMetadata {
                processes: vec![Process::new("web", "npm start")],
            },
        })
    }

    fn execute(
        &self,
        process: BuildProcess,
        modules_layer: &mut Layer,
        cache_layer: &Layer,
        working_dir: &Path,
        sha: String,
    ) -> BuildpackResult<()> {
        let log = self.log;
        log.process("Executing build process");

        let then = self.clock.now();
        modules_layer.reset()?;

        let tools = Tools {
            executable: self.executable,
            summer: self.summer,
            log,
        };
        process.run(&tools, &modules_layer.path, &cache_layer.path, working_dir)?;

        let now = self.clock.now();
        log.action(&format!("Completed in {}", format_elapsed(now - then)));
        log.break_line();

        let mut metadata = Metadata::new();
        metadata.insert(
            METADATA_BUILT_AT.to_string(),
            toml::Value::String(now.to_rfc3339_opts(SecondsFormat::Nanos, true)),
        );
        metadata.insert(METADATA_CACHE_SHA.to_string(), toml::Value::String(sha));
        modules_layer.metadata = metadata;

        let bin = modules_layer.path.join(NODE_MODULES).join(".bin");
        let bin = bin.to_string_lossy().into_owned();
        modules_layer
            .launch_env
            .override_var("NPM_CONFIG_LOGLEVEL", "error");
        modules_layer
            .launch_env
            .override_var("NPM_CONFIG_PRODUCTION", "true");
        modules_layer.launch_env.prepend("PATH", bin.as_str(), ":");

        log.process("Configuring environment");
        log.map(
            Level::Subprocess,
            &[
                ("NPM_CONFIG_LOGLEVEL", "error".to_string()),
                ("NPM_CONFIG_PRODUCTION", "true".to_string()),
                ("PATH", format!("{}:$PATH", bin)),
            ],
        );
        log.break_line();
        Ok(())
    }
}

/// Point the application at the modules installed by a previous build
fn reuse(modules_layer: &Layer, working_dir: &Path, log: &BuildLog) -> BuildpackResult<()> {
    log.process(&format!("Reusing cached layer {}", modules_layer.path.display()));
    log.break_line();

    let app_modules = working_dir.join(NODE_MODULES);
    fs_util::remove(&app_modules)?;
    fs_util::symlink_dir(&modules_layer.path.join(NODE_MODULES), &app_modules)
}

fn format_elapsed(elapsed: chrono::Duration) -> String {
    let millis = elapsed.num_milliseconds().max(0);
    if millis < 1000 {
        format!("{}ms", millis)
    } else {
        format!("{:.3}s", millis as f64 / 1000.0)
    }
}
