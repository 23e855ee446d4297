//! Pointing the application at the modules layer
//!
//! npm always installs into `<app>/node_modules`. Making that path a symlink
//! into the modules layer means whatever npm writes ends up in the layer and
//! is persisted with it.

use crate::error::{BuildpackError, BuildpackResult};
use crate::fs_util;
use crate::npm::NODE_MODULES;
use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;

/// Replace `<working_dir>/node_modules` with a link to
/// `<modules_dir>/node_modules`.
///
/// A real `node_modules` directory already in the application is moved into
/// the layer first so its contents are kept.
pub fn link_node_modules(modules_dir: &Path, working_dir: &Path) -> BuildpackResult<()> {
    let layer_modules = modules_dir.join(NODE_MODULES);
    let app_modules = working_dir.join(NODE_MODULES);

    match fs::symlink_metadata(&app_modules) {
        Ok(meta) if meta.is_dir() => {
            debug!(
                "Adopting {} into {}",
                app_modules.display(),
                layer_modules.display()
            );
            fs_util::move_tree(&app_modules, &layer_modules)?;
        }
        Ok(_) => fs_util::remove(&app_modules)?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(BuildpackError::io(format!("checking {}", app_modules.display()), e)),
    }

    fs::create_dir_all(&layer_modules).map_err(|e| {
        BuildpackError::io(format!("creating directory {}", layer_modules.display()), e)
    })?;
    fs_util::symlink_dir(&layer_modules, &app_modules)
}
