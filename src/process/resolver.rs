//! Build process resolution
//!
//! Inspects the application directory and picks the [`BuildProcess`]. Any
//! `npm-cache` directory shipped with the application is moved into the
//! cache layer on the way, so it is in place before npm runs.

use crate::cache::{relocate_cache, NPM_CACHE_DIR};
use crate::error::BuildpackResult;
use crate::fs_util;
use crate::npm::{LOCKFILE, NODE_MODULES};
use crate::process::BuildProcess;
use crate::ui::{BuildLog, Level};
use std::path::Path;
use tracing::debug;

/// What the application directory contains, observed once per resolution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkingDirState {
    pub lockfile: bool,
    pub node_modules: bool,
    pub npm_cache: bool,
}

impl WorkingDirState {
    /// Stat the three inputs; any failure other than absence is an error
    pub fn observe(working_dir: &Path) -> BuildpackResult<Self> {
        Ok(Self {
            lockfile: fs_util::exists(&working_dir.join(LOCKFILE))?,
            node_modules: fs_util::exists(&working_dir.join(NODE_MODULES))?,
            npm_cache: fs_util::exists(&working_dir.join(NPM_CACHE_DIR))?,
        })
    }

    fn inputs(&self) -> [(&'static str, String); 3] {
        let found = |present: bool| {
            let status = if present { "Found" } else { "Not found" };
            status.to_string()
        };
        [
            (LOCKFILE, found(self.lockfile)),
            (NODE_MODULES, found(self.node_modules)),
            (NPM_CACHE_DIR, found(self.npm_cache)),
        ]
    }
}

/// Pick the process for an observed directory state.
///
/// A lockfile always wins; otherwise an existing `node_modules` is rebuilt;
/// otherwise a fresh install runs.
pub fn select(state: &WorkingDirState) -> BuildProcess {
    if state.lockfile {
        BuildProcess::Ci
    } else if state.node_modules {
        BuildProcess::Rebuild
    } else {
        BuildProcess::Install
    }
}

/// Observes the application directory and reports the chosen process
pub struct BuildProcessResolver<'a> {
    log: &'a BuildLog,
}

impl<'a> BuildProcessResolver<'a> {
    pub fn new(log: &'a BuildLog) -> Self {
        Self { log }
    }

    /// Resolve the process for `working_dir`, relocating its npm cache into
    /// `cache_dir`. No process is returned if any filesystem step fails.
    pub fn resolve(&self, working_dir: &Path, cache_dir: &Path) -> BuildpackResult<BuildProcess> {
        let state = WorkingDirState::observe(working_dir)?;
        debug!("Working directory state: {:?}", state);

        self.log.subprocess("Process inputs:");
        self.log.map(Level::Action, &state.inputs());
        self.log.break_line();

        if state.npm_cache {
            relocate_cache(working_dir, cache_dir)?;
        }

        let process = select(&state);
        self.log
            .subprocess(&format!("Selected NPM build process: '{}'", process));
        self.log.break_line();

        Ok(process)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::LogBuffer;
    use std::fs;
    use tempfile::TempDir;

    struct Dirs {
        _temp: TempDir,
        working: std::path::PathBuf,
        cache: std::path::PathBuf,
    }

    fn dirs() -> Dirs {
        let temp = TempDir::new().unwrap();
        let working = temp.path().join("working-dir");
        let cache = temp.path().join("cache");
        fs::create_dir_all(&working).unwrap();
        fs::create_dir_all(&cache).unwrap();
        Dirs {
            _temp: temp,
            working,
            cache,
        }
    }

    fn write_lockfile(d: &Dirs) {
        fs::write(d.working.join(LOCKFILE), "some-content").unwrap();
    }

    fn write_node_modules(d: &Dirs) {
        fs::create_dir_all(d.working.join(NODE_MODULES)).unwrap();
    }

    fn write_npm_cache(d: &Dirs) {
        fs::create_dir_all(d.working.join(NPM_CACHE_DIR)).unwrap();
        fs::write(
            d.working.join(NPM_CACHE_DIR).join("some-cache-file"),
            "some-content",
        )
        .unwrap();
    }

    fn assert_cache_relocated(d: &Dirs) {
        let contents =
            fs::read_to_string(d.cache.join(NPM_CACHE_DIR).join("some-cache-file")).unwrap();
        assert_eq!(contents, "some-content");
    }

    #[test]
    fn selection_follows_priority_for_all_states() {
        for lockfile in [false, true] {
            for node_modules in [false, true] {
                for npm_cache in [false, true] {
                    let state = WorkingDirState {
                        lockfile,
                        node_modules,
                        npm_cache,
                    };
                    let expected = if lockfile {
                        BuildProcess::Ci
                    } else if node_modules {
                        BuildProcess::Rebuild
                    } else {
                        BuildProcess::Install
                    };
                    assert_eq!(select(&state), expected, "state {:?}", state);
                }
            }
        }
    }

    #[test]
    fn empty_directory_is_install() {
        let d = dirs();
        let buffer = LogBuffer::default();

        let process = BuildProcessResolver::new(&buffer.log())
            .resolve(&d.working, &d.cache)
            .unwrap();

        assert_eq!(process, BuildProcess::Install);
        assert!(buffer
            .contents()
            .contains("Selected NPM build process: 'npm install'"));
        assert!(!d.cache.join(NPM_CACHE_DIR).exists());
    }

    #[test]
    fn cache_only_is_install_and_relocates() {
        let d = dirs();
        write_npm_cache(&d);

        let process = BuildProcessResolver::new(&BuildLog::sink())
            .resolve(&d.working, &d.cache)
            .unwrap();

        assert_eq!(process, BuildProcess::Install);
        assert_cache_relocated(&d);
    }

    #[test]
    fn node_modules_without_lockfile_is_rebuild() {
        let d = dirs();
        write_node_modules(&d);
        let buffer = LogBuffer::default();

        let process = BuildProcessResolver::new(&buffer.log())
            .resolve(&d.working, &d.cache)
            .unwrap();

        assert_eq!(process, BuildProcess::Rebuild);
        assert!(buffer
            .contents()
            .contains("Selected NPM build process: 'npm rebuild'"));
    }

    #[test]
    fn node_modules_and_cache_is_rebuild_and_relocates() {
        let d = dirs();
        write_node_modules(&d);
        write_npm_cache(&d);

        let process = BuildProcessResolver::new(&BuildLog::sink())
            .resolve(&d.working, &d.cache)
            .unwrap();

        assert_eq!(process, BuildProcess::Rebuild);
        assert_cache_relocated(&d);
    }

    #[test]
    fn lockfile_is_ci() {
        let d = dirs();
        write_lockfile(&d);
        let buffer = LogBuffer::default();

        let process = BuildProcessResolver::new(&buffer.log())
            .resolve(&d.working, &d.cache)
            .unwrap();

        assert_eq!(process, BuildProcess::Ci);
        assert!(buffer
            .contents()
            .contains("Selected NPM build process: 'npm ci'"));
    }

    #[test]
    fn lockfile_wins_over_node_modules() {
        let d = dirs();
        write_lockfile(&d);
        write_node_modules(&d);

        let process = BuildProcessResolver::new(&BuildLog::sink())
            .resolve(&d.working, &d.cache)
            .unwrap();

        assert_eq!(process, BuildProcess::Ci);
    }

    #[test]
    fn lockfile_and_cache_is_ci_and_relocates() {
        let d = dirs();
        write_lockfile(&d);
        write_npm_cache(&d);

        let process = BuildProcessResolver::new(&BuildLog::sink())
            .resolve(&d.working, &d.cache)
            .unwrap();

        assert_eq!(process, BuildProcess::Ci);
        assert_cache_relocated(&d);
    }

    #[test]
    fn all_inputs_present_is_ci() {
        let d = dirs();
        write_lockfile(&d);
        write_node_modules(&d);
        write_npm_cache(&d);

        let process = BuildProcessResolver::new(&BuildLog::sink())
            .resolve(&d.working, &d.cache)
            .unwrap();

        assert_eq!(process, BuildProcess::Ci);
        assert_cache_relocated(&d);
    }

    #[test]
    fn resolving_twice_is_harmless() {
        let d = dirs();
        write_lockfile(&d);
        write_npm_cache(&d);
        let resolver_log = BuildLog::sink();
        let resolver = BuildProcessResolver::new(&resolver_log);

        let first = resolver.resolve(&d.working, &d.cache).unwrap();
        let second = resolver.resolve(&d.working, &d.cache).unwrap();

        assert_eq!(first, BuildProcess::Ci);
        assert_eq!(second, BuildProcess::Ci);

        assert_cache_relocated(&d);
    }

    #[test]
    fn reports_found_inputs() {
        let d = dirs();
        write_lockfile(&d);
        write_node_modules(&d);
        fs::create_dir_all(d.working.join(NPM_CACHE_DIR)).unwrap();
        let buffer = LogBuffer::default();

        BuildProcessResolver::new(&buffer.log())
            .resolve(&d.working, &d.cache)
            .unwrap();

        let out = buffer.contents();
        assert!(out.contains("package-lock.json -> \"Found\""));
        assert!(out.contains("node_modules      -> \"Found\""));
        assert!(out.contains("npm-cache         -> \"Found\""));
    }

    #[test]
    fn reports_missing_inputs() {
        let d = dirs();
        let buffer = LogBuffer::default();

        BuildProcessResolver::new(&buffer.log())
            .resolve(&d.working, &d.cache)
            .unwrap();

        let out = buffer.contents();
        assert!(out.contains("package-lock.json -> \"Not found\""));
        assert!(out.contains("node_modules      -> \"Not found\""));
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_working_dir_fails() {
        use std::os::unix::fs::PermissionsExt;

        let d = dirs();
        fs::set_permissions(&d.working, fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users bypass permission bits; nothing to assert then.
        if fs::read_dir(&d.working).is_ok() {
            fs::set_permissions(&d.working, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let result = BuildProcessResolver::new(&BuildLog::sink()).resolve(&d.working, &d.cache);
        fs::set_permissions(&d.working, fs::Permissions::from_mode(0o755)).unwrap();

        let err = result.unwrap_err();
        assert!(err.is_permission_denied(), "unexpected error: {err}");
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_npm_cache_fails() {
        use std::os::unix::fs::PermissionsExt;

        let d = dirs();
        let item = d.working.join(NPM_CACHE_DIR).join("some-cache-dir");
        fs::create_dir_all(&item).unwrap();
        fs::set_permissions(&item, fs::Permissions::from_mode(0o000)).unwrap();

        if fs::read_dir(&item).is_ok() {
            fs::set_permissions(&item, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let result = BuildProcessResolver::new(&BuildLog::sink()).resolve(&d.working, &d.cache);
        fs::set_permissions(&item, fs::Permissions::from_mode(0o755)).unwrap();

        assert!(result.unwrap_err().is_permission_denied());
    }
}
