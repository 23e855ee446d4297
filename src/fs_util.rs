//! Filesystem helpers shared by cache relocation, executors and the build
//!
//! Layers and the application directory may live on different mounts, so
//! every move falls back to copy-and-remove when `rename` reports `EXDEV`.

use crate::error::{BuildpackError, BuildpackResult};
use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// Whether `path` exists, surfacing stat failures instead of hiding them
pub fn exists(path: &Path) -> BuildpackResult<bool> {
    path.try_exists()
        .map_err(|e| BuildpackError::io(format!("checking {}", path.display()), e))
}

/// Whether `path` is a directory with no entries
pub fn is_empty_dir(path: &Path) -> BuildpackResult<bool> {
    let mut entries = fs::read_dir(path)
        .map_err(|e| BuildpackError::io(format!("reading directory {}", path.display()), e))?;
    Ok(entries.next().is_none())
}

/// Remove a file, symlink or directory tree; a missing path is not an error
pub fn remove(path: &Path) -> BuildpackResult<()> {
    let meta = match fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(BuildpackError::io(format!("checking {}", path.display()), e)),
    };

    let result = if meta.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    result.map_err(|e| BuildpackError::io(format!("removing {}", path.display()), e))
}

/// Create a symlink at `link` pointing to the directory `target`
pub fn symlink_dir(target: &Path, link: &Path) -> BuildpackResult<()> {
    debug!("Linking {} -> {}", link.display(), target.display());

    #[cfg(unix)]
    let result = std::os::unix::fs::symlink(target, link);
    #[cfg(windows)]
    let result = std::os::windows::fs::symlink_dir(target, link);

    result.map_err(|e| {
        BuildpackError::io(
            format!("linking {} to {}", link.display(), target.display()),
            e,
        )
    })
}

/// Move the contents of `src` into `dst`, merging with anything already there.
///
/// Same-named files in `dst` are overwritten. Every directory under `src` is
/// read, so an unreadable entry fails the move. `src` is removed afterwards.
/// A missing `src` is a no-op. A symlinked `src` is unlinked and its target
/// is left alone.
pub fn move_tree(src: &Path, dst: &Path) -> BuildpackResult<()> {
    let meta = match fs::symlink_metadata(src) {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(BuildpackError::io(format!("checking {}", src.display()), e)),
    };
    if meta.file_type().is_symlink() {
        debug!("{} is a symlink, not moving its target", src.display());
        return remove(src);
    }

    fs::create_dir_all(dst)
        .map_err(|e| BuildpackError::io(format!("creating directory {}", dst.display()), e))?;

    let walker = WalkDir::new(src)
        .follow_root_links(false)
        .min_depth(1)
        .sort_by_file_name();
    for entry in walker {
        let entry = entry.map_err(|e| walk_error(src, e))?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| BuildpackError::io("resolving relative path", io::Error::other(e)))?;
        let target = dst.join(relative);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            if fs::symlink_metadata(&target).is_ok_and(|m| !m.is_dir()) {
                remove(&target)?;
            }
            fs::create_dir_all(&target).map_err(|e| {
                BuildpackError::io(format!("creating directory {}", target.display()), e)
            })?;
        } else {
            if fs::symlink_metadata(&target).is_ok_and(|m| m.is_dir()) {
                remove(&target)?;
            }
            move_entry(entry.path(), &target, file_type.is_symlink())?;
        }
    }

    fs::remove_dir_all(src)
        .map_err(|e| BuildpackError::io(format!("removing {}", src.display()), e))
}

fn walk_error(root: &Path, err: walkdir::Error) -> BuildpackError {
    let context = match err.path() {
        Some(path) => format!("reading {}", path.display()),
        None => format!("reading {}", root.display()),
    };
    let source = err
        .into_io_error()
        .unwrap_or_else(|| io::Error::other("filesystem loop detected"));
    BuildpackError::io(context, source)
}

fn move_entry(from: &Path, to: &Path, is_symlink: bool) -> BuildpackResult<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.raw_os_error() == Some(libc::EXDEV) => {
            debug!("Cross-device move of {}", from.display());
            if is_symlink {
                copy_symlink(from, to)?;
            } else {
                fs::copy(from, to).map_err(|e| {
                    BuildpackError::io(
                        format!("copying {} into {}", from.display(), to.display()),
                        e,
                    )
                })?;
            }
            fs::remove_file(from)
                .map_err(|e| BuildpackError::io(format!("removing {}", from.display()), e))
        }
        Err(e) => Err(BuildpackError::io(
            format!("moving {} to {}", from.display(), to.display()),
            e,
        )),
    }
}

#[cfg(unix)]
fn copy_symlink(from: &Path, to: &Path) -> BuildpackResult<()> {
    let target = fs::read_link(from)
        .map_err(|e| BuildpackError::io(format!("reading link {}", from.display()), e))?;
    remove(to)?;
    std::os::unix::fs::symlink(&target, to)
        .map_err(|e| BuildpackError::io(format!("creating link {}", to.display()), e))
}

#[cfg(windows)]
fn copy_symlink(from: &Path, to: &Path) -> BuildpackResult<()> {
    fs::copy(from, to)
        .map(|_| ())
        .map_err(|e| BuildpackError::io(format!("copying {}", from.display()), e))
}
