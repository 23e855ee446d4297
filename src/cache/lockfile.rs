//! Lockfile fingerprinting
//!
//! Generates content fingerprints used to decide whether a previous install
//! can be reused. Same lockfile = same fingerprint.

use crate::error::{BuildpackError, BuildpackResult};
use crate::fs_util;
use crate::npm::LOCKFILE;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// Computes a stable content hash over a set of files
pub trait Summer {
    /// Hex-encoded hash of the combined contents of `paths`, in order.
    /// Directories contribute every file beneath them in name order.
    fn sum(&self, paths: &[&Path]) -> BuildpackResult<String>;
}

/// SHA256 implementation of [`Summer`]
#[derive(Debug, Default, Clone, Copy)]
pub struct Sha256Summer;

impl Sha256Summer {
    pub fn new() -> Self {
        Self
    }
}

impl Summer for Sha256Summer {
    fn sum(&self, paths: &[&Path]) -> BuildpackResult<String> {
        let mut hasher = Sha256::new();

        for path in paths {
            for entry in WalkDir::new(path).sort_by_file_name() {
                let entry = entry.map_err(|e| {
                    let context = format!("reading {}", path.display());
                    match e.into_io_error() {
                        Some(source) => BuildpackError::io(context, source),
                        None => BuildpackError::io(
                            context,
                            std::io::Error::other("filesystem loop detected"),
                        ),
                    }
                })?;
                if entry.file_type().is_dir() {
                    continue;
                }

                let contents = fs::read(entry.path()).map_err(|e| {
                    BuildpackError::io(format!("reading {}", entry.path().display()), e)
                })?;
                hasher.update(&contents);
            }
        }

        Ok(hex::encode(hasher.finalize()))
    }
}

/// Fingerprint of `package-lock.json` in `working_dir`, or `""` without one
pub fn fingerprint_lockfile(summer: &dyn Summer, working_dir: &Path) -> BuildpackResult<String> {
    let lockfile = working_dir.join(LOCKFILE);
    if !fs_util::exists(&lockfile)? {
        debug!("No {} in {}", LOCKFILE, working_dir.display());
        return Ok(String::new());
    }

    let sha = summer.sum(&[lockfile.as_path()])?;
    debug!("Fingerprint of {}: {}", lockfile.display(), sha);
    Ok(sha)
}
