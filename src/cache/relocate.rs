//! npm cache relocation
//!
//! npm looks for its cache at a fixed location relative to the application.
//! Moving a checked-in `npm-cache` directory into the persistent cache layer
//! before npm runs lets later builds reuse it.

use crate::cache::NPM_CACHE_DIR;
use crate::error::BuildpackResult;
use crate::fs_util;
use std::path::Path;
use tracing::debug;

/// Move `<working_dir>/npm-cache` into `<cache_dir>/npm-cache`.
///
/// Entries are merged into whatever the cache layer already holds; same-named
/// entries are overwritten. A missing source directory is a no-op, and a
/// symlinked one is unlinked without touching what it points to.
pub fn relocate_cache(working_dir: &Path, cache_dir: &Path) -> BuildpackResult<()> {
    let src = working_dir.join(NPM_CACHE_DIR);
    let dst = cache_dir.join(NPM_CACHE_DIR);

    debug!("Relocating {} to {}", src.display(), dst.display());
    fs_util::move_tree(&src, &dst)
}
