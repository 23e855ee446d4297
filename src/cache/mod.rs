//! Dependency caching across builds
//!
//! Two pieces of state decide whether a build can reuse the previous
//! install:
//!
//! - A SHA256 fingerprint of `package-lock.json`, stored in the modules
//!   layer metadata. Same lockfile = same install.
//! - npm's own download cache, relocated from the application directory
//!   into the persistent cache layer before npm runs.

pub mod lockfile;
pub mod relocate;

pub use lockfile::{fingerprint_lockfile, Sha256Summer, Summer};
pub use relocate::relocate_cache;

/// npm's download cache directory name, in the app dir and the cache layer
pub const NPM_CACHE_DIR: &str = "npm-cache";
