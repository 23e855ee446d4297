//! Error types for the npm buildpack
//!
//! All modules use `BuildpackResult<T>` as their return type.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Exit code the lifecycle interprets as "this buildpack does not apply"
pub const DETECT_FAIL_EXIT_CODE: u8 = 100;

/// Result type alias for buildpack operations
pub type BuildpackResult<T> = Result<T, BuildpackError>;

/// All errors that can occur while detecting or building
#[derive(Error, Debug)]
pub enum BuildpackError {
    // Detection
    #[error("Detection failed: {0}")]
    DetectFailed(String),

    #[error("Invalid package.json at {path}: {reason}")]
    PackageJson { path: PathBuf, reason: String },

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    // IO errors
    #[error("IO error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    // Process errors
    #[error("Command failed: {command}: {source}")]
    CommandFailed {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("{command} failed with exit code {code}")]
    CommandExit { command: String, code: i32 },

    // Serialization errors
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl BuildpackError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, source: io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Underlying IO error kind, if this error wraps one
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            Self::Io { source, .. } | Self::CommandFailed { source, .. } => Some(source.kind()),
            _ => None,
        }
    }

    /// Whether this error is a missing file or directory
    pub fn is_not_found(&self) -> bool {
        self.io_kind() == Some(io::ErrorKind::NotFound)
    }

    /// Whether this error is a permission failure
    pub fn is_permission_denied(&self) -> bool {
        self.io_kind() == Some(io::ErrorKind::PermissionDenied)
    }

    /// Process exit code reported to the lifecycle
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::DetectFailed(_) => DETECT_FAIL_EXIT_CODE,
            _ => 1,
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::CommandFailed { .. } => Some("Make sure npm is installed and on PATH"),
            Self::CommandExit { command, .. } if command.starts_with("npm ci") => {
                Some("package-lock.json may be out of sync with package.json; run: npm install")
            }
            Self::PackageJson { .. } => Some("Check package.json for syntax errors"),
            _ => None,
        }
    }
}
