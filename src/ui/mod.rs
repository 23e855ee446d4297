//! Build log output
//!
//! The build log is what the lifecycle shows to the person running the
//! build. It is passed explicitly to every component that reports progress;
//! internal diagnostics go through `tracing` instead.

mod output;

pub use output::{BuildLog, Level};

#[cfg(test)]
pub(crate) use output::LogBuffer;
