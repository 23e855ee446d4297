//! Buildpack layers
//!
//! A layer is a directory under the lifecycle's layers directory plus a
//! sibling `<name>.toml` manifest. The manifest carries the layer's
//! launch/cache flags and a free-form `[metadata]` table that survives
//! between builds, which is how a build knows what the previous one did.
//! Launch environment variables are contributed through files under the
//! layer's `env.launch/` directory.

pub mod env;
pub mod launch;
pub mod manifest;
pub mod store;

pub use env::Environment;
pub use launch::{LaunchMetadata, Process};
pub use manifest::{LayerManifest, Metadata};
pub use store::{Layer, LayerKind, Layers};
