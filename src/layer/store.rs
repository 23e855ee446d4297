//! Layer lookup and persistence
//!
//! Layers are retrieved by name at the start of a build, mutated by the
//! build, and written back at the end. Only layers that are part of the
//! build result keep a manifest; anything else is dropped by the lifecycle.

use crate::error::{BuildpackError, BuildpackResult};
use crate::fs_util;
use crate::layer::env::Environment;
use crate::layer::launch::LaunchMetadata;
use crate::layer::manifest::{LayerManifest, Metadata};
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// Manifest files in the layers directory that do not describe a layer
const RESERVED_MANIFESTS: &[&str] = &["launch.toml", "build.toml", "store.toml"];

/// Where a layer is made available
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    Launch,
    Cache,
}

/// A single layer: directory, flags, metadata and environment
#[derive(Debug, Clone)]
pub struct Layer {
    pub name: String,
    pub path: PathBuf,
    pub launch: bool,
    pub cache: bool,
    pub metadata: Metadata,
    /// Environment for the launched application, written to `env.launch/`
    pub launch_env: Environment,
}

impl Layer {
    fn manifest_path(&self) -> PathBuf {
        let mut file = self.path.clone().into_os_string();
        file.push(".toml");
        PathBuf::from(file)
    }

    /// Clear the layer directory, metadata and environment
    pub fn reset(&mut self) -> BuildpackResult<()> {
        debug!("Resetting layer {}", self.path.display());

        fs_util::remove(&self.path)?;
        fs::create_dir_all(&self.path).map_err(|e| {
            BuildpackError::io(format!("creating layer {}", self.path.display()), e)
        })?;

        self.metadata.clear();
        self.launch_env.clear();
        Ok(())
    }

    /// Persist the manifest and environment files
    pub fn write(&self) -> BuildpackResult<()> {
        let manifest = LayerManifest {
            launch: self.launch,
            build: false,
            cache: self.cache,
            metadata: self.metadata.clone(),
        };
        manifest.write(&self.manifest_path())?;

        self.launch_env.write(&self.path.join("env.launch"))
    }
}

/// The buildpack's layers directory
#[derive(Debug, Clone)]
pub struct Layers {
    pub path: PathBuf,
}

impl Layers {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Look up a layer by name, loading metadata left by a previous build.
    ///
    /// The directory is not created here; see [`Layer::reset`].
    pub fn get(&self, name: &str, kinds: &[LayerKind]) -> BuildpackResult<Layer> {
        let path = self.path.join(name);
        let mut layer = Layer {
            name: name.to_string(),
            path,
            launch: kinds.contains(&LayerKind::Launch),
            cache: kinds.contains(&LayerKind::Cache),
            metadata: Metadata::new(),
            launch_env: Environment::new(),
        };

        if let Some(manifest) = LayerManifest::from_file(&layer.manifest_path())? {
            debug!("Loaded metadata for layer {}", name);
            layer.metadata = manifest.metadata;
        }

        Ok(layer)
    }

    /// Write every layer in `layers` plus `launch.toml`, and remove manifests
    /// of layers that were left out so they are not persisted.
    pub fn persist(&self, layers: &[Layer], launch: &LaunchMetadata) -> BuildpackResult<()> {
        fs::create_dir_all(&self.path).map_err(|e| {
            BuildpackError::io(format!("creating directory {}", self.path.display()), e)
        })?;

        for layer in layers {
            layer.write()?;
        }

        let keep: HashSet<String> = layers.iter().map(|l| format!("{}.toml", l.name)).collect();
        self.prune_manifests(&keep)?;

        if !launch.is_empty() {
            launch.write(&self.path.join("launch.toml"))?;
        }
        Ok(())
    }

    fn prune_manifests(&self, keep: &HashSet<String>) -> BuildpackResult<()> {
        let entries = fs::read_dir(&self.path).map_err(|e| {
            BuildpackError::io(format!("reading directory {}", self.path.display()), e)
        })?;

        for entry in entries {
            let entry = entry.map_err(|e| {
                BuildpackError::io(format!("reading directory {}", self.path.display()), e)
            })?;
            let file_name = entry.file_name().to_string_lossy().into_owned();
            if !file_name.ends_with(".toml")
                || keep.contains(&file_name)
                || RESERVED_MANIFESTS.contains(&file_name.as_str())
            {
                continue;
            }

            debug!("Dropping layer manifest {}", file_name);
            fs_util::remove(&entry.path())?;
        }
        Ok(())
    }
}
