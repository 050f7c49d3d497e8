//! YAML manifest file

use super::{ensure_file, ensure_parent, ReadWriter};
use crate::domain::{Manifest, Spec};
use crate::error::StoreError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Persists the manifest as a YAML file
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Create a store for the given file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the manifest file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn serialize(manifest: &Manifest) -> Result<String, StoreError> {
        serde_yaml::to_string(manifest).map_err(|e| StoreError::Serialize {
            message: e.to_string(),
        })
    }
}

impl ReadWriter for FileStore {
    fn init(&self, api_version: &str, seeds: &[Spec]) -> Result<Manifest, StoreError> {
        match ensure_file(&self.path) {
            Ok(()) => return Err(StoreError::already_exists(&self.path)),
            Err(StoreError::NotFound { .. }) => {}
            Err(e) => return Err(e),
        }

        let mut manifest = Manifest::new(api_version);
        for spec in seeds {
            manifest.append(spec.clone());
        }

        ensure_parent(&self.path)?;
        let content = Self::serialize(&manifest)?;
        fs::write(&self.path, content).map_err(|e| StoreError::write(&self.path, e))?;

        info!(path = %self.path.display(), "created manifest");
        Ok(manifest)
    }

    fn read(&self) -> Result<Manifest, StoreError> {
        ensure_file(&self.path)?;
        let content =
            fs::read_to_string(&self.path).map_err(|e| StoreError::read(&self.path, e))?;
        serde_yaml::from_str(&content).map_err(|e| StoreError::parse(&self.path, e.to_string()))
    }

    fn write(&self, manifest: &Manifest) -> Result<(), StoreError> {
        ensure_file(&self.path)?;
        let content = Self::serialize(manifest)?;
        fs::write(&self.path, content).map_err(|e| StoreError::write(&self.path, e))?;

        info!(
            path = %self.path.display(),
            dependencies = manifest.len(),
            "wrote manifest"
        );
        Ok(())
    }
}
