//! Manifest persistence
//!
//! This module provides:
//! - The ReadWriter contract used by commands and the reconcile cycle
//! - FileStore: a YAML manifest file edited by hand
//! - DocumentStore: an identity-keyed JSON document

mod document;
mod file;

pub use document::DocumentStore;
pub use file::FileStore;

use crate::domain::{Manifest, Spec};
use crate::error::StoreError;
use std::fs;
use std::io;
use std::path::Path;

/// Persistence of a manifest at one location
pub trait ReadWriter: Send + Sync {
    /// Create the persisted manifest, seeded with the given dependencies
    fn init(&self, api_version: &str, seeds: &[Spec]) -> Result<Manifest, StoreError>;

    /// Load the current manifest
    fn read(&self) -> Result<Manifest, StoreError>;

    /// Replace the persisted manifest
    fn write(&self, manifest: &Manifest) -> Result<(), StoreError>;
}

/// Ensure `path` is an existing regular file
fn ensure_file(path: &Path) -> Result<(), StoreError> {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => Err(StoreError::is_directory(path)),
        Ok(_) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(StoreError::not_found(path)),
        Err(e) => Err(StoreError::read(path, e)),
    }
}

/// Create the parent directory of `path` when missing
fn ensure_parent(path: &Path) -> Result<(), StoreError> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            fs::create_dir_all(dir).map_err(|e| StoreError::write(dir, e))
        }
        _ => Ok(()),
    }
}
