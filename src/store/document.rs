//! Identity-keyed JSON document store
//!
//! The manifest is stored as a map from identity hash to dependency at
//! `<root>/<collection>/<doc>.json`. Seeding only adds dependencies whose
//! identity is not stored yet, so the document stays the ground truth.

use super::{ensure_file, ensure_parent, ReadWriter};
use crate::config::DocumentStoreConfig;
use crate::domain::{Manifest, Spec};
use crate::error::StoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// On-disk document layout
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Document {
    #[serde(default)]
    api_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    dependencies: BTreeMap<String, Spec>,
}

/// Persists the manifest as an identity-keyed document
#[derive(Debug, Clone)]
pub struct DocumentStore {
    path: PathBuf,
}

impl DocumentStore {
    /// Create a store for the configured document
    pub fn new(config: &DocumentStoreConfig) -> Self {
        Self {
            path: config.document_path(),
        }
    }

    /// Create a store for an explicit document path
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the document
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Document, StoreError> {
        ensure_file(&self.path)?;
        let content =
            fs::read_to_string(&self.path).map_err(|e| StoreError::read(&self.path, e))?;
        serde_json::from_str(&content).map_err(|e| StoreError::parse(&self.path, e.to_string()))
    }

    fn save(&self, document: &Document) -> Result<(), StoreError> {
        ensure_parent(&self.path)?;
        let content = serde_json::to_string_pretty(document).map_err(|e| StoreError::Serialize {
            message: e.to_string(),
        })?;
        fs::write(&self.path, content).map_err(|e| StoreError::write(&self.path, e))
    }
}

impl ReadWriter for DocumentStore {
    fn init(&self, api_version: &str, seeds: &[Spec]) -> Result<Manifest, StoreError> {
        let (mut document, existed) = match self.load() {
            Ok(document) => (document, true),
            Err(StoreError::NotFound { .. }) => (Document::default(), false),
            Err(e) => return Err(e),
        };

        if document.api_version.is_empty() {
            document.api_version = api_version.to_string();
        }

        let mut added = 0;
        for spec in seeds {
            let hash = spec.identity_hash();
            if !document.dependencies.contains_key(&hash) {
                document.dependencies.insert(hash, spec.clone());
                added += 1;
            }
        }

        if added > 0 || !existed {
            document.updated_at = Some(Utc::now());
            self.save(&document)?;
        }
        debug!(path = %self.path.display(), added, "seeded document store");

        Ok(Manifest::from_map(document.api_version, document.dependencies))
    }

    fn read(&self) -> Result<Manifest, StoreError> {
        let document = self.load()?;
        Ok(Manifest::from_map(document.api_version, document.dependencies))
    }

    fn write(&self, manifest: &Manifest) -> Result<(), StoreError> {
        let (api_version, dependencies) = manifest.to_map();
        let document = Document {
            api_version,
            updated_at: Some(Utc::now()),
            dependencies,
        };
        self.save(&document)?;

        info!(
            path = %self.path.display(),
            dependencies = document.dependencies.len(),
            "wrote document"
        );
        Ok(())
    }
}
