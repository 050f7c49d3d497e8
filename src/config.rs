//! Runtime configuration
//!
//! Everything the library needs is carried in an explicit `Config` value
//! built once at startup:
//! - Manifest location and schema version
//! - Registry and GitHub endpoints, timeout and credentials
//! - Document store location

use crate::domain::API_VERSION;
use crate::error::ConfigError;
use crate::registry::DEFAULT_TIMEOUT;
use std::path::PathBuf;
use std::time::Duration;

/// Default manifest location, relative to the working directory
pub const DEFAULT_MANIFEST_PATH: &str = ".gofer/config.yaml";

/// Environment variable holding a GitHub API token
pub const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Environment variable holding a Google Container Registry access token
pub const GCR_TOKEN_ENV: &str = "GOOGLE_ACCESS_TOKEN";

/// Environment variable overriding the document store root
pub const STORE_DIR_ENV: &str = "GOFER_STORE_DIR";

/// Environment variable overriding the document store collection
pub const COLLECTION_ENV: &str = "GOFER_COLLECTION";

/// Environment variable overriding the document id
pub const DOC_ENV: &str = "GOFER_DOC";

/// Environment variable overriding the HTTP timeout, in seconds
pub const TIMEOUT_ENV: &str = "GOFER_HTTP_TIMEOUT";

/// Endpoints and credentials for remote version sources
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Docker Hub registry API
    pub docker_hub_url: String,
    /// Docker Hub token service
    pub docker_auth_url: String,
    /// Google Container Registry API
    pub gcr_url: String,
    /// Quay.io registry API
    pub quay_url: String,
    /// GitHub REST API
    pub github_api_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Token sent to the GitHub API
    pub github_token: Option<String>,
    /// Access token for gcr.io
    pub gcr_token: Option<String>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            docker_hub_url: "https://registry-1.docker.io".to_string(),
            docker_auth_url: "https://auth.docker.io/token".to_string(),
            gcr_url: "https://gcr.io".to_string(),
            quay_url: "https://quay.io".to_string(),
            github_api_url: "https://api.github.com".to_string(),
            timeout: DEFAULT_TIMEOUT,
            github_token: None,
            gcr_token: None,
        }
    }
}

/// Location of the identity-keyed document store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentStoreConfig {
    /// Root directory holding collections
    pub root: PathBuf,
    /// Collection (subdirectory) name
    pub collection: String,
    /// Document id within the collection
    pub doc: String,
}

impl Default for DocumentStoreConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(".gofer/store"),
            collection: "dependencies".to_string(),
            doc: "manifest".to_string(),
        }
    }
}

impl DocumentStoreConfig {
    /// Path of the document on disk
    pub fn document_path(&self) -> PathBuf {
        self.root
            .join(&self.collection)
            .join(format!("{}.json", self.doc))
    }
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Manifest file path
    pub manifest_path: PathBuf,
    /// Schema version stamped on new manifests
    pub api_version: String,
    /// Remote version sources
    pub registry: RegistryConfig,
    /// Document store used by the sync cycle
    pub store: DocumentStoreConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            manifest_path: PathBuf::from(DEFAULT_MANIFEST_PATH),
            api_version: API_VERSION.to_string(),
            registry: RegistryConfig::default(),
            store: DocumentStoreConfig::default(),
        }
    }
}

impl Config {
    /// Build configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Config::default();

        config.registry.github_token = get(GITHUB_TOKEN_ENV).map(|v| v.trim().to_string());
        config.registry.gcr_token = get(GCR_TOKEN_ENV).map(|v| v.trim().to_string());

        if let Some(value) = get(TIMEOUT_ENV) {
            let seconds = value
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|s| *s > 0)
                .ok_or_else(|| ConfigError::InvalidValue {
                    key: TIMEOUT_ENV.to_string(),
                    value: value.clone(),
                    message: "expected a positive number of seconds".to_string(),
                })?;
            config.registry.timeout = Duration::from_secs(seconds);
        }

        if let Some(root) = get(STORE_DIR_ENV) {
            config.store.root = PathBuf::from(root);
        }
        if let Some(collection) = get(COLLECTION_ENV) {
            config.store.collection = collection;
        }
        if let Some(doc) = get(DOC_ENV) {
            config.store.doc = doc;
        }

        Ok(config)
    }

    /// Override the manifest path
    pub fn with_manifest_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.manifest_path = path.into();
        self
    }
}
